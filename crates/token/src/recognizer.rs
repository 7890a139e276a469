//! The recognizer state machine (C7). Activated only while `DATA` is being consumed; decides
//! between three outcomes: contract creation (step aside), a recognized ERC-20 `transfer` to a
//! known token (provision a semantic amount/recipient/ticker), or opaque data (display or
//! reject, per policy).

use tracing::{debug, trace, warn};

use ustream_core::{CustomProcessor, FieldCapability, TxHasher};
use ustream_primitives::{CustomStatus, ParseFault, ProcessorConfig, RlpField};

use crate::display::{DisplayChunk, RawDataDisplay};
use crate::{TRANSFER_PAYLOAD_LEN, TRANSFER_SELECTOR};

/// What the recognizer found once the `data` field was fully consumed.
#[derive(Debug, Clone, Default)]
pub struct TokenContext {
    /// The raw 68-byte ABI payload, valid only when [`TokenContext::provisioned`] is `true`.
    pub data: [u8; 68],
    pub provisioned: bool,
}

impl TokenContext {
    /// The recipient address the `transfer` call names (`data[4+12..4+32]`).
    pub fn recipient(&self) -> &[u8] {
        &self.data[16..36]
    }

    /// The transfer amount, as a 32-byte big-endian unsigned integer (`data[4+32..4+64]`).
    pub fn amount(&self) -> &[u8] {
        &self.data[36..68]
    }
}

#[derive(Debug, Default)]
enum Decision {
    #[default]
    Undecided,
    Token,
    /// Not a token; renders the remaining payload if policy allows, starting from whatever
    /// prefix was already staged while probing the selector.
    RawDisplay(RawDataDisplay),
    /// Not a token, and raw display is disabled — fall through to the generic handler for the
    /// rest of the field.
    FallThrough,
}

/// The `CustomProcessor` installed on the parser's `data` field.
pub struct TokenRecognizer {
    config: ProcessorConfig,
    decision: Decision,
    staged: TokenContext,
    pending_display: Option<DisplayChunk>,
}

impl TokenRecognizer {
    pub fn new(config: ProcessorConfig) -> Self {
        Self {
            config,
            decision: Decision::Undecided,
            staged: TokenContext::default(),
            pending_display: None,
        }
    }

    /// Takes the chunk rendered just before the last `Suspended` return, for the host to present.
    pub fn take_pending_display(&mut self) -> Option<DisplayChunk> {
        self.pending_display.take()
    }

    pub fn into_token_context(self) -> TokenContext {
        self.staged
    }

    /// Non-consuming variant, for reading the result back through a downcast trait object.
    pub fn token_context(&self) -> TokenContext {
        self.staged.clone()
    }

    fn is_candidate<H: TxHasher>(&self, field: &FieldCapability<'_, '_, H>) -> bool {
        field.current_field_length() == TRANSFER_PAYLOAD_LEN
            && self
                .config
                .tokens
                .lookup(field.content().destination.as_bytes())
                .is_some()
    }
}

impl<H: TxHasher> CustomProcessor<H> for TokenRecognizer {
    fn process(
        &mut self,
        field: &mut FieldCapability<'_, '_, H>,
    ) -> Result<CustomStatus, ParseFault> {
        if field.current_field() != RlpField::Data || field.current_field_length() == 0 {
            return Ok(CustomStatus::NotHandled);
        }
        if !field.content().destination.is_present() {
            trace!("data field on a contract-creation transaction; stepping aside");
            return Ok(CustomStatus::NotHandled);
        }

        if matches!(self.decision, Decision::Undecided) && !self.is_candidate(field) {
            self.decision = if self.config.contract_details {
                Decision::RawDisplay(RawDataDisplay::new())
            } else if self.config.data_allowed {
                Decision::FallThrough
            } else {
                warn!("raw data present but policy forbids it");
                return Err(ParseFault::PolicyViolation(
                    "data field present but raw data is not permitted",
                ));
            };
        }

        match self.decision {
            Decision::Undecided => self.probe_selector(field),
            Decision::Token => self.continue_token_copy(field),
            Decision::RawDisplay(_) => self.continue_raw_display(field),
            Decision::FallThrough => Ok(CustomStatus::NotHandled),
        }
    }
}

impl TokenRecognizer {
    /// Buffers bytes toward the 4-byte selector; a real token can't be ruled in or out until
    /// all four have arrived, which may take several fragments (§8 scenario 3).
    fn probe_selector<H: TxHasher>(
        &mut self,
        field: &mut FieldCapability<'_, '_, H>,
    ) -> Result<CustomStatus, ParseFault> {
        let pos = field.field_pos() as usize;
        let n = (4 - pos).min(field.remaining_in_fragment());
        if n == 0 {
            return Ok(CustomStatus::Handled);
        }
        field.copy_tx_data(Some(&mut self.staged.data[pos..pos + n]), n)?;

        if field.field_pos() < 4 {
            return Ok(CustomStatus::Handled);
        }

        let mut selector = [0u8; 4];
        selector.copy_from_slice(&self.staged.data[..4]);

        if selector == TRANSFER_SELECTOR {
            debug!("transfer() selector matched a known token destination");
            self.decision = Decision::Token;
            return self.continue_token_copy(field);
        }

        debug!("selector mismatch on an otherwise token-shaped payload");
        if self.config.contract_details {
            let mut display = RawDataDisplay::new();
            self.pending_display = Some(display.seed_selector(selector));
            self.decision = Decision::RawDisplay(display);
            return Ok(CustomStatus::Suspended);
        }
        if !self.config.data_allowed {
            return Err(ParseFault::PolicyViolation(
                "data field present but raw data is not permitted",
            ));
        }
        self.decision = Decision::FallThrough;
        Ok(CustomStatus::NotHandled)
    }

    fn continue_token_copy<H: TxHasher>(
        &mut self,
        field: &mut FieldCapability<'_, '_, H>,
    ) -> Result<CustomStatus, ParseFault> {
        let pos = field.field_pos() as usize;
        let total = TRANSFER_PAYLOAD_LEN as usize;
        let n = (total - pos).min(field.remaining_in_fragment());
        if n > 0 {
            field.copy_tx_data(Some(&mut self.staged.data[pos..pos + n]), n)?;
        }
        if field.field_pos() as usize == total {
            self.staged.provisioned = true;
            field.finish_field();
        }
        Ok(CustomStatus::Handled)
    }

    fn continue_raw_display<H: TxHasher>(
        &mut self,
        field: &mut FieldCapability<'_, '_, H>,
    ) -> Result<CustomStatus, ParseFault> {
        let Decision::RawDisplay(display) = &mut self.decision else {
            unreachable!("continue_raw_display called outside the RawDisplay state");
        };
        let remaining = field.remaining_in_field();
        if remaining == 0 {
            if let Some(chunk) = display.flush() {
                self.pending_display = Some(chunk);
                field.finish_field();
                return Ok(CustomStatus::Suspended);
            }
            field.finish_field();
            return Ok(CustomStatus::Handled);
        }
        let mut byte = [0u8; 1];
        field.copy_tx_data(Some(&mut byte), 1)?;
        if let Some(chunk) = display.push_byte(byte[0]) {
            self.pending_display = Some(chunk);
            return Ok(CustomStatus::Suspended);
        }
        Ok(CustomStatus::Handled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ustream_core::{Keccak256Hasher, TxContext};
    use ustream_primitives::{ParserStatus, TokenInfo, TokenTable};

    fn celo_token_transfer_bytes(token: [u8; 20]) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend(TRANSFER_SELECTOR);
        data.extend([0u8; 12]);
        data.extend([0x77u8; 20]); // recipient
        data.extend([0u8; 31]);
        data.push(0x64); // amount = 100

        let mut payload = Vec::new();
        payload.push(0x09); // nonce
        payload.extend([0x85, 0x04, 0xa8, 0x17, 0xc8, 0x00]); // gasPrice
        payload.extend([0x82, 0x52, 0x08]); // startGas
        payload.push(0x94); // feeCurrency
        payload.extend(token);
        payload.push(0x80); // gatewayTo
        payload.push(0x80); // gatewayFee
        payload.push(0x94); // to
        payload.extend(token);
        payload.push(0x80); // value
        payload.push(0xb8); // data: long string, 1 length-of-length byte
        payload.push(68);
        payload.extend(&data);
        payload.push(0x1c); // v
        payload.push(0x01); // r
        payload.push(0x01); // s

        let mut out = Vec::new();
        if payload.len() <= 55 {
            out.push(0xc0 + payload.len() as u8);
        } else {
            out.push(0xf8);
            out.push(payload.len() as u8);
        }
        out.extend(payload);
        out
    }

    fn token_table(token: [u8; 20]) -> TokenTable {
        TokenTable::new(vec![TokenInfo {
            address: token,
            ticker: "cUSD".to_string(),
            decimals: 18,
        }])
    }

    #[test]
    fn recognizes_transfer_to_known_token_whole_fragment() {
        let token = [0x99u8; 20];
        let bytes = celo_token_transfer_bytes(token);
        let recognizer = TokenRecognizer::new(ProcessorConfig {
            data_allowed: true,
            contract_details: true,
            tokens: token_table(token),
        });
        let mut ctx: TxContext<Keccak256Hasher> =
            TxContext::new(Keccak256Hasher::new(), false, Some(Box::new(recognizer)));
        assert_eq!(ctx.process_tx(&bytes).unwrap(), ParserStatus::Finished);
    }

    #[test]
    fn recognizes_transfer_fragmented_one_byte_at_a_time() {
        let token = [0x99u8; 20];
        let bytes = celo_token_transfer_bytes(token);
        let recognizer = TokenRecognizer::new(ProcessorConfig {
            data_allowed: true,
            contract_details: true,
            tokens: token_table(token),
        });
        let mut ctx: TxContext<Keccak256Hasher> =
            TxContext::new(Keccak256Hasher::new(), false, Some(Box::new(recognizer)));
        let mut status = ParserStatus::Processing;
        for byte in &bytes {
            status = ctx.process_tx(std::slice::from_ref(byte)).unwrap();
        }
        assert_eq!(status, ParserStatus::Finished);
    }
}
