//! The field state machine (C4) and field handlers (C5): tracks which RLP field is being
//! consumed, dispatches per-field validators/copiers, and advances when a field is exhausted.

use tracing::{debug, trace, warn};

use ustream_primitives::{
    AddressSlot, Int256Slot, ParseFault, ParserStatus, RlpField, TxContent, VSlot,
};

use crate::capability::{CustomProcessor, FieldCapability};
use crate::cursor::Cursor;
use crate::hasher::TxHasher;

/// Maximum header bytes the staging buffer can hold (a one-byte prefix plus up to four
/// length-of-length bytes) before the stream is declared malformed (§4.4 step 4).
const RLP_BUFFER_CAP: usize = 5;

/// Per-field wire constraints (§4.4's validation table), kept as data rather than scattered
/// across a long `match` (Design Notes, spec.md §9).
struct FieldConstraint {
    max_len: Option<u32>,
    exact_lens: Option<&'static [u32]>,
}

const fn constraint_for(field: RlpField) -> FieldConstraint {
    use RlpField::*;
    match field {
        Type | Nonce | GasPrice | StartGas | GatewayFee | Value => FieldConstraint {
            max_len: Some(32),
            exact_lens: None,
        },
        FeeCurrency => FieldConstraint {
            max_len: Some(20),
            exact_lens: None,
        },
        GatewayTo | To => FieldConstraint {
            max_len: None,
            exact_lens: Some(&[0, 20]),
        },
        V => FieldConstraint {
            max_len: Some(4),
            exact_lens: None,
        },
        Data | R | S => FieldConstraint {
            max_len: None,
            exact_lens: None,
        },
        Content | Done => FieldConstraint {
            max_len: None,
            exact_lens: None,
        },
    }
}

fn validate_length(field: RlpField, declared: u32) -> Result<(), ParseFault> {
    let c = constraint_for(field);
    if let Some(exact) = c.exact_lens {
        if !exact.contains(&declared) {
            let limit = *exact.iter().max().unwrap_or(&0);
            return Err(ParseFault::FieldLengthExceeded {
                field,
                declared,
                limit,
            });
        }
    } else if let Some(max) = c.max_len {
        if declared > max {
            return Err(ParseFault::FieldLengthExceeded {
                field,
                declared,
                limit: max,
            });
        }
    }
    Ok(())
}

fn finish_int256<H: TxHasher>(
    cursor: &mut Cursor<'_, H>,
    slot: &mut Int256Slot,
    field_length: u32,
    n: usize,
) -> Result<(), ParseFault> {
    let pos = cursor.field_pos() as usize;
    cursor.copy_tx_data(Some(&mut slot.value[pos..pos + n]), n)?;
    if cursor.field_pos() == field_length {
        slot.length = field_length as u8;
    }
    Ok(())
}

fn finish_address<H: TxHasher>(
    cursor: &mut Cursor<'_, H>,
    slot: &mut AddressSlot,
    field_length: u32,
    n: usize,
) -> Result<(), ParseFault> {
    let pos = cursor.field_pos() as usize;
    cursor.copy_tx_data(Some(&mut slot.value[pos..pos + n]), n)?;
    if cursor.field_pos() == field_length {
        slot.length = field_length as u8;
    }
    Ok(())
}

fn finish_v<H: TxHasher>(
    cursor: &mut Cursor<'_, H>,
    slot: &mut VSlot,
    field_length: u32,
    n: usize,
) -> Result<(), ParseFault> {
    let pos = cursor.field_pos() as usize;
    cursor.copy_tx_data(Some(&mut slot.value[pos..pos + n]), n)?;
    if cursor.field_pos() == field_length {
        slot.length = field_length as u8;
    }
    Ok(())
}

/// The resumable parser context (§3 "Parser context"). Owns the stream cursor, the field
/// cursor, the RLP header staging buffer, the output content struct, and (optionally) a
/// custom processor for the `data` field.
pub struct TxContext<'buf, H: TxHasher> {
    pub(crate) cursor: Cursor<'buf, H>,
    pub(crate) current_field: RlpField,
    is_ethereum: bool,
    pub(crate) current_field_length: u32,
    current_field_is_list: bool,
    /// Total payload length declared by the outer list header, recorded when `CONTENT` is
    /// consumed (§4.4 step 7). Informational only — nothing downstream currently reads it, but
    /// it is part of the resumable state the original firmware tracks.
    envelope_length: u32,
    rlp_buffer: [u8; RLP_BUFFER_CAP],
    rlp_buffer_pos: usize,
    pub content: TxContent,
    custom_processor: Option<Box<dyn CustomProcessor<H>>>,
}

impl<'buf, H: TxHasher + 'static> TxContext<'buf, H> {
    /// `init` (§6): zeroes the resumable state, installs the hasher and optional custom
    /// processor, and sets the field cursor to `CONTENT`.
    pub fn new(hasher: H, is_ethereum: bool, custom_processor: Option<Box<dyn CustomProcessor<H>>>) -> Self {
        Self {
            cursor: Cursor::new(hasher),
            current_field: RlpField::Content,
            is_ethereum,
            current_field_length: 0,
            current_field_is_list: false,
            envelope_length: 0,
            rlp_buffer: [0u8; RLP_BUFFER_CAP],
            rlp_buffer_pos: 0,
            content: TxContent::default(),
            custom_processor,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.current_field == RlpField::Done
    }

    /// Hands back the installed custom processor, typically once `Finished` so the host can read
    /// whatever state it accumulated (e.g. a token recognizer's provisioned transfer context;
    /// §8 scenario 2, "the outer application reads recipient and amount from the token context").
    pub fn take_custom_processor(&mut self) -> Option<Box<dyn CustomProcessor<H>>> {
        self.custom_processor.take()
    }

    /// Consumes the context and returns the final digest. Callers should only do this after
    /// `Finished`.
    pub fn finalize_hash(self) -> [u8; 32] {
        self.cursor.into_hasher().finalize()
    }

    /// `processTx` (§6): installs a new fragment and runs the state machine until it exhausts
    /// the fragment, suspends, finishes, or faults.
    pub fn process_tx(&mut self, bytes: &'buf [u8]) -> Result<ParserStatus, ParseFault> {
        self.cursor.set_buffer(bytes);
        self.run()
    }

    /// `continueTx` (§6): resumes with whatever remains of the previously installed fragment —
    /// used after `Suspended`, where the fragment was not exhausted.
    pub fn continue_tx(&mut self) -> Result<ParserStatus, ParseFault> {
        self.run()
    }

    fn run(&mut self) -> Result<ParserStatus, ParseFault> {
        loop {
            if self.current_field == RlpField::Done {
                return Ok(ParserStatus::Finished);
            }

            // Legacy (pre-EIP-155) termination: the stream simply ends before V starts.
            if self.current_field == RlpField::V
                && !self.cursor.is_processing_field()
                && self.cursor.is_empty()
            {
                debug!("stream ended before v; treating as legacy (pre-EIP-155) transaction");
                self.content.v.length = 0;
                return Ok(ParserStatus::Processing);
            }

            if self.cursor.is_empty() {
                return Ok(ParserStatus::Processing);
            }

            if !self.cursor.is_processing_field() {
                match self.decode_header()? {
                    Some(()) => continue,
                    None => return Ok(ParserStatus::Processing),
                }
            }

            if let Some(mut processor) = self.custom_processor.take() {
                let outcome = {
                    let mut field = FieldCapability::new(self);
                    processor.process(&mut field)
                };
                self.custom_processor = Some(processor);
                match outcome? {
                    ustream_primitives::CustomStatus::NotHandled => {}
                    ustream_primitives::CustomStatus::Handled => continue,
                    ustream_primitives::CustomStatus::Suspended => {
                        return Ok(ParserStatus::Suspended)
                    }
                }
            }

            self.dispatch_default_field()?;

            if self.cursor.field_pos() == self.current_field_length {
                trace!(field = ?self.current_field, "field fully consumed");
                self.cursor.end_field();
                self.current_field = self.current_field.next();
            }
        }
    }

    /// Accumulates header bytes into the staging buffer until the RLP pre-decoder can decide;
    /// returns `Some(())` once a field has been entered (the caller should loop again) or
    /// `None` if the fragment ran out first (§4.4 step 4).
    fn decode_header(&mut self) -> Result<Option<()>, ParseFault> {
        loop {
            if self.cursor.is_empty() {
                return Ok(None);
            }
            if self.rlp_buffer_pos >= RLP_BUFFER_CAP {
                return Err(ParseFault::InvalidInternalState(
                    "RLP header staging buffer filled without becoming decodable",
                ));
            }
            let byte = self.cursor.read_byte()?;
            self.rlp_buffer[self.rlp_buffer_pos] = byte;
            self.rlp_buffer_pos += 1;

            match ustream_rlp::can_decode(&self.rlp_buffer[..self.rlp_buffer_pos]) {
                None => continue,
                Some(false) => {
                    warn!("non-canonical RLP header");
                    return Err(ParseFault::InvalidRlpEncoding);
                }
                Some(true) => break,
            }
        }

        let header = ustream_rlp::decode_length(&self.rlp_buffer[..self.rlp_buffer_pos])
            .ok_or(ParseFault::InvalidInternalState(
                "pre-decoder reported decidable but decode_length returned None",
            ))?;
        self.rlp_buffer_pos = 0;

        if header.header_length == 0 {
            self.cursor.stash_single_byte(self.rlp_buffer[0]);
        }

        if self.current_field == RlpField::Content {
            if !header.is_list {
                return Err(ParseFault::InvalidRlpEncoding);
            }
            self.envelope_length = header.payload_length;
            // TYPE never appears on the wire (no EIP-2718 typed transactions are in scope), so
            // the outer list header advances the field cursor straight to NONCE.
            self.current_field = self.current_field.next().next();
            return Ok(Some(()));
        }

        // Ethereum encodings omit feeCurrency/gatewayTo/gatewayFee; the bytes at this wire
        // position are actually `to`'s, so remap before validating against the right field's
        // constraints (§4.4 step 7).
        if self.current_field == RlpField::FeeCurrency && self.is_ethereum {
            trace!("ethereum field order: skipping feeCurrency/gatewayTo/gatewayFee");
            self.current_field = self.current_field.skip_celo_fields();
        }

        if header.is_list {
            return Err(ParseFault::InvalidRlpEncoding);
        }
        validate_length(self.current_field, header.payload_length)?;

        self.current_field_length = header.payload_length;
        self.current_field_is_list = header.is_list;
        self.cursor.begin_field();
        Ok(Some(()))
    }

    fn dispatch_default_field(&mut self) -> Result<(), ParseFault> {
        let remaining_field = (self.current_field_length - self.cursor.field_pos()) as usize;
        let n = remaining_field.min(self.cursor.remaining());
        match self.current_field {
            RlpField::Type | RlpField::Nonce | RlpField::Data | RlpField::R | RlpField::S => {
                self.cursor.copy_tx_data(None, n)?;
            }
            RlpField::GasPrice => {
                finish_int256(&mut self.cursor, &mut self.content.gasprice, self.current_field_length, n)?
            }
            RlpField::StartGas => finish_int256(
                &mut self.cursor,
                &mut self.content.startgas,
                self.current_field_length,
                n,
            )?,
            RlpField::Value => {
                finish_int256(&mut self.cursor, &mut self.content.value, self.current_field_length, n)?
            }
            RlpField::GatewayFee => finish_int256(
                &mut self.cursor,
                &mut self.content.gateway_fee,
                self.current_field_length,
                n,
            )?,
            RlpField::FeeCurrency => finish_address(
                &mut self.cursor,
                &mut self.content.fee_currency,
                self.current_field_length,
                n,
            )?,
            RlpField::GatewayTo => finish_address(
                &mut self.cursor,
                &mut self.content.gateway_destination,
                self.current_field_length,
                n,
            )?,
            RlpField::To => finish_address(
                &mut self.cursor,
                &mut self.content.destination,
                self.current_field_length,
                n,
            )?,
            RlpField::V => {
                finish_v(&mut self.cursor, &mut self.content.v, self.current_field_length, n)?
            }
            RlpField::Content | RlpField::Done => {
                return Err(ParseFault::InvalidInternalState(
                    "dispatch reached on a field that should never be processing",
                ))
            }
        }
        if self.current_field == RlpField::Data && self.current_field_length != 0 {
            self.content.data_present = true;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::test_support::RecordingHasher;
    use ustream_primitives::CustomStatus;

    fn legacy_eth_transfer_bytes() -> Vec<u8> {
        // [nonce=9, gasPrice=0x04a817c800, startGas=0x5208, to=0x35..35 (20 bytes),
        //  value=0x0de0b6b3a7640000, data=empty, v=0x25, r=1-byte, s=1-byte]
        let to = [0x35u8; 20];
        let mut payload = Vec::new();
        payload.push(0x09); // nonce, self-encoded
        payload.extend([0x85, 0x04, 0xa8, 0x17, 0xc8, 0x00]); // gasPrice, short string len 5
        payload.extend([0x82, 0x52, 0x08]); // startGas, short string len 2
        payload.push(0x94); // to, short string len 20
        payload.extend(to);
        payload.extend([0x88, 0x0d, 0xe0, 0xb6, 0xb3, 0xa7, 0x64, 0x00, 0x00]); // value, len 8
        payload.push(0x80); // data, empty string
        payload.push(0x25); // v, self-encoded (0x25 < 0x80)
        payload.push(0x01); // r, self-encoded
        payload.push(0x01); // s, self-encoded

        let mut out = Vec::new();
        out.push(0xc0 + payload.len() as u8);
        out.extend(payload);
        out
    }

    #[test]
    fn legacy_eth_transfer_whole_fragment() {
        let bytes = legacy_eth_transfer_bytes();
        let mut ctx: TxContext<RecordingHasher> = TxContext::new(RecordingHasher::default(), true, None);
        let status = ctx.process_tx(&bytes).unwrap();
        assert_eq!(status, ParserStatus::Finished);
        assert_eq!(ctx.content.destination.length, 20);
        assert_eq!(ctx.content.value.length, 8);
        assert!(!ctx.content.data_present);
    }

    #[test]
    fn legacy_eth_transfer_byte_at_a_time() {
        let bytes = legacy_eth_transfer_bytes();
        let mut ctx: TxContext<RecordingHasher> = TxContext::new(RecordingHasher::default(), true, None);
        let mut status = ParserStatus::Processing;
        for i in 0..bytes.len() {
            status = ctx.process_tx(&bytes[i..i + 1]).unwrap();
            if i != bytes.len() - 1 {
                assert_eq!(status, ParserStatus::Processing);
            }
        }
        assert_eq!(status, ParserStatus::Finished);
        assert_eq!(ctx.content.destination.length, 20);
        assert_eq!(ctx.content.value.length, 8);
    }

    #[test]
    fn malformed_long_string_header_faults() {
        let mut ctx: TxContext<RecordingHasher> = TxContext::new(RecordingHasher::default(), true, None);
        let err = ctx.process_tx(&[0xb8, 0x00]).unwrap_err();
        assert_eq!(err, ParseFault::InvalidRlpEncoding);
    }

    #[test]
    fn oversized_value_field_faults_before_copying() {
        let to = [0x35u8; 20];
        let mut payload = Vec::new();
        payload.push(0x09);
        payload.extend([0x85, 0x04, 0xa8, 0x17, 0xc8, 0x00]);
        payload.extend([0x82, 0x52, 0x08]);
        payload.push(0x94);
        payload.extend(to);
        payload.push(0xa1); // value: long string, declared length 33 — exceeds the 32-byte cap
        payload.push(33);

        let mut out = Vec::new();
        out.push(0xc0 + payload.len() as u8);
        out.extend(payload);

        let mut ctx: TxContext<RecordingHasher> = TxContext::new(RecordingHasher::default(), true, None);
        let err = ctx.process_tx(&out).unwrap_err();
        assert!(matches!(
            err,
            ParseFault::FieldLengthExceeded {
                field: RlpField::Value,
                declared: 33,
                limit: 32
            }
        ));
    }

    #[test]
    fn legacy_termination_when_stream_ends_before_v() {
        let to = [0x35u8; 20];
        let mut payload = Vec::new();
        payload.push(0x09);
        payload.extend([0x85, 0x04, 0xa8, 0x17, 0xc8, 0x00]);
        payload.extend([0x82, 0x52, 0x08]);
        payload.push(0x94);
        payload.extend(to);
        payload.extend([0x88, 0x0d, 0xe0, 0xb6, 0xb3, 0xa7, 0x64, 0x00, 0x00]);
        payload.push(0x80); // empty data, then stream simply ends — no v/r/s at all

        let mut out = Vec::new();
        out.push(0xc0 + payload.len() as u8);
        out.extend(payload);

        let mut ctx: TxContext<RecordingHasher> = TxContext::new(RecordingHasher::default(), true, None);
        let status = ctx.process_tx(&out).unwrap();
        assert_eq!(status, ParserStatus::Processing);
        assert_eq!(ctx.content.v.length, 0);
        assert_eq!(ctx.current_field, RlpField::V);
    }

    /// Stands in for a processor with a "no raw data" policy (§8 scenario 6): faults as soon as
    /// it sees a nonzero-length `data` field, and otherwise stays out of the way.
    struct RejectRawData;
    impl<H: TxHasher> CustomProcessor<H> for RejectRawData {
        fn process(
            &mut self,
            field: &mut FieldCapability<'_, '_, H>,
        ) -> Result<CustomStatus, ParseFault> {
            if field.current_field() == RlpField::Data && field.current_field_length() != 0 {
                return Err(ParseFault::PolicyViolation("raw data is not permitted"));
            }
            Ok(CustomStatus::NotHandled)
        }
    }

    #[test]
    fn custom_processor_fault_propagates() {
        let mut payload = Vec::new();
        payload.push(0x09);
        payload.extend([0x85, 0x04, 0xa8, 0x17, 0xc8, 0x00]);
        payload.extend([0x82, 0x52, 0x08]);
        payload.push(0x80); // to: empty string (contract creation)
        payload.push(0x80); // value: 0
        payload.extend([0x83, 0xaa, 0xbb, 0xcc]); // data: 3 bytes, non-empty

        let mut out = Vec::new();
        out.push(0xc0 + payload.len() as u8);
        out.extend(payload);

        let mut ctx: TxContext<RecordingHasher> =
            TxContext::new(RecordingHasher::default(), true, Some(Box::new(RejectRawData)));
        let err = ctx.process_tx(&out).unwrap_err();
        assert_eq!(err, ParseFault::PolicyViolation("raw data is not permitted"));
    }
}
