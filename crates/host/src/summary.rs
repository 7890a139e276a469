//! Assembles a human-presentable summary from a finished parse — the host-side counterpart to
//! the original firmware's `finalizeParsing`: fee-currency/native fallback, the `gasPrice *
//! startGas` max-fee bound, and token-aware amount/recipient substitution.

use ustream_primitives::TxContent;
use ustream_token::TokenContext;

use crate::checksum::checksum_address;
use crate::decimals::{format_amount, multiply_be};

/// A fully resolved, display-ready rendering of a parsed transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxSummary {
    pub recipient: String,
    pub amount: String,
    pub ticker: String,
    pub max_fee: String,
    pub fee_ticker: String,
}

/// Builds the display summary for a finished parse.
///
/// `token` is `Some` only when the recognizer provisioned a token transfer; `native_ticker`/
/// `native_decimals` describe the chain's own coin, used both as the default amount unit and
/// as the fee-currency fallback when `feeCurrency` was absent (§9.6 open-question resolution:
/// retains source behavior).
pub fn summarize(
    content: &TxContent,
    token: Option<&TokenContext>,
    native_ticker: &str,
    native_decimals: u8,
    fee_currency_lookup: impl Fn(&[u8]) -> Option<(&str, u8)>,
) -> TxSummary {
    let max_fee_raw = multiply_be(content.gasprice.as_bytes(), content.startgas.as_bytes());
    let (fee_ticker, fee_decimals) = if content.fee_currency.is_present() {
        fee_currency_lookup(content.fee_currency.as_bytes())
            .unwrap_or((native_ticker, native_decimals))
    } else {
        (native_ticker, native_decimals)
    };
    let max_fee = format_amount(&max_fee_raw, fee_decimals);

    match token {
        Some(token) if token.provisioned => {
            let mut recipient = [0u8; 20];
            recipient.copy_from_slice(token.recipient());
            TxSummary {
                recipient: checksum_address(&recipient),
                amount: format_amount(token.amount(), native_decimals),
                ticker: fee_currency_lookup(content.fee_currency.as_bytes())
                    .map(|(ticker, _)| ticker.to_string())
                    .unwrap_or_else(|| native_ticker.to_string()),
                max_fee,
                fee_ticker: fee_ticker.to_string(),
            }
        }
        _ => {
            let mut recipient = [0u8; 20];
            recipient.copy_from_slice(content.destination.as_bytes());
            TxSummary {
                recipient: checksum_address(&recipient),
                amount: format_amount(content.value.as_bytes(), native_decimals),
                ticker: native_ticker.to_string(),
                max_fee,
                fee_ticker: fee_ticker.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ustream_primitives::{AddressSlot, Int256Slot};

    fn int_slot(bytes: &[u8]) -> Int256Slot {
        let mut slot = Int256Slot::default();
        slot.value[..bytes.len()].copy_from_slice(bytes);
        slot.length = bytes.len() as u8;
        slot
    }

    fn addr_slot(bytes: [u8; 20]) -> AddressSlot {
        AddressSlot {
            value: bytes,
            length: 20,
        }
    }

    #[test]
    fn plain_eth_transfer_uses_native_ticker_and_value() {
        let mut content = TxContent::default();
        content.gasprice = int_slot(&[0x04, 0xa8, 0x17, 0xc8, 0x00]);
        content.startgas = int_slot(&[0x52, 0x08]);
        content.value = int_slot(&[0x0d, 0xe0, 0xb6, 0xb3, 0xa7, 0x64, 0x00, 0x00]);
        content.destination = addr_slot([0x11u8; 20]);

        let summary = summarize(&content, None, "ETH", 18, |_| None);
        assert_eq!(summary.ticker, "ETH");
        assert_eq!(summary.fee_ticker, "ETH");
        assert_eq!(summary.amount, "1.000000000000000000");
    }

    #[test]
    fn token_transfer_uses_token_ticker_and_amount() {
        let mut content = TxContent::default();
        content.gasprice = int_slot(&[0x01]);
        content.startgas = int_slot(&[0x0a]);
        content.fee_currency = addr_slot([0x22u8; 20]);
        content.destination = addr_slot([0x22u8; 20]);

        let mut token = TokenContext::default();
        token.provisioned = true;
        token.data[16..36].copy_from_slice(&[0x33u8; 20]);
        token.data[60..68].copy_from_slice(&100u64.to_be_bytes());

        let summary = summarize(&content, Some(&token), "ETH", 18, |addr| {
            if addr == [0x22u8; 20] {
                Some(("cUSD", 18))
            } else {
                None
            }
        });
        assert_eq!(summary.ticker, "cUSD");
        assert_eq!(summary.fee_ticker, "cUSD");
        assert_eq!(summary.amount, "0.000000000000000100");
    }

    #[test]
    fn absent_fee_currency_falls_back_to_native() {
        let mut content = TxContent::default();
        content.gasprice = int_slot(&[0x01]);
        content.startgas = int_slot(&[0x01]);
        content.destination = addr_slot([0x00u8; 20]);

        let summary = summarize(&content, None, "CELO", 18, |_| {
            panic!("lookup must not be called when feeCurrency is absent")
        });
        assert_eq!(summary.fee_ticker, "CELO");
    }
}
