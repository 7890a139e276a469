//! The token / data recognizer (C7): a concrete [`CustomProcessor`] that intercepts the `data`
//! field to recognize an ERC-20 `transfer(address,uint256)` call against a known-token table,
//! or otherwise streams the field in 32-byte chunks for interactive confirmation.

mod display;
mod recognizer;

pub use display::RawDataDisplay;
pub use recognizer::{TokenContext, TokenRecognizer};

/// The 4-byte selector for `transfer(address,uint256)`, keccak256("transfer(address,uint256)")[..4].
pub const TRANSFER_SELECTOR: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];

/// Declared length of a `transfer(address,uint256)` call's ABI-encoded arguments: a 4-byte
/// selector, a 32-byte padded address, and a 32-byte amount.
pub const TRANSFER_PAYLOAD_LEN: u32 = 68;
