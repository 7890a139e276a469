//! Data model shared by the streaming RLP transaction parser and its collaborators.
//!
//! This crate carries no parsing logic — only the field identity (§3 "Parser context"), the
//! output slots it writes into, and the error/status vocabulary the parser and its custom
//! processors speak. Keeping it separate lets `ustream-token` depend on the shapes without
//! depending on the state machine itself.

mod content;
mod error;
mod field;
mod status;
mod token;

pub use content::{AddressSlot, Int256Slot, TxContent, VSlot, MAX_ADDRESS, MAX_INT256, MAX_V};
pub use error::ParseFault;
pub use field::RlpField;
pub use status::{CustomStatus, ParserStatus};
pub use token::{ProcessorConfig, TokenInfo, TokenTable};
