//! Host-side collaborators the parser itself never touches (§1 "out of scope: ... big-integer
//! decimal formatting, address checksum encoding, signature DER-to-(r,s) reshaping"): rendering
//! a finished parse into a display summary, and reshaping the secure element's raw signature
//! output into the (r, s) pair a transaction needs.

mod checksum;
mod decimals;
mod error;
mod signature;
mod summary;

pub use checksum::checksum_address;
pub use decimals::{format_amount, multiply_be, to_decimal_string};
pub use error::HostError;
pub use signature::{reshape_der_signature, RsSignature};
pub use summary::{summarize, TxSummary};
