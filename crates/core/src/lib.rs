//! The streaming RLP transaction parser's core: the hasher facade (C2), the stream cursor (C3),
//! the field state machine (C4/C5), and the custom-processor hook (C6) it offers to modules
//! like `ustream-token`.
//!
//! Fragmentation is handled by feeding [`TxContext::process_tx`] with each fragment in turn;
//! [`TxContext::continue_tx`] resumes after a custom processor returns `Suspended` without
//! requiring new bytes.

mod capability;
mod context;
mod cursor;
mod hasher;

pub use capability::{CustomProcessor, FieldCapability};
pub use context::TxContext;
pub use hasher::{Keccak256Hasher, TxHasher};
