//! The hasher facade (C2): an opaque incremental Keccak-256 capability. The parser never
//! inspects the digest — it only feeds bytes — so any type implementing [`TxHasher`] can stand
//! in, which keeps the state machine testable without pulling in real Keccak for unit tests
//! that don't care about the digest.

use alloy_primitives::Keccak256;

pub trait TxHasher {
    fn update(&mut self, bytes: &[u8]);
    /// Consumes the hasher and returns the 32-byte digest. The enclosing application calls
    /// this after [`crate::ParserStatus::Finished`] and signs the result.
    fn finalize(self) -> [u8; 32];
}

/// The production hasher, backed by `alloy_primitives::Keccak256`.
#[derive(Debug, Default)]
pub struct Keccak256Hasher(Keccak256);

impl Keccak256Hasher {
    pub fn new() -> Self {
        Self(Keccak256::new())
    }
}

impl TxHasher for Keccak256Hasher {
    fn update(&mut self, bytes: &[u8]) {
        self.0.update(bytes);
    }

    fn finalize(self) -> [u8; 32] {
        self.0.finalize().into()
    }
}
