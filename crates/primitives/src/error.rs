use crate::field::RlpField;

/// Every fatal condition the parser can hit (§7). There is no in-stream recovery: any fault
/// invalidates the entire transaction and the caller must discard the context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseFault {
    /// More bytes were requested than the current fragment provides, in a context that
    /// forbids waiting for more (the RLP header staging buffer, mid header pre-decode).
    #[error("buffer underflow while pre-decoding an RLP header")]
    BufferUnderflow,

    /// Non-canonical length, an over-long header, or a payload whose list/scalar kind doesn't
    /// match what the field requires.
    #[error("malformed RLP encoding")]
    InvalidRlpEncoding,

    /// A declared field length exceeds the permitted maximum for that field.
    #[error("field {field:?} declares length {declared}, exceeding the limit of {limit}")]
    FieldLengthExceeded {
        field: RlpField,
        declared: u32,
        limit: u32,
    },

    /// The data field is present while policy disallows raw data, or the fee currency doesn't
    /// match a known token.
    #[error("policy violation: {0}")]
    PolicyViolation(&'static str),

    /// An internal invariant was violated (e.g. the RLP staging buffer filled up without the
    /// header becoming decodable). This should never happen for any real input; seeing it
    /// means the state machine itself has a bug.
    #[error("internal logic error: {0}")]
    InvalidInternalState(&'static str),
}
