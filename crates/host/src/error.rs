/// Failures in the external-collaborator utilities the parser itself never touches (§1
/// "out of scope: ... big-integer decimal formatting, address checksum encoding, signature
/// DER-to-(r,s) reshaping").
#[derive(Debug, Clone, thiserror::Error)]
pub enum HostError {
    #[error("DER signature is truncated or malformed")]
    MalformedSignature,
    #[error("signature component is longer than 32 bytes")]
    SignatureComponentTooLong,
}
