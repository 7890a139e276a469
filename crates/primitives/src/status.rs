/// Outcome of a single `process`/`resume` call on the field state machine.
///
/// `Fault` is deliberately absent here — a fault carries a reason, so it travels as the `Err`
/// side of the `Result` the parser returns rather than as a status variant (§9.3 of the
/// expanded spec).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserStatus {
    /// The input fragment ran out; feed more bytes via `resume`.
    Processing,
    /// A custom processor asked for control back (e.g. to let the host display something)
    /// before more bytes are consumed. The next `resume` picks up mid-field.
    Suspended,
    /// The final field (`v`, or `r`/`s` when EIP-155 is in play) was fully consumed.
    Finished,
}

/// Result of invoking the custom-processor hook for one state-machine iteration (C6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomStatus {
    /// The processor declined this iteration; the state machine falls through to the default
    /// field dispatch.
    NotHandled,
    /// The processor consumed some or all of the remaining payload; the state machine
    /// re-enters its loop.
    Handled,
    /// Bubble [`ParserStatus::Suspended`] to the caller.
    Suspended,
}
