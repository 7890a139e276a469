//! The custom-processor hook (C6): a pluggable callback invoked once per state-machine
//! iteration while a field is active, and the narrow capability object it mutates the parser
//! through instead of touching the context directly (Design Notes, spec.md §9).

use std::any::Any;

use ustream_primitives::{ParseFault, RlpField, TxContent};

use crate::context::TxContext;
use crate::hasher::TxHasher;

pub trait CustomProcessor<H: TxHasher>: 'static {
    /// Called once per iteration of the field state machine's main loop while a field's payload
    /// is being consumed (never during header pre-decode). `NotHandled` falls through to the
    /// default field dispatch; `Handled` means the processor itself advanced the stream this
    /// iteration; `Suspended` bubbles control back to the host before more bytes are consumed.
    fn process(
        &mut self,
        field: &mut FieldCapability<'_, '_, H>,
    ) -> Result<ustream_primitives::CustomStatus, ParseFault>;

    /// Lets the host downcast back to the concrete processor after the parse is done (typically
    /// once `Finished`), to read back whatever state it accumulated — e.g. a token recognizer's
    /// provisioned transfer context (§8 scenario 2).
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// The legal surface a custom processor can observe and mutate: which field is active, how much
/// of it remains, a look-ahead into the current fragment, read access to fields already
/// extracted, and the ability to consume bytes (hashing them) or declare the field finished.
///
/// Deliberately narrower than [`TxContext`] itself — a processor cannot rewind a field, touch a
/// field other than the one in progress, or bypass the hasher.
pub struct FieldCapability<'ctx, 'buf, H: TxHasher> {
    pub(crate) ctx: &'ctx mut TxContext<'buf, H>,
}

impl<'ctx, 'buf, H: TxHasher> FieldCapability<'ctx, 'buf, H> {
    pub(crate) fn new(ctx: &'ctx mut TxContext<'buf, H>) -> Self {
        Self { ctx }
    }

    pub fn current_field(&self) -> RlpField {
        self.ctx.current_field
    }

    pub fn current_field_length(&self) -> u32 {
        self.ctx.current_field_length
    }

    pub fn field_pos(&self) -> u32 {
        self.ctx.cursor.field_pos()
    }

    pub fn remaining_in_field(&self) -> u32 {
        self.ctx.current_field_length - self.ctx.cursor.field_pos()
    }

    pub fn remaining_in_fragment(&self) -> usize {
        self.ctx.cursor.remaining()
    }

    /// Non-consuming look-ahead, bounded by what the current fragment actually holds; a `None`
    /// means the processor must wait for more bytes (return `NotHandled` and let the fragment
    /// exhaust, or `Suspended`) rather than guess.
    pub fn peek(&self, n: usize) -> Option<&[u8]> {
        self.ctx.cursor.peek(n)
    }

    /// Fields extracted so far. Notably `destination` is already populated by the time `data`
    /// is reached, since `to` precedes `data` in wire order.
    pub fn content(&self) -> &TxContent {
        &self.ctx.content
    }

    /// Consumes `n` bytes from the fragment into `out` (or discards them if `out` is `None`),
    /// hashing them and advancing the field position exactly as the default field handlers do.
    pub fn copy_tx_data(&mut self, out: Option<&mut [u8]>, n: usize) -> Result<(), ParseFault> {
        self.ctx.cursor.copy_tx_data(out, n)
    }

    /// Declares the current field fully consumed: clears the in-payload flag and advances to
    /// the next field in wire order. The processor must call this itself once it has consumed
    /// every declared byte (§4.6): the state machine does not do it automatically for
    /// processor-handled iterations.
    pub fn finish_field(&mut self) {
        self.ctx.cursor.end_field();
        self.ctx.current_field = self.ctx.current_field.next();
    }
}
