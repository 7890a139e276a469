//! The stream cursor (C3): owns the current input fragment and charges every consumed byte to
//! the active field's position and to the hasher, with one deliberate exception.

use ustream_primitives::ParseFault;

use crate::hasher::TxHasher;

/// Advances a borrowed input fragment, feeding the hasher and the active field's position as it
/// goes.
///
/// The single self-encoded byte case (§4.3/§4.4 step 5) is the one place consumption and
/// hashing diverge: that byte is hashed once, while the header is being pre-decoded, then
/// handed back to the field dispatch as `pending_byte` so every field — single-byte or not —
/// goes through the same [`Cursor::copy_tx_data`] path. `copy_tx_data` recognizes the stashed
/// byte and skips hashing it a second time.
pub struct Cursor<'buf, H: TxHasher> {
    work_buffer: &'buf [u8],
    pending_byte: Option<u8>,
    current_field_pos: u32,
    processing_field: bool,
    hasher: H,
}

impl<'buf, H: TxHasher> Cursor<'buf, H> {
    pub fn new(hasher: H) -> Self {
        Self {
            work_buffer: &[],
            pending_byte: None,
            current_field_pos: 0,
            processing_field: false,
            hasher,
        }
    }

    /// Installs a new fragment. Called only from `process_tx`; `continue_tx` leaves whatever is
    /// left of the previous fragment in place.
    pub fn set_buffer(&mut self, bytes: &'buf [u8]) {
        self.work_buffer = bytes;
    }

    pub fn is_empty(&self) -> bool {
        self.pending_byte.is_none() && self.work_buffer.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.work_buffer.len() + self.pending_byte.is_some() as usize
    }

    /// Non-consuming look-ahead into the bytes available in the current fragment, for the
    /// custom-processor hook (C6) to peek at a selector before deciding whether to claim a
    /// field.
    pub fn peek(&self, n: usize) -> Option<&[u8]> {
        self.work_buffer.get(..n)
    }

    pub fn field_pos(&self) -> u32 {
        self.current_field_pos
    }

    pub fn is_processing_field(&self) -> bool {
        self.processing_field
    }

    /// Marks the start of a field's payload: resets the position counter and flips into
    /// payload-consuming mode (§3 invariant 4).
    pub fn begin_field(&mut self) {
        self.processing_field = true;
        self.current_field_pos = 0;
    }

    pub fn end_field(&mut self) {
        self.processing_field = false;
    }

    /// Records that `byte` was already consumed and hashed during header pre-decode, and must
    /// be replayed as the field's one-byte payload without hashing it again.
    pub fn stash_single_byte(&mut self, byte: u8) {
        self.pending_byte = Some(byte);
    }

    /// Reads and hashes a single byte, advancing the field position if a field is active. Used
    /// only while accumulating RLP header bytes (§4.4 step 4), where `processing_field` is
    /// always false, so the pending-byte replay path never applies here.
    pub fn read_byte(&mut self) -> Result<u8, ParseFault> {
        let (&first, rest) = self
            .work_buffer
            .split_first()
            .ok_or(ParseFault::BufferUnderflow)?;
        self.work_buffer = rest;
        if self.processing_field {
            self.current_field_pos += 1;
        }
        self.hasher.update(std::slice::from_ref(&first));
        Ok(first)
    }

    /// Copies (or discards, if `out` is `None`) `n` bytes from the fragment, feeding the hasher
    /// unless this is the replay of a self-encoded single byte already hashed during header
    /// pre-decode.
    pub fn copy_tx_data(&mut self, out: Option<&mut [u8]>, n: usize) -> Result<(), ParseFault> {
        if n == 0 {
            return Ok(());
        }
        if let Some(byte) = self.pending_byte.take() {
            debug_assert_eq!(n, 1, "a stashed single byte is always a one-byte field");
            if let Some(out) = out {
                out[0] = byte;
            }
            if self.processing_field {
                self.current_field_pos += 1;
            }
            return Ok(());
        }
        if self.work_buffer.len() < n {
            return Err(ParseFault::BufferUnderflow);
        }
        let (chunk, rest) = self.work_buffer.split_at(n);
        if let Some(out) = out {
            out.copy_from_slice(chunk);
        }
        self.hasher.update(chunk);
        self.work_buffer = rest;
        if self.processing_field {
            self.current_field_pos += n as u32;
        }
        Ok(())
    }

    pub fn into_hasher(self) -> H {
        self.hasher
    }
}
