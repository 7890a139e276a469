//! Chunked, confirmation-friendly rendering of a `data` field the recognizer couldn't attach
//! token semantics to (§4.7, last bullet). Mirrors the original firmware's on-screen layout:
//! the 4-byte selector once, then each 32-byte word as four 8-byte hex groups joined by `:`.

/// One renderable chunk of an undecoded `data` field, queued for the host to present before the
/// next `continue_tx` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayChunk {
    Selector([u8; 4]),
    Word([u8; 32]),
}

impl DisplayChunk {
    /// Formats the chunk the way the original confirmation screen does: each 8-byte group in
    /// hex, groups joined by `:`.
    pub fn to_hex_groups(&self) -> String {
        let bytes: &[u8] = match self {
            DisplayChunk::Selector(b) => b.as_slice(),
            DisplayChunk::Word(b) => b.as_slice(),
        };
        bytes
            .chunks(8)
            .map(hex::encode)
            .collect::<Vec<_>>()
            .join(":")
    }
}

/// Accumulates payload bytes into selector-then-32-byte-word chunks, handing each completed
/// chunk back to the caller to render and confirm.
#[derive(Debug, Default)]
pub struct RawDataDisplay {
    scratch: [u8; 32],
    scratch_len: usize,
    selector_done: bool,
}

impl RawDataDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeds the selector from bytes the caller already consumed while probing for a token
    /// match (§4.7: the recognizer must buffer four bytes before it can rule a payload out).
    pub fn seed_selector(&mut self, selector: [u8; 4]) -> DisplayChunk {
        self.selector_done = true;
        DisplayChunk::Selector(selector)
    }

    /// Folds `byte` into the current chunk (4 bytes if the selector hasn't been rendered yet,
    /// otherwise 32). Returns the completed chunk once the chunk boundary is reached.
    pub fn push_byte(&mut self, byte: u8) -> Option<DisplayChunk> {
        let chunk_len = if self.selector_done { 32 } else { 4 };
        self.scratch[self.scratch_len] = byte;
        self.scratch_len += 1;
        if self.scratch_len < chunk_len {
            return None;
        }
        self.scratch_len = 0;
        if self.selector_done {
            let mut word = [0u8; 32];
            word.copy_from_slice(&self.scratch[..32]);
            Some(DisplayChunk::Word(word))
        } else {
            self.selector_done = true;
            let mut selector = [0u8; 4];
            selector.copy_from_slice(&self.scratch[..4]);
            Some(DisplayChunk::Selector(selector))
        }
    }

    /// Flushes a final, possibly short, word (the last 32-byte group of a data field whose
    /// length isn't a multiple of 32 beyond the selector).
    pub fn flush(&mut self) -> Option<DisplayChunk> {
        if self.scratch_len == 0 {
            return None;
        }
        let mut word = [0u8; 32];
        word[..self.scratch_len].copy_from_slice(&self.scratch[..self.scratch_len]);
        self.scratch_len = 0;
        Some(DisplayChunk::Word(word))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_then_word_chunking() {
        let mut display = RawDataDisplay::new();
        for b in [0xa9, 0x05, 0x9c, 0xbb] {
            if let Some(chunk) = display.push_byte(b) {
                assert_eq!(chunk, DisplayChunk::Selector([0xa9, 0x05, 0x9c, 0xbb]));
            }
        }
        let mut word = None;
        for i in 0..32u8 {
            word = display.push_byte(i);
        }
        assert!(matches!(word, Some(DisplayChunk::Word(_))));
    }

    #[test]
    fn hex_groups_are_colon_joined() {
        let chunk = DisplayChunk::Selector([0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(chunk.to_hex_groups(), "deadbeef");
        let chunk = DisplayChunk::Word([0u8; 32]);
        assert_eq!(
            chunk.to_hex_groups(),
            "0000000000000000:0000000000000000:0000000000000000:0000000000000000"
        );
    }
}
