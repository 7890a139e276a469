//! The RLP header pre-decoder (C1 in the design): two pure functions over a byte prefix that
//! decide, a byte at a time, whether enough of an RLP header has arrived to know the payload's
//! length and kind.
//!
//! Neither function owns any state — the staging buffer lives in the caller (the field state
//! machine keeps it small, five bytes, which is what actually bounds how long a header can be;
//! see [`can_decode`]'s doc for why that's enforced by the caller rather than here).

use alloy_rlp::{EMPTY_LIST_CODE, EMPTY_STRING_CODE};

/// A fully decoded RLP header: how many payload bytes follow, how many header bytes were
/// consumed to say so, and whether the payload is a list or a scalar string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedHeader {
    pub payload_length: u32,
    /// Number of bytes occupied by the header itself. Zero for the single self-encoded byte
    /// case (§4.3): there the "header" and the one-byte payload are the same byte, and the
    /// caller must re-present it as payload.
    pub header_length: u32,
    pub is_list: bool,
}

/// Given the bytes accumulated so far (`prefix`), decides whether the header is complete.
///
/// Returns `None` if more bytes are needed. Returns `Some(valid)` once the header length is
/// known: `valid` is `false` for non-canonical encodings — a long-form length whose
/// length-of-length is followed by a leading zero byte, which RLP forbids (the value should
/// have been encoded in fewer bytes, or as a short form).
///
/// This function never rejects a prefix for being "too long" — a length-of-length up to 7 is
/// structurally valid RLP. The five-byte staging buffer that bounds how long a real header can
/// get is the field state machine's concern (§4.4 step 4's overflow check), not this one's.
pub fn can_decode(prefix: &[u8]) -> Option<bool> {
    let &first = prefix.first()?;
    match first {
        0x00..=0x7f => Some(true),
        _ if first < EMPTY_STRING_CODE + 56 => Some(true),
        _ if first < EMPTY_LIST_CODE => {
            let len_of_len = (first - (EMPTY_STRING_CODE + 55)) as usize;
            if prefix.len() < 1 + len_of_len {
                return None;
            }
            Some(prefix[1] != 0x00)
        }
        _ if first < EMPTY_LIST_CODE + 56 => Some(true),
        _ => {
            let len_of_len = (first - (EMPTY_LIST_CODE + 55)) as usize;
            if prefix.len() < 1 + len_of_len {
                return None;
            }
            Some(prefix[1] != 0x00)
        }
    }
}

/// Decodes a complete, valid header. Callers must only invoke this once [`can_decode`] has
/// returned `Some(true)` for this exact prefix; behavior for a prefix `can_decode` would reject
/// or hasn't finished deciding on is unspecified (it returns `None`).
pub fn decode_length(prefix: &[u8]) -> Option<DecodedHeader> {
    let &first = prefix.first()?;
    match first {
        0x00..=0x7f => Some(DecodedHeader {
            payload_length: 1,
            header_length: 0,
            is_list: false,
        }),
        _ if first < EMPTY_STRING_CODE + 56 => Some(DecodedHeader {
            payload_length: (first - EMPTY_STRING_CODE) as u32,
            header_length: 1,
            is_list: false,
        }),
        _ if first < EMPTY_LIST_CODE => {
            let len_of_len = (first - (EMPTY_STRING_CODE + 55)) as usize;
            if prefix.len() < 1 + len_of_len {
                return None;
            }
            Some(DecodedHeader {
                payload_length: be_u32(&prefix[1..1 + len_of_len]),
                header_length: (1 + len_of_len) as u32,
                is_list: false,
            })
        }
        _ if first < EMPTY_LIST_CODE + 56 => Some(DecodedHeader {
            payload_length: (first - EMPTY_LIST_CODE) as u32,
            header_length: 1,
            is_list: true,
        }),
        _ => {
            let len_of_len = (first - (EMPTY_LIST_CODE + 55)) as usize;
            if prefix.len() < 1 + len_of_len {
                return None;
            }
            Some(DecodedHeader {
                payload_length: be_u32(&prefix[1..1 + len_of_len]),
                header_length: (1 + len_of_len) as u32,
                is_list: true,
            })
        }
    }
}

fn be_u32(bytes: &[u8]) -> u32 {
    let mut acc: u32 = 0;
    for &b in bytes {
        acc = (acc << 8) | b as u32;
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_self_encoded_byte() {
        assert_eq!(can_decode(&[0x09]), Some(true));
        let h = decode_length(&[0x09]).unwrap();
        assert_eq!(h.header_length, 0);
        assert_eq!(h.payload_length, 1);
        assert!(!h.is_list);
    }

    #[test]
    fn short_string() {
        // 0x94 = 0x80 + 20, an address-length string header.
        assert_eq!(can_decode(&[0x94]), Some(true));
        let h = decode_length(&[0x94]).unwrap();
        assert_eq!(h.header_length, 1);
        assert_eq!(h.payload_length, 20);
        assert!(!h.is_list);
    }

    #[test]
    fn short_list() {
        assert_eq!(can_decode(&[0xc2]), Some(true));
        let h = decode_length(&[0xc2]).unwrap();
        assert_eq!(h.payload_length, 2);
        assert!(h.is_list);
    }

    #[test]
    fn long_string_needs_more_bytes_then_decodes() {
        // 0xb8 = long string, 1 length-of-length byte follows.
        assert_eq!(can_decode(&[0xb8]), None);
        assert_eq!(can_decode(&[0xb8, 0x90]), Some(true));
        let h = decode_length(&[0xb8, 0x90]).unwrap();
        assert_eq!(h.header_length, 2);
        assert_eq!(h.payload_length, 0x90);
    }

    #[test]
    fn long_string_rejects_leading_zero_length_byte() {
        // Declared length starts with 0x00 — should have been a shorter encoding.
        assert_eq!(can_decode(&[0xb8, 0x00]), Some(false));
    }

    #[test]
    fn long_list_multi_byte_length() {
        let prefix = [0xf9, 0x01, 0x2c];
        assert_eq!(can_decode(&prefix[..1]), None);
        assert_eq!(can_decode(&prefix[..2]), None);
        assert_eq!(can_decode(&prefix[..3]), Some(true));
        let h = decode_length(&prefix).unwrap();
        assert_eq!(h.payload_length, 0x012c);
        assert_eq!(h.header_length, 3);
        assert!(h.is_list);
    }

    #[test]
    fn long_list_rejects_leading_zero_length_byte() {
        assert_eq!(can_decode(&[0xf8, 0x00]), Some(false));
    }
}
