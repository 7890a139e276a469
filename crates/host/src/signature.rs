//! DER signature reshaping: turns the `0x30 len 0x02 rlen r.. 0x02 slen s..` DER encoding the
//! secure element produces into the fixed 32-byte (r, s) pair a transaction signature needs.

use crate::error::HostError;

/// A fixed-width (r, s) signature pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RsSignature {
    pub r: [u8; 32],
    pub s: [u8; 32],
}

/// Fits a DER integer component (which may carry a leading `0x00` to keep it non-negative, or be
/// shorter than 32 bytes) into a fixed 32-byte big-endian slot.
fn fit_32(component: &[u8]) -> Result<[u8; 32], HostError> {
    let trimmed = if component.len() == 33 && component[0] == 0 {
        &component[1..]
    } else {
        component
    };
    if trimmed.len() > 32 {
        return Err(HostError::SignatureComponentTooLong);
    }
    let mut out = [0u8; 32];
    out[32 - trimmed.len()..].copy_from_slice(trimmed);
    Ok(out)
}

/// Parses a DER-encoded ECDSA signature into its (r, s) components.
pub fn reshape_der_signature(der: &[u8]) -> Result<RsSignature, HostError> {
    let mut pos = 0usize;
    let mut next = |n: usize| -> Result<&[u8], HostError> {
        let byte = der.get(pos..pos + n).ok_or(HostError::MalformedSignature)?;
        pos += n;
        Ok(byte)
    };

    if next(1)?[0] != 0x30 {
        return Err(HostError::MalformedSignature);
    }
    let total_len = next(1)?[0] as usize;
    if der.len() != pos + total_len {
        return Err(HostError::MalformedSignature);
    }

    if next(1)?[0] != 0x02 {
        return Err(HostError::MalformedSignature);
    }
    let r_len = next(1)?[0] as usize;
    let r = fit_32(next(r_len)?)?;

    if next(1)?[0] != 0x02 {
        return Err(HostError::MalformedSignature);
    }
    let s_len = next(1)?[0] as usize;
    let s = fit_32(next(s_len)?)?;

    if pos != der.len() {
        return Err(HostError::MalformedSignature);
    }

    Ok(RsSignature { r, s })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn der_of(r: &[u8], s: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        body.push(0x02);
        body.push(r.len() as u8);
        body.extend(r);
        body.push(0x02);
        body.push(s.len() as u8);
        body.extend(s);
        let mut out = vec![0x30, body.len() as u8];
        out.extend(body);
        out
    }

    #[test]
    fn reshapes_exact_32_byte_components() {
        let r = [0x11u8; 32];
        let s = [0x22u8; 32];
        let der = der_of(&r, &s);
        let parsed = reshape_der_signature(&der).unwrap();
        assert_eq!(parsed.r, r);
        assert_eq!(parsed.s, s);
    }

    #[test]
    fn strips_der_leading_zero_on_33_byte_component() {
        let mut r33 = [0u8; 33];
        r33[0] = 0x00;
        r33[1..].copy_from_slice(&[0xffu8; 32]);
        let s = [0x01u8; 32];
        let der = der_of(&r33, &s);
        let parsed = reshape_der_signature(&der).unwrap();
        assert_eq!(parsed.r, [0xffu8; 32]);
        assert_eq!(parsed.s, s);
    }

    #[test]
    fn left_pads_short_component() {
        let r = [0x01u8; 16];
        let s = [0x02u8; 32];
        let der = der_of(&r, &s);
        let parsed = reshape_der_signature(&der).unwrap();
        assert_eq!(&parsed.r[..16], &[0u8; 16]);
        assert_eq!(&parsed.r[16..], &[0x01u8; 16]);
    }

    #[test]
    fn truncated_input_faults() {
        let der = [0x30, 0x06, 0x02, 0x02, 0x01, 0x02];
        assert!(matches!(
            reshape_der_signature(&der),
            Err(HostError::MalformedSignature)
        ));
    }

    #[test]
    fn oversized_component_faults() {
        let r = [0xffu8; 40];
        let s = [0x01u8; 32];
        let der = der_of(&r, &s);
        assert!(matches!(
            reshape_der_signature(&der),
            Err(HostError::SignatureComponentTooLong)
        ));
    }
}
