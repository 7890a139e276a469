//! Big-endian-integer-to-decimal formatting with a decimals shift — the `adjustDecimals`/
//! `tostring256` pair from `original_source/src/celo.c`, reimplemented without a fixed-width
//! bignum: these amounts are at most 32 bytes, so plain long division is simple and fast enough.

/// Renders a big-endian unsigned integer as decimal digits, with no leading zeros (`"0"` for an
/// all-zero input).
pub fn to_decimal_string(value: &[u8]) -> String {
    if value.iter().all(|&b| b == 0) {
        return "0".to_string();
    }
    let mut digits = value.to_vec();
    let mut out = Vec::new();
    while digits.iter().any(|&b| b != 0) {
        let mut remainder: u32 = 0;
        for byte in digits.iter_mut() {
            let acc = remainder * 256 + *byte as u32;
            *byte = (acc / 10) as u8;
            remainder = acc % 10;
        }
        out.push(std::char::from_digit(remainder, 10).expect("remainder < 10"));
    }
    out.iter().rev().collect()
}

/// Inserts a decimal point `decimals` digits from the right, left-padding with zeros if the
/// integer has fewer digits than that (mirrors `adjustDecimals` formatting a token amount by its
/// declared decimals).
pub fn format_amount(value: &[u8], decimals: u8) -> String {
    let digits = to_decimal_string(value);
    if decimals == 0 {
        return digits;
    }
    let decimals = decimals as usize;
    let padded = if digits.len() <= decimals {
        format!("{:0>width$}", digits, width = decimals + 1)
    } else {
        digits
    };
    let split = padded.len() - decimals;
    format!("{}.{}", &padded[..split], &padded[split..])
}

/// Schoolbook big-endian multiplication, used for `maxFee = gasPrice * startGas`.
pub fn multiply_be(a: &[u8], b: &[u8]) -> Vec<u8> {
    if a.is_empty() || b.is_empty() {
        return vec![0];
    }
    let mut acc = vec![0u32; a.len() + b.len()];
    for (i, &av) in a.iter().rev().enumerate() {
        let mut carry = 0u32;
        for (j, &bv) in b.iter().rev().enumerate() {
            let idx = i + j;
            let prod = av as u32 * bv as u32 + acc[idx] + carry;
            acc[idx] = prod & 0xff;
            carry = prod >> 8;
        }
        let mut k = i + b.len();
        while carry > 0 {
            let sum = acc[k] + carry;
            acc[k] = sum & 0xff;
            carry = sum >> 8;
            k += 1;
        }
    }
    let mut bytes: Vec<u8> = acc.into_iter().rev().map(|v| v as u8).collect();
    while bytes.len() > 1 && bytes[0] == 0 {
        bytes.remove(0);
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_of_zero() {
        assert_eq!(to_decimal_string(&[0, 0, 0]), "0");
    }

    #[test]
    fn decimal_of_known_value() {
        // 0x0de0b6b3a7640000 = 1_000_000_000_000_000_000
        let bytes = [0x0d, 0xe0, 0xb6, 0xb3, 0xa7, 0x64, 0x00, 0x00];
        assert_eq!(to_decimal_string(&bytes), "1000000000000000000");
    }

    #[test]
    fn format_with_18_decimals() {
        let bytes = [0x0d, 0xe0, 0xb6, 0xb3, 0xa7, 0x64, 0x00, 0x00];
        assert_eq!(format_amount(&bytes, 18), "1.000000000000000000");
    }

    #[test]
    fn format_smaller_than_decimals_pads() {
        assert_eq!(format_amount(&[100], 18), "0.000000000000000100");
    }

    #[test]
    fn multiply_small_values() {
        assert_eq!(multiply_be(&[0x05], &[0x0a]), vec![0x32]); // 5 * 10 = 50
    }
}
