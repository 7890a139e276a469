//! EIP-55 mixed-case address checksumming: the keccak256 of the lowercase hex digits decides,
//! nibble by nibble, which hex characters of the address are rendered uppercase.

use alloy_primitives::Keccak256;

pub fn checksum_address(address: &[u8; 20]) -> String {
    let lower = hex::encode(address);
    let mut hasher = Keccak256::new();
    hasher.update(lower.as_bytes());
    let digest = hasher.finalize();

    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        if c.is_ascii_digit() {
            out.push(c);
            continue;
        }
        let nibble = if i % 2 == 0 {
            digest[i / 2] >> 4
        } else {
            digest[i / 2] & 0x0f
        };
        if nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_eip55_vector() {
        // From EIP-55's reference test vectors.
        let addr: [u8; 20] = hex::decode("5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed")
            .unwrap()
            .try_into()
            .unwrap();
        assert_eq!(checksum_address(&addr), "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
    }

    #[test]
    fn all_lowercase_address() {
        let addr = [0x00u8; 20];
        assert_eq!(
            checksum_address(&addr),
            "0x0000000000000000000000000000000000000000"
        );
    }
}
