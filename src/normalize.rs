// Turning user supplied key and IV strings into 8 byte values.

use crate::error::DesError;

const MATERIAL_LEN: usize = 8;

/// Normalize a key string to 8 bytes with odd parity in every byte.
///
/// Exactly 16 hex digits (after trimming) are decoded; any other string is
/// taken as its raw UTF-8 bytes, which must then be exactly 8 bytes long.
pub fn normalize_key(key: &str) -> Result<[u8; 8], DesError> {
    let mut bytes = decode_material(key).ok_or(DesError::InvalidKeyLength)?;
    for b in bytes.iter_mut() {
        *b = set_odd_parity(*b);
    }
    Ok(bytes)
}

/// Normalize an IV string to 8 bytes. Same rules as keys, minus the parity.
pub fn normalize_iv(iv: &str) -> Result<[u8; 8], DesError> {
    decode_material(iv).ok_or(DesError::InvalidIvLength)
}

pub fn has_odd_parity(b: u8) -> bool {
    b.count_ones() % 2 == 1
}

/// Flip the low (parity) bit if the byte has an even number of set bits.
pub fn set_odd_parity(b: u8) -> u8 {
    if has_odd_parity(b) {
        b
    } else {
        b ^ 1
    }
}

fn decode_material(input: &str) -> Option<[u8; 8]> {
    let trimmed = input.trim();
    let decoded = if trimmed.chars().count() == 2 * MATERIAL_LEN {
        hex::decode(trimmed).ok()
    } else {
        None
    };
    let bytes = decoded.unwrap_or_else(|| input.as_bytes().to_vec());

    if bytes.len() != MATERIAL_LEN {
        return None;
    }
    let mut result = [0u8; MATERIAL_LEN];
    result.copy_from_slice(&bytes);
    Some(result)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_key_is_decoded_with_parity() {
        let key = normalize_key("0102030405060708").unwrap();
        assert_eq!(key, [0x01, 0x02, 0x02, 0x04, 0x04, 0x07, 0x07, 0x08]);
        assert!(key.iter().all(|&b| has_odd_parity(b)));
    }

    #[test]
    fn raw_key_is_used_as_utf8() {
        let key = normalize_key("ABCDEFGH").unwrap();
        // 'A' = 0x41 has two bits set, so its parity bit flips.
        assert_eq!(key, [0x40, 0x43, 0x43, 0x45, 0x45, 0x46, 0x46, 0x49]);
        assert!(key.iter().all(|&b| has_odd_parity(b)));
    }

    #[test]
    fn hex_is_case_insensitive_and_trimmed() {
        assert_eq!(
            normalize_key("  133457799bbcdff1\n").unwrap(),
            normalize_key("133457799BBCDFF1").unwrap()
        );
    }

    #[test]
    fn sixteen_non_hex_chars_are_too_long() {
        assert_eq!(
            normalize_key("not a hex string"),
            Err(DesError::InvalidKeyLength)
        );
    }

    #[test]
    fn wrong_lengths_are_rejected() {
        assert_eq!(normalize_key(""), Err(DesError::InvalidKeyLength));
        assert_eq!(normalize_key("short"), Err(DesError::InvalidKeyLength));
        assert_eq!(normalize_key("0123456789"), Err(DesError::InvalidKeyLength));
        assert_eq!(normalize_iv("nine char"), Err(DesError::InvalidIvLength));
    }

    #[test]
    fn multibyte_utf8_counts_bytes() {
        // Four 2-byte characters.
        assert_eq!(normalize_key("ääää").map(|k| k.len()), Ok(8));
        assert_eq!(normalize_iv("ää"), Err(DesError::InvalidIvLength));
    }

    #[test]
    fn iv_keeps_its_bits() {
        assert_eq!(
            normalize_iv("0000000000000000").unwrap(),
            [0u8; 8]
        );
        assert_eq!(normalize_iv("ABCDEFGH").unwrap(), *b"ABCDEFGH");
    }

    #[test]
    fn parity_is_odd_for_every_byte() {
        for b in 0..=255u8 {
            let adjusted = set_odd_parity(b);
            assert!(has_odd_parity(adjusted));
            assert_eq!(adjusted & 0xFE, b & 0xFE);
        }
    }
}
