// Bit level helpers shared by the key schedule, the round function and the
// modes. Bit sequences are kept packed in native integers: bit 1 of an n bit
// value is its most significant bit, which matches the numbering used by the
// DES tables.

const HALF_KEY_MASK: u32 = 0x0FFF_FFFF;

/// Load up to 8 bytes into a block, big-endian. Shorter inputs are
/// left-aligned, i.e. the missing trailing bytes are zero.
pub fn block_from_bytes(bytes: &[u8]) -> u64 {
    assert!(bytes.len() <= 8, "a block holds at most 8 bytes");
    let mut result: u64 = 0;
    for &b in bytes.iter() {
        result <<= 8;
        result |= b as u64;
    }
    if bytes.is_empty() {
        return 0;
    }
    if bytes.len() < 8 {
        result <<= 8 * (8 - bytes.len());
    }
    return result;
}

/// Split a block back into its 8 bytes, big-endian.
pub fn block_to_bytes(block: u64) -> [u8; 8] {
    block.to_be_bytes()
}

/// Select bits from the `width` bit value `input` according to `table`.
///
/// Every table entry is a 1-based position counted from the most significant
/// bit of the input. The result has `table.len()` bits, with the bit chosen by
/// the first entry ending up most significant. Entries may repeat (E does).
pub fn permute(input: u64, width: u32, table: &[u8]) -> u64 {
    debug_assert!(width <= 64 && table.len() <= 64);
    let mut result: u64 = 0;
    for &pos in table.iter() {
        debug_assert!(pos >= 1 && pos as u32 <= width);
        result <<= 1;
        result |= (input >> (width - pos as u32)) & 1;
    }
    return result;
}

/// Circular left rotation of a 28 bit key half.
pub fn rotate_left_28(half: u32, shift: u32) -> u32 {
    let shift = shift % 28;
    ((half << shift) | (half >> (28 - shift))) & HALF_KEY_MASK
}

/// Bytewise XOR; the result is as long as the shorter input.
pub fn xor_bytes(a: &[u8], b: &[u8]) -> Vec<u8> {
    a.iter().zip(b.iter()).map(|(x, y)| x ^ y).collect()
}


#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;

    #[test]
    fn block_bytes_are_big_endian() {
        let bytes = [0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF];
        assert_eq!(block_from_bytes(&bytes), 0x0123456789ABCDEF);
        assert_eq!(block_to_bytes(0x0123456789ABCDEF), bytes);
    }

    #[test]
    fn short_input_is_left_aligned() {
        assert_eq!(block_from_bytes(&[0xAA, 0xBB]), 0xAABB000000000000);
        assert_eq!(block_from_bytes(&[]), 0);
    }

    #[test]
    fn inv_block_from_to_bytes() {
        let mut rng = rand::thread_rng();
        for _ in 0..256 {
            let block: u64 = rng.gen();
            assert_eq!(block_from_bytes(&block_to_bytes(block)), block);
        }
    }

    #[test]
    fn permute_uses_one_based_msb_first_positions() {
        // Bit 1 of an 8 bit value is 0x80.
        assert_eq!(permute(0b1000_0000, 8, &[1]), 1);
        assert_eq!(permute(0b1000_0000, 8, &[8]), 0);
        assert_eq!(permute(0b0000_0001, 8, &[8, 1]), 0b10);
        // Reversal table.
        assert_eq!(permute(0b1100_1010, 8, &[8, 7, 6, 5, 4, 3, 2, 1]), 0b0101_0011);
    }

    #[test]
    fn permute_identity_table() {
        let identity: Vec<u8> = (1..=64).collect();
        let mut rng = rand::thread_rng();
        for _ in 0..256 {
            let block: u64 = rng.gen();
            assert_eq!(permute(block, 64, &identity), block);
        }
    }

    #[test]
    fn permute_may_duplicate_bits() {
        assert_eq!(permute(0b10, 2, &[1, 1, 2, 2]), 0b1100);
    }

    #[test]
    fn rotate_wraps_within_28_bits() {
        assert_eq!(rotate_left_28(0x8000000, 1), 0x0000001);
        assert_eq!(rotate_left_28(0xC000000, 2), 0x0000003);
        assert_eq!(rotate_left_28(0x0000001, 2), 0x0000004);
    }

    #[test]
    fn rotating_28_times_is_identity() {
        let mut rng = rand::thread_rng();
        for _ in 0..256 {
            let half: u32 = rng.gen::<u32>() & HALF_KEY_MASK;
            let mut rotated = half;
            for _ in 0..28 {
                rotated = rotate_left_28(rotated, 1);
            }
            assert_eq!(rotated, half);
        }
    }

    #[test]
    fn xor_truncates_to_shorter_input() {
        assert_eq!(xor_bytes(&[0xFF, 0x0F, 0x00], &[0x0F, 0x0F]), vec![0xF0, 0x00]);
    }
}
