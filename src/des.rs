// The DES block cipher as specified in FIPS Publication 46-3.
//
// Blocks are u64 values, halves are u32 values and round keys are 48 bit
// values in the low bits of a u64.

use crate::bits;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Encrypt,
    Decrypt,
}

pub const BLOCK_SIZE: usize = 8;
pub const ROUNDS: usize = 16;

// Initial permutation.
const IP: [u8; 64] = [
    58, 50, 42, 34, 26, 18, 10, 2,
    60, 52, 44, 36, 28, 20, 12, 4,
    62, 54, 46, 38, 30, 22, 14, 6,
    64, 56, 48, 40, 32, 24, 16, 8,
    57, 49, 41, 33, 25, 17,  9, 1,
    59, 51, 43, 35, 27, 19, 11, 3,
    61, 53, 45, 37, 29, 21, 13, 5,
    63, 55, 47, 39, 31, 23, 15, 7,
];

// Final permutation, the inverse of IP.
const IP_INV: [u8; 64] = [
    40, 8, 48, 16, 56, 24, 64, 32,
    39, 7, 47, 15, 55, 23, 63, 31,
    38, 6, 46, 14, 54, 22, 62, 30,
    37, 5, 45, 13, 53, 21, 61, 29,
    36, 4, 44, 12, 52, 20, 60, 28,
    35, 3, 43, 11, 51, 19, 59, 27,
    34, 2, 42, 10, 50, 18, 58, 26,
    33, 1, 41,  9, 49, 17, 57, 25,
];

// Expansion of the right half from 32 to 48 bits.
const E: [u8; 48] = [
    32,  1,  2,  3,  4,  5,
     4,  5,  6,  7,  8,  9,
     8,  9, 10, 11, 12, 13,
    12, 13, 14, 15, 16, 17,
    16, 17, 18, 19, 20, 21,
    20, 21, 22, 23, 24, 25,
    24, 25, 26, 27, 28, 29,
    28, 29, 30, 31, 32,  1,
];

// Permutation of the S-box output.
const P: [u8; 32] = [
    16,  7, 20, 21, 29, 12, 28, 17,
     1, 15, 23, 26,  5, 18, 31, 10,
     2,  8, 24, 14, 32, 27,  3,  9,
    19, 13, 30,  6, 22, 11,  4, 25,
];

// Permuted choice 1: drops the parity bits, 64 -> 56 bits.
const PC1: [u8; 56] = [
    57, 49, 41, 33, 25, 17,  9,
     1, 58, 50, 42, 34, 26, 18,
    10,  2, 59, 51, 43, 35, 27,
    19, 11,  3, 60, 52, 44, 36,
    63, 55, 47, 39, 31, 23, 15,
     7, 62, 54, 46, 38, 30, 22,
    14,  6, 61, 53, 45, 37, 29,
    21, 13,  5, 28, 20, 12,  4,
];

// Permuted choice 2: 56 -> 48 bits.
const PC2: [u8; 48] = [
    14, 17, 11, 24,  1,  5,
     3, 28, 15,  6, 21, 10,
    23, 19, 12,  4, 26,  8,
    16,  7, 27, 20, 13,  2,
    41, 52, 31, 37, 47, 55,
    30, 40, 51, 45, 33, 48,
    44, 49, 39, 56, 34, 53,
    46, 42, 50, 36, 29, 32,
];

// Left rotations of C and D before each round.
const SHIFTS: [u32; ROUNDS] = [1, 1, 2, 2, 2, 2, 2, 2, 1, 2, 2, 2, 2, 2, 2, 1];

// Each box is 4 rows of 16 columns, row-major.
const S_BOXES: [[u8; 64]; 8] = [
    [
        14,  4, 13,  1,  2, 15, 11,  8,  3, 10,  6, 12,  5,  9,  0,  7,
         0, 15,  7,  4, 14,  2, 13,  1, 10,  6, 12, 11,  9,  5,  3,  8,
         4,  1, 14,  8, 13,  6,  2, 11, 15, 12,  9,  7,  3, 10,  5,  0,
        15, 12,  8,  2,  4,  9,  1,  7,  5, 11,  3, 14, 10,  0,  6, 13,
    ],
    [
        15,  1,  8, 14,  6, 11,  3,  4,  9,  7,  2, 13, 12,  0,  5, 10,
         3, 13,  4,  7, 15,  2,  8, 14, 12,  0,  1, 10,  6,  9, 11,  5,
         0, 14,  7, 11, 10,  4, 13,  1,  5,  8, 12,  6,  9,  3,  2, 15,
        13,  8, 10,  1,  3, 15,  4,  2, 11,  6,  7, 12,  0,  5, 14,  9,
    ],
    [
        10,  0,  9, 14,  6,  3, 15,  5,  1, 13, 12,  7, 11,  4,  2,  8,
        13,  7,  0,  9,  3,  4,  6, 10,  2,  8,  5, 14, 12, 11, 15,  1,
        13,  6,  4,  9,  8, 15,  3,  0, 11,  1,  2, 12,  5, 10, 14,  7,
         1, 10, 13,  0,  6,  9,  8,  7,  4, 15, 14,  3, 11,  5,  2, 12,
    ],
    [
         7, 13, 14,  3,  0,  6,  9, 10,  1,  2,  8,  5, 11, 12,  4, 15,
        13,  8, 11,  5,  6, 15,  0,  3,  4,  7,  2, 12,  1, 10, 14,  9,
        10,  6,  9,  0, 12, 11,  7, 13, 15,  1,  3, 14,  5,  2,  8,  4,
         3, 15,  0,  6, 10,  1, 13,  8,  9,  4,  5, 11, 12,  7,  2, 14,
    ],
    [
         2, 12,  4,  1,  7, 10, 11,  6,  8,  5,  3, 15, 13,  0, 14,  9,
        14, 11,  2, 12,  4,  7, 13,  1,  5,  0, 15, 10,  3,  9,  8,  6,
         4,  2,  1, 11, 10, 13,  7,  8, 15,  9, 12,  5,  6,  3,  0, 14,
        11,  8, 12,  7,  1, 14,  2, 13,  6, 15,  0,  9, 10,  4,  5,  3,
    ],
    [
        12,  1, 10, 15,  9,  2,  6,  8,  0, 13,  3,  4, 14,  7,  5, 11,
        10, 15,  4,  2,  7, 12,  9,  5,  6,  1, 13, 14,  0, 11,  3,  8,
         9, 14, 15,  5,  2,  8, 12,  3,  7,  0,  4, 10,  1, 13, 11,  6,
         4,  3,  2, 12,  9,  5, 15, 10, 11, 14,  1,  7,  6,  0,  8, 13,
    ],
    [
         4, 11,  2, 14, 15,  0,  8, 13,  3, 12,  9,  7,  5, 10,  6,  1,
        13,  0, 11,  7,  4,  9,  1, 10, 14,  3,  5, 12,  2, 15,  8,  6,
         1,  4, 11, 13, 12,  3,  7, 14, 10, 15,  6,  8,  0,  5,  9,  2,
         6, 11, 13,  8,  1,  4, 10,  7,  9,  5,  0, 15, 14,  2,  3, 12,
    ],
    [
        13,  2,  8,  4,  6, 15, 11,  1, 10,  9,  3, 14,  5,  0, 12,  7,
         1, 15, 13,  8, 10,  3,  7,  4, 12,  5,  6, 11,  0, 14,  9,  2,
         7, 11,  4,  1,  9, 12, 14,  2,  0,  6, 10, 13, 15,  3,  5,  8,
         2,  1, 14,  7,  4, 10,  8, 13, 15, 12,  9,  0,  3,  5,  6, 11,
    ],
];


/// Derive the 16 round keys (48 bits each) from a 64 bit key.
///
/// The keys are returned in encryption order. The parity bits of the key
/// (the low bit of every byte) are dropped by PC-1 and have no influence.
pub fn generate_round_keys(key: u64) -> [u64; ROUNDS] {
    let mut keys: [u64; ROUNDS] = [0; ROUNDS];

    let cd = bits::permute(key, 64, &PC1);
    let mut c = (cd >> 28) as u32;
    let mut d = (cd & 0x0FFF_FFFF) as u32;

    for (round, &shift) in SHIFTS.iter().enumerate() {
        c = bits::rotate_left_28(c, shift);
        d = bits::rotate_left_28(d, shift);
        let joined = ((c as u64) << 28) | d as u64;
        keys[round] = bits::permute(joined, 56, &PC2);
    }

    return keys;
}

/// The round function f(R, K).
pub fn feistel(right: u32, round_key: u64) -> u32 {
    let mixed = bits::permute(right as u64, 32, &E) ^ round_key;

    let mut substituted: u64 = 0;
    for (i, sbox) in S_BOXES.iter().enumerate() {
        let group = (mixed >> (42 - 6 * i)) & 0x3F;
        let row = ((group >> 4) & 0b10) | (group & 0b01);
        let column = (group >> 1) & 0xF;
        substituted <<= 4;
        substituted |= sbox[(row * 16 + column) as usize] as u64;
    }

    bits::permute(substituted, 32, &P) as u32
}

/// Run one block through IP, the 16 rounds and IP^-1.
///
/// Decryption is the same network with the round keys consumed in reverse.
pub fn process_block(block: u64, keys: &[u64; ROUNDS], action: Action) -> u64 {
    let permuted = bits::permute(block, 64, &IP);
    let mut left = (permuted >> 32) as u32;
    let mut right = permuted as u32;

    let mut round = |key: u64| {
        let next_right = left ^ feistel(right, key);
        left = right;
        right = next_right;
    };
    match action {
        Action::Encrypt => keys.iter().for_each(|&k| round(k)),
        Action::Decrypt => keys.iter().rev().for_each(|&k| round(k)),
    }

    // The swap of the last round is undone: the output is R16 L16.
    let preoutput = ((right as u64) << 32) | left as u64;
    return bits::permute(preoutput, 64, &IP_INV);
}

pub fn encrypt_block(block: u64, keys: [u64; ROUNDS]) -> u64 {
    process_block(block, &keys, Action::Encrypt)
}

pub fn decrypt_block(block: u64, keys: [u64; ROUNDS]) -> u64 {
    process_block(block, &keys, Action::Decrypt)
}


#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;

    #[test]
    fn known_answer() {
        let keys = generate_round_keys(0x133457799BBCDFF1);
        assert_eq!(encrypt_block(0x0123456789ABCDEF, keys), 0x85E813540F0AB405);
        assert_eq!(decrypt_block(0x85E813540F0AB405, keys), 0x0123456789ABCDEF);
    }

    #[test]
    fn key_schedule_matches_worked_example() {
        // Round keys K1, K2 and K16 for key 133457799BBCDFF1.
        let keys = generate_round_keys(0x133457799BBCDFF1);
        assert_eq!(keys[0], 0x1B02EFFC7072);
        assert_eq!(keys[1], 0x79AED9DBC9E5);
        assert_eq!(keys[15], 0xCB3D8B0E17F5);
    }

    #[test]
    fn round_keys_fit_in_48_bits() {
        let mut rng = rand::thread_rng();
        for _ in 0..64 {
            let keys = generate_round_keys(rng.gen());
            for &k in keys.iter() {
                assert_eq!(k >> 48, 0);
            }
        }
    }

    #[test]
    fn parity_bits_do_not_affect_round_keys() {
        let mut rng = rand::thread_rng();
        for _ in 0..64 {
            let key: u64 = rng.gen();
            let flipped = key ^ 0x0101010101010101;
            assert_eq!(generate_round_keys(key), generate_round_keys(flipped));
        }
    }

    #[test]
    fn feistel_first_round_of_worked_example() {
        // R0 = F0AAF0AA after IP, K1 as above, f(R0, K1) = 234AA9BB.
        assert_eq!(feistel(0xF0AAF0AA, 0x1B02EFFC7072), 0x234AA9BB);
    }

    #[test]
    fn ip_and_inverse_cancel() {
        let mut rng = rand::thread_rng();
        for _ in 0..256 {
            let block: u64 = rng.gen();
            let there = bits::permute(block, 64, &IP);
            assert_eq!(bits::permute(there, 64, &IP_INV), block);
        }
    }

    #[test]
    fn inv_encrypt_decrypt_block() {
        let mut rng = rand::thread_rng();
        for _ in 0..256 {
            let block: u64 = rng.gen();
            let keys = generate_round_keys(rng.gen());
            let encrypted = encrypt_block(block, keys);
            assert_eq!(decrypt_block(encrypted, keys), block);
        }
    }

    #[test]
    fn direction_matters() {
        let keys = generate_round_keys(0x133457799BBCDFF1);
        let block = 0x0123456789ABCDEF;
        assert_ne!(
            process_block(block, &keys, Action::Encrypt),
            process_block(block, &keys, Action::Decrypt)
        );
    }
}
