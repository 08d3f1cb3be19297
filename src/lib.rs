//! DES (FIPS Publication 46-3) with two modes of operation.
//!
//! * ECB: every block is encrypted on its own, PKCS#7 padding.
//! * CFB: 64 bit cipher feedback, usable as a stream cipher, no padding.
//!
//! The string level entry points are [`encrypt`] and [`decrypt`]. Keys and
//! IVs are given either as 16 hex digits or as 8 raw bytes of UTF-8 text;
//! ciphertexts and IVs are returned as lowercase hex.
//!
//! ```
//! let (ciphertext, iv) = des_modes::encrypt("attack at dawn", "ABCDEFGH", "cfb", None).unwrap();
//! let plaintext = des_modes::decrypt(&ciphertext, "ABCDEFGH", "cfb", iv.as_deref()).unwrap();
//! assert_eq!(plaintext, "attack at dawn");
//! ```

pub mod bits;
pub mod des;
pub mod error;
pub mod normalize;
pub mod padding;

use rand::prelude::*;
use rand::rngs::OsRng;

use std::fmt;
use std::str::FromStr;

pub use crate::error::DesError;
pub use crate::normalize::{normalize_iv, normalize_key};


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Ecb,
    Cfb,
}

impl FromStr for Mode {
    type Err = DesError;

    /// Accepts `ecb` or `cfb` in any letter case.
    fn from_str(s: &str) -> Result<Mode, DesError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ecb" => Ok(Mode::Ecb),
            "cfb" => Ok(Mode::Cfb),
            _ => Err(DesError::UnsupportedMode(s.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Ecb => write!(f, "ECB"),
            Mode::Cfb => write!(f, "CFB"),
        }
    }
}


pub struct ECB;
impl ECB {
    pub fn new() -> ECB { ECB }
}

pub struct CFB {
    iv: u64,
}
impl CFB {
    pub fn new(iv: u64) -> CFB {
        CFB { iv: iv }
    }
}

/// A mode of operation over the DES block cipher.
///
/// Both directions derive the round keys from `key` for the duration of the
/// call only.
pub trait Cipher {
    fn encrypt(&self, plaintext: &[u8], key: u64) -> Vec<u8>;
    fn decrypt(&self, ciphertext: &[u8], key: u64) -> Result<Vec<u8>, DesError>;
}

impl Cipher for ECB {
    fn encrypt(&self, plaintext: &[u8], key: u64) -> Vec<u8> {
        let keys = des::generate_round_keys(key);
        let padded = padding::pad(plaintext, des::BLOCK_SIZE);
        let mut result: Vec<u8> = Vec::with_capacity(padded.len());
        for block in padded.chunks(des::BLOCK_SIZE) {
            let encrypted = des::encrypt_block(bits::block_from_bytes(block), keys);
            result.extend_from_slice(&bits::block_to_bytes(encrypted));
        }
        return result;
    }

    fn decrypt(&self, ciphertext: &[u8], key: u64) -> Result<Vec<u8>, DesError> {
        // A padded message is never empty and always block-aligned.
        if ciphertext.is_empty() || ciphertext.len() % des::BLOCK_SIZE != 0 {
            return Err(DesError::InvalidPadding);
        }
        let keys = des::generate_round_keys(key);
        let mut result: Vec<u8> = Vec::with_capacity(ciphertext.len());
        for block in ciphertext.chunks(des::BLOCK_SIZE) {
            let decrypted = des::decrypt_block(bits::block_from_bytes(block), keys);
            result.extend_from_slice(&bits::block_to_bytes(decrypted));
        }
        let content_len = padding::unpad(&result, des::BLOCK_SIZE)?.len();
        result.truncate(content_len);
        return Ok(result);
    }
}

impl Cipher for CFB {
    fn encrypt(&self, plaintext: &[u8], key: u64) -> Vec<u8> {
        let keys = des::generate_round_keys(key);
        let mut result: Vec<u8> = Vec::with_capacity(plaintext.len());
        let mut register = self.iv;

        for chunk in plaintext.chunks(des::BLOCK_SIZE) {
            let keystream = bits::block_to_bytes(des::encrypt_block(register, keys));
            let encrypted = bits::xor_bytes(chunk, &keystream);
            register = bits::block_from_bytes(&encrypted);
            result.extend_from_slice(&encrypted);
        }
        return result;
    }

    fn decrypt(&self, ciphertext: &[u8], key: u64) -> Result<Vec<u8>, DesError> {
        let keys = des::generate_round_keys(key);
        let mut result: Vec<u8> = Vec::with_capacity(ciphertext.len());
        let mut register = self.iv;

        for chunk in ciphertext.chunks(des::BLOCK_SIZE) {
            // Feed back what was received, never the recovered plaintext.
            let keystream = bits::block_to_bytes(des::encrypt_block(register, keys));
            result.extend(bits::xor_bytes(chunk, &keystream));
            register = bits::block_from_bytes(chunk);
        }
        return Ok(result);
    }
}


/// Encrypt `plaintext` and return `(ciphertext_hex, iv_hex)`.
///
/// ECB ignores `iv` and returns `None` for it. CFB uses the given IV or, if
/// there is none, a fresh random one; either way the IV used is returned.
pub fn encrypt(
    plaintext: &str,
    key: &str,
    mode: &str,
    iv: Option<&str>,
) -> Result<(String, Option<String>), DesError> {
    let mode: Mode = mode.parse()?;
    let key = bits::block_from_bytes(&normalize_key(key)?);

    match mode {
        Mode::Ecb => {
            let ciphertext = ECB::new().encrypt(plaintext.as_bytes(), key);
            Ok((hex::encode(ciphertext), None))
        }
        Mode::Cfb => {
            let iv = match iv {
                Some(iv) => normalize_iv(iv)?,
                None => generate_iv(),
            };
            let ciphertext = CFB::new(bits::block_from_bytes(&iv)).encrypt(plaintext.as_bytes(), key);
            Ok((hex::encode(ciphertext), Some(hex::encode(iv))))
        }
    }
}

/// Decrypt hex encoded `ciphertext_hex` back to text.
pub fn decrypt(
    ciphertext_hex: &str,
    key: &str,
    mode: &str,
    iv: Option<&str>,
) -> Result<String, DesError> {
    let mode: Mode = mode.parse()?;
    let key = bits::block_from_bytes(&normalize_key(key)?);

    let cipher: Box<dyn Cipher> = match mode {
        Mode::Ecb => Box::new(ECB::new()),
        Mode::Cfb => {
            let iv = normalize_iv(iv.ok_or(DesError::MissingIv)?)?;
            Box::new(CFB::new(bits::block_from_bytes(&iv)))
        }
    };

    let ciphertext = hex::decode(ciphertext_hex.trim())
        .map_err(|_| DesError::InvalidCiphertextEncoding)?;
    let plaintext = cipher.decrypt(&ciphertext, key)?;
    String::from_utf8(plaintext).map_err(|_| DesError::InvalidUtf8)
}

/// A fresh IV from the operating system's random source.
pub fn generate_iv() -> [u8; 8] {
    let mut iv: [u8; 8] = [0; 8];
    OsRng.fill_bytes(&mut iv);
    return iv;
}
