use thiserror::Error;

/// Everything that can go wrong while encrypting or decrypting.
///
/// All of these are input validation failures. Nothing is retried and no
/// partial output is returned alongside an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DesError {
    #[error("DES key must be exactly 8 bytes (16 hex digits or 8 raw bytes)")]
    InvalidKeyLength,

    #[error("IV must be exactly 8 bytes (16 hex digits or 8 raw bytes)")]
    InvalidIvLength,

    #[error("unsupported cipher mode `{0}` (expected ecb or cfb)")]
    UnsupportedMode(String),

    #[error("invalid PKCS#7 padding")]
    InvalidPadding,

    #[error("ciphertext is not valid hexadecimal")]
    InvalidCiphertextEncoding,

    #[error("decrypted data is not valid UTF-8 text")]
    InvalidUtf8,

    #[error("CFB mode requires an IV for decryption")]
    MissingIv,
}
