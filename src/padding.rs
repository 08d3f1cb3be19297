// PKCS#7 padding.

use crate::error::DesError;

/// Append `n` bytes of value `n`, where `n = block_size - data.len() % block_size`.
///
/// Block-aligned input gets a whole block of padding, so the result is never
/// the same length as the input.
pub fn pad(data: &[u8], block_size: usize) -> Vec<u8> {
    assert!(
        block_size > 0 && block_size <= 255,
        "block_size must be in range 1..255"
    );
    let num_pad_bytes = block_size - (data.len() % block_size);
    let mut result: Vec<u8> = Vec::with_capacity(data.len() + num_pad_bytes);
    result.extend_from_slice(data);
    result.resize(data.len() + num_pad_bytes, num_pad_bytes as u8);
    return result;
}

/// Strip PKCS#7 padding, rejecting anything that `pad` could not have produced.
pub fn unpad(data: &[u8], block_size: usize) -> Result<&[u8], DesError> {
    if data.is_empty() || block_size == 0 || data.len() % block_size != 0 {
        return Err(DesError::InvalidPadding);
    }
    let pad_len = data[data.len() - 1] as usize;
    if pad_len == 0 || pad_len > block_size {
        return Err(DesError::InvalidPadding);
    }
    let (content, trailer) = data.split_at(data.len() - pad_len);
    if trailer.iter().any(|&b| b as usize != pad_len) {
        return Err(DesError::InvalidPadding);
    }
    Ok(content)
}
