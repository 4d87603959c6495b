use crate::error::{GrindError, Result};
use data_encoding::{HEXLOWER, HEXLOWER_PERMISSIVE};

/// Lowercase hex
pub fn encode_hex(data: &[u8]) -> String {
    HEXLOWER.encode(data)
}

/// Accepts either case
pub fn decode_hex(hex: &str) -> Result<Vec<u8>> {
    HEXLOWER_PERMISSIVE
        .decode(hex.as_bytes())
        .map_err(|e| GrindError::InvalidInput(format!("invalid hex '{hex}': {e}")))
}

/// Decode exactly `len` bytes
pub fn decode_hex_exact(hex: &str, len: usize) -> Result<Vec<u8>> {
    if hex.len() != len * 2 {
        return Err(GrindError::InvalidInput(format!(
            "expected {} hex chars, got {}",
            len * 2,
            hex.len()
        )));
    }
    decode_hex(hex)
}

/// Drop a leading `0x` or `0X`
pub fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}
