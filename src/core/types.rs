use crate::error::{GrindError, Result};
use crate::utils::{decode_hex_exact, encode_hex};
use std::fmt;
use zeroize::Zeroize;

pub const PRIVATE_KEY_LEN: usize = 32;
pub const PUBLIC_KEY_LEN: usize = 33;

/// A 32-byte scalar candidate. Opaque to the engine; the backend decides
/// how to interpret it.
#[derive(Clone, Copy, PartialEq, Eq, Default, Zeroize)]
pub struct PrivateKeyCandidate([u8; PRIVATE_KEY_LEN]);

impl PrivateKeyCandidate {
    pub fn from_bytes(bytes: [u8; PRIVATE_KEY_LEN]) -> Self {
        PrivateKeyCandidate(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; PRIVATE_KEY_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        encode_hex(&self.0)
    }

    pub fn from_hex(hex: &str) -> Result<Self> {
        let bytes = decode_hex_exact(hex, PRIVATE_KEY_LEN)?;
        let mut out = [0u8; PRIVATE_KEY_LEN];
        out.copy_from_slice(&bytes);
        Ok(PrivateKeyCandidate(out))
    }
}

// Key material stays out of logs
impl fmt::Debug for PrivateKeyCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKeyCandidate(..)")
    }
}

/// SEC1 compressed point: prefix byte followed by the 32-byte X coordinate.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PublicKeyPoint([u8; PUBLIC_KEY_LEN]);

impl PublicKeyPoint {
    pub fn from_bytes(bytes: [u8; PUBLIC_KEY_LEN]) -> Self {
        PublicKeyPoint(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.0
    }

    /// Top 32 bits of X, big-endian (bytes 1..5 of the encoding)
    pub fn x_prefix(&self) -> u32 {
        u32::from_be_bytes([self.0[1], self.0[2], self.0[3], self.0[4]])
    }

    pub fn to_hex(&self) -> String {
        encode_hex(&self.0)
    }

    pub fn from_hex(hex: &str) -> Result<Self> {
        let bytes = decode_hex_exact(hex, PUBLIC_KEY_LEN)?;
        let mut out = [0u8; PUBLIC_KEY_LEN];
        out.copy_from_slice(&bytes);
        Ok(PublicKeyPoint(out))
    }
}

impl fmt::Debug for PublicKeyPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKeyPoint({})", self.to_hex())
    }
}

/// Result of one successful grind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrindResult {
    pub private_key: PrivateKeyCandidate,
    pub public_key: PublicKeyPoint,
    pub attempts: u64,
}

impl GrindResult {
    /// `<priv_hex> <pub_hex> <attempts>`, the line format shared by every front end
    pub fn to_line(&self) -> String {
        format!(
            "{} {} {}",
            self.private_key.to_hex(),
            self.public_key.to_hex(),
            self.attempts
        )
    }
}

/// 32-bit windows of a byte buffer plus the number of real bits they carry
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChunkSequence {
    chunks: Vec<u32>,
    total_bits: u64,
}

impl ChunkSequence {
    pub fn new(chunks: Vec<u32>, total_bits: u64) -> Result<ChunkSequence> {
        let expected = chunk_count(total_bits);
        if chunks.len() as u64 != expected {
            return Err(GrindError::InvalidInput(format!(
                "{total_bits} bits need {expected} chunks, got {}",
                chunks.len()
            )));
        }
        Ok(ChunkSequence { chunks, total_bits })
    }

    pub(crate) fn from_packed(chunks: Vec<u32>, total_bits: u64) -> ChunkSequence {
        debug_assert_eq!(chunks.len() as u64, chunk_count(total_bits));
        ChunkSequence { chunks, total_bits }
    }

    pub fn chunks(&self) -> &[u32] {
        &self.chunks
    }

    pub fn total_bits(&self) -> u64 {
        self.total_bits
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

/// ceil(total_bits / 32)
pub fn chunk_count(total_bits: u64) -> u64 {
    total_bits.div_ceil(32)
}

/// Original byte length of an encoded file, persisted as `<file>.meta`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMetadata {
    pub original_len: u64,
}

impl FileMetadata {
    pub fn new(original_len: u64) -> Self {
        FileMetadata { original_len }
    }

    pub fn total_bits(&self) -> u64 {
        self.original_len.saturating_mul(8)
    }

    pub fn chunk_count(&self) -> u64 {
        chunk_count(self.total_bits())
    }

    /// Decimal length, newline-terminated
    pub fn to_file_contents(&self) -> String {
        format!("{}\n", self.original_len)
    }

    /// Reads the first whitespace-separated token as the length
    pub fn parse(contents: &str) -> Result<FileMetadata> {
        let token = contents
            .split_whitespace()
            .next()
            .ok_or_else(|| GrindError::InvalidInput("metadata file is empty".to_string()))?;
        let original_len = token.parse::<u64>().map_err(|e| {
            GrindError::InvalidInput(format!("metadata length '{token}' is not a number: {e}"))
        })?;
        // the bit count must fit u64 and the byte count must be addressable
        if original_len.checked_mul(8).is_none() || usize::try_from(original_len).is_err() {
            return Err(GrindError::InvalidInput(format!(
                "metadata length {original_len} is too large"
            )));
        }
        Ok(FileMetadata { original_len })
    }
}
