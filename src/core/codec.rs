//! Bit-packing between byte buffers and 32-bit target chunks
//!
//! The buffer is read as one MSB-first bit stream. Chunk `i` holds bits
//! `[32i, 32i + 32)`; bits past the end of the buffer read as zero.
//! Reconstruction writes back only the first `total_bits` bits.

use crate::core::types::{chunk_count, ChunkSequence};
use crate::error::{GrindError, Result};

const CHUNK_BITS: u64 = 32;

/// Split `buffer` into big-endian 32-bit chunks, zero-padding the last one
pub fn pack(buffer: &[u8]) -> ChunkSequence {
    let chunks = buffer
        .chunks(4)
        .map(|window| {
            let mut word = [0u8; 4];
            word[..window.len()].copy_from_slice(window);
            u32::from_be_bytes(word)
        })
        .collect();
    ChunkSequence::from_packed(chunks, buffer.len() as u64 * 8)
}

/// Rebuild `ceil(total_bits / 8)` bytes from `chunks`.
///
/// Missing chunks leave zero bits behind; bits a chunk would place at or
/// beyond `total_bits` are discarded.
pub fn unpack(chunks: &[u32], total_bits: u64) -> Vec<u8> {
    let mut out = vec![0u8; total_bits.div_ceil(8) as usize];
    write_chunks(&mut out, chunks, total_bits);
    out
}

/// [`unpack`] for untrusted lengths: a buffer that cannot be allocated is an
/// error instead of an abort
pub fn try_unpack(chunks: &[u32], total_bits: u64) -> Result<Vec<u8>> {
    let too_large = || {
        GrindError::InvalidInput(format!(
            "cannot allocate {} bytes for {total_bits} bits",
            total_bits.div_ceil(8)
        ))
    };
    let len = usize::try_from(total_bits.div_ceil(8)).map_err(|_| too_large())?;
    let mut out = Vec::new();
    out.try_reserve_exact(len).map_err(|_| too_large())?;
    out.resize(len, 0);
    write_chunks(&mut out, chunks, total_bits);
    Ok(out)
}

fn write_chunks(out: &mut [u8], chunks: &[u32], total_bits: u64) {
    for (index, &value) in chunks.iter().enumerate() {
        let bit_pos = index as u64 * CHUNK_BITS;
        if bit_pos >= total_bits {
            break;
        }
        if bit_pos + CHUNK_BITS <= total_bits {
            let start = (bit_pos / 8) as usize;
            out[start..start + 4].copy_from_slice(&value.to_be_bytes());
        } else {
            put_partial(out, total_bits, bit_pos, value);
        }
    }
}

// Bit-by-bit write for the final chunk that straddles total_bits
fn put_partial(out: &mut [u8], total_bits: u64, bit_pos: u64, value: u32) {
    for i in 0..CHUNK_BITS {
        let current = bit_pos + i;
        if current >= total_bits {
            break;
        }
        if (value >> (31 - i)) & 1 == 1 {
            let byte_idx = (current / 8) as usize;
            let bit_idx = 7 - (current % 8);
            out[byte_idx] |= 1u8 << bit_idx;
        }
    }
}

impl ChunkSequence {
    pub fn unpack(&self) -> Vec<u8> {
        unpack(self.chunks(), self.total_bits())
    }
}

/// Targets for top-N grinding: each `chunk_bytes`-byte slice of the payload,
/// zero-padded, placed in the most significant bytes of a 32-bit value.
pub fn stamp_targets(payload: &[u8], chunk_bytes: usize) -> Result<Vec<u32>> {
    check_stamp_width(chunk_bytes)?;
    Ok(payload
        .chunks(chunk_bytes)
        .map(|window| {
            let mut word = [0u8; 4];
            word[..window.len()].copy_from_slice(window);
            u32::from_be_bytes(word)
        })
        .collect())
}

/// Inverse of [`stamp_targets`]: read the top `chunk_bytes` of each X prefix
/// and keep the first `len` bytes.
pub fn recover_stamp(prefixes: &[u32], chunk_bytes: usize, len: usize) -> Result<Vec<u8>> {
    check_stamp_width(chunk_bytes)?;
    let needed = len.div_ceil(chunk_bytes);
    if prefixes.len() < needed {
        return Err(GrindError::InvalidInput(format!(
            "{len} stamped bytes need {needed} keys, got {}",
            prefixes.len()
        )));
    }
    let mut out: Vec<u8> = prefixes[..needed]
        .iter()
        .flat_map(|prefix| prefix.to_be_bytes()[..chunk_bytes].to_vec())
        .collect();
    out.truncate(len);
    Ok(out)
}

fn check_stamp_width(chunk_bytes: usize) -> Result<()> {
    if chunk_bytes == 0 || chunk_bytes > 4 {
        return Err(GrindError::InvalidInput(format!(
            "stamp chunk must be 1 to 4 bytes, got {chunk_bytes}"
        )));
    }
    Ok(())
}

/// Number of chunks `pack` produces for a buffer of `len` bytes
pub fn packed_len(len: usize) -> usize {
    chunk_count(len as u64 * 8) as usize
}
