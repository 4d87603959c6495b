use super::{average, emit_result};
use crate::backend::BatchSearch;
use crate::core::{GrindEngine, TargetConstraint};
use crate::error::{GrindError, Result};
use crate::utils::decode_hex;
use log::{error, info};
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashReport {
    pub chunks: usize,
    pub attempts: u64,
}

impl HashReport {
    pub fn average_attempts(&self) -> f64 {
        average(self.attempts, self.chunks)
    }
}

/// Split a hex hash into big-endian 32-bit targets.
///
/// The hex must be non-empty, of even length and a multiple of 8 chars.
pub fn parse_hash_targets(hex: &str) -> Result<Vec<u32>> {
    if hex.is_empty() || hex.len() % 2 != 0 {
        return Err(GrindError::InvalidInput(
            "Hash hex must have an even number of characters".to_string(),
        ));
    }
    if hex.len() % 8 != 0 {
        return Err(GrindError::InvalidInput(
            "Hash length must be a multiple of 8 hex chars (32 bits per chunk)".to_string(),
        ));
    }
    let bytes = decode_hex(hex)
        .map_err(|e| GrindError::InvalidInput(format!("Invalid hash hex string: {e}")))?;
    Ok(bytes
        .chunks_exact(4)
        .map(|c| u32::from_be_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// Grind one full-32-bit key per target, one result line each
pub fn grind_hash<S: BatchSearch, W: Write>(
    engine: &mut GrindEngine<S>,
    targets: &[u32],
    output: &mut W,
) -> Result<HashReport> {
    info!(
        "Grinding hash of {} bytes into {} 32-bit chunks...",
        targets.len() * 4,
        targets.len()
    );

    let mut attempts: u64 = 0;
    for (i, &target) in targets.iter().enumerate() {
        let result = engine.grind(&TargetConstraint::full(target)).map_err(|e| {
            if e.is_fatal() {
                error!("Grinding failed on chunk {i}");
            }
            e
        })?;
        emit_result(output, &result)?;
        attempts = attempts.saturating_add(result.attempts);
    }

    let report = HashReport {
        chunks: targets.len(),
        attempts,
    };
    info!(
        "Done. Generated {} keys. Avg attempts per chunk: {:.1}",
        report.chunks,
        report.average_attempts()
    );
    Ok(report)
}
