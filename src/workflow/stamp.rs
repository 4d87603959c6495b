use super::{average, emit_result};
use crate::backend::BatchSearch;
use crate::core::{recover_stamp, stamp_targets, GrindEngine, TargetConstraint};
use crate::error::{GrindError, Result};
use crate::utils::{decode_hex, strip_hex_prefix};
use log::info;
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StampReport {
    pub payload_len: usize,
    pub keys: usize,
    pub attempts: u64,
}

impl StampReport {
    pub fn average_attempts(&self) -> f64 {
        average(self.attempts, self.keys)
    }
}

/// Payload bytes per key for a mask width; only whole bytes are stamped
pub fn stamp_chunk_bytes(bits: u32) -> Result<usize> {
    match bits {
        8 | 16 | 24 | 32 => Ok((bits / 8) as usize),
        _ => Err(GrindError::InvalidInput(format!(
            "stamp width must be 8, 16, 24 or 32 bits, got {bits}"
        ))),
    }
}

/// Hex payload, tolerating a `0x` prefix and embedded whitespace
pub fn parse_stamp_payload(input: &str) -> Result<Vec<u8>> {
    let compact: String = input.split_whitespace().collect();
    let hex = strip_hex_prefix(&compact);
    if hex.is_empty() {
        return Err(GrindError::InvalidInput("stamp payload is empty".to_string()));
    }
    decode_hex(hex)
}

/// Grind one key per `bits / 8` payload bytes under a top-`bits` mask and
/// check that the keys read back to the payload
pub fn grind_stamp<S: BatchSearch, W: Write>(
    engine: &mut GrindEngine<S>,
    payload: &[u8],
    bits: u32,
    output: &mut W,
) -> Result<StampReport> {
    let chunk_bytes = stamp_chunk_bytes(bits)?;
    let targets = stamp_targets(payload, chunk_bytes)?;
    info!(
        "Stamping {} bytes into {} keys ({bits} bits each)",
        payload.len(),
        targets.len()
    );

    let mut prefixes = Vec::with_capacity(targets.len());
    let mut attempts: u64 = 0;
    for (i, &target) in targets.iter().enumerate() {
        let result = engine.grind(&TargetConstraint::top_bits(target, bits)?)?;
        emit_result(output, &result)?;
        info!("Chunk {i}: {:08x} -> {}", target, result.public_key.to_hex());
        prefixes.push(result.public_key.x_prefix());
        attempts = attempts.saturating_add(result.attempts);
    }

    if recover_stamp(&prefixes, chunk_bytes, payload.len())? != payload {
        return Err(GrindError::ProtocolViolation(
            "stamped keys do not read back to the payload".to_string(),
        ));
    }

    let report = StampReport {
        payload_len: payload.len(),
        keys: targets.len(),
        attempts,
    };
    info!(
        "Done. Stamped {} bytes into {} keys. Avg attempts per key: {:.1}",
        report.payload_len,
        report.keys,
        report.average_attempts()
    );
    Ok(report)
}
