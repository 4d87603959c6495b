use super::{average, emit_result};
use crate::backend::BatchSearch;
use crate::core::{GrindEngine, TargetConstraint, FULL_MASK_BITS};
use crate::error::{GrindError, Result};
use crate::utils::{decode_hex_exact, strip_hex_prefix};
use log::{info, warn};
use std::io::{BufRead, Write};

const TARGET_HEX_LEN: usize = 8;

/// One classified input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamLine {
    Blank,
    Quit,
    Target(u32),
    Malformed(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamSummary {
    pub processed: usize,
    pub skipped: usize,
    pub attempts: u64,
    /// Targets read but not answered because the session was cancelled
    pub unanswered: usize,
    pub cancelled: bool,
}

impl StreamSummary {
    pub fn average_attempts(&self) -> f64 {
        average(self.attempts, self.processed)
    }
}

/// Accepts `deadbeef`, `0xdeadbeef`, surrounding whitespace, `quit`, `exit`
pub fn parse_stream_line(line: &str) -> StreamLine {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return StreamLine::Blank;
    }
    if trimmed == "quit" || trimmed == "exit" {
        return StreamLine::Quit;
    }
    let hex = strip_hex_prefix(trimmed);
    if hex.len() != TARGET_HEX_LEN {
        return StreamLine::Malformed(format!(
            "Expected {TARGET_HEX_LEN} hex chars, got: {hex}"
        ));
    }
    match decode_hex_exact(hex, 4) {
        Ok(bytes) => StreamLine::Target(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])),
        Err(e) => StreamLine::Malformed(e.to_string()),
    }
}

/// Mask width for a session; anything outside 1..=32 means full 32 bits
pub fn stream_mask_bits(requested: Option<u32>) -> u32 {
    match requested {
        None => FULL_MASK_BITS,
        Some(bits) if (1..=FULL_MASK_BITS).contains(&bits) => bits,
        Some(bits) => {
            warn!("Mask width {bits} out of range, using {FULL_MASK_BITS} bits");
            FULL_MASK_BITS
        }
    }
}

/// Grind one key per target line until end of input, `quit`/`exit`, or
/// cancellation.
///
/// Malformed lines are reported and skipped. Backend failures end the
/// session with an error.
pub fn run_grind_stream<S, R, W>(
    engine: &mut GrindEngine<S>,
    bits: u32,
    input: R,
    output: &mut W,
) -> Result<StreamSummary>
where
    S: BatchSearch,
    R: BufRead,
    W: Write,
{
    // validates the width once for the whole session
    let session_mask = TargetConstraint::top_bits(0, bits)?;
    info!(
        "Grind stream started. Bits: {bits}, Mask: {:08X}",
        session_mask.mask()
    );

    let cancel = engine.cancel_token();
    let mut summary = StreamSummary::default();
    let mut lines = input.lines();
    loop {
        // a pending stop must not consume another request
        if cancel.is_cancelled() {
            summary.cancelled = true;
            break;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.map_err(|e| GrindError::stream("read target line", e))?;
        let target = match parse_stream_line(&line) {
            StreamLine::Blank => continue,
            StreamLine::Quit => break,
            StreamLine::Malformed(reason) => {
                warn!("{reason}");
                summary.skipped += 1;
                continue;
            }
            StreamLine::Target(target) => target,
        };

        let constraint = TargetConstraint::top_bits(target, bits)?;
        match engine.grind(&constraint) {
            Ok(result) => {
                emit_result(output, &result)?;
                summary.processed += 1;
                summary.attempts = summary.attempts.saturating_add(result.attempts);
            }
            Err(GrindError::Cancelled) => {
                warn!("Target {target:08x} left unanswered, grind cancelled");
                summary.unanswered += 1;
                summary.cancelled = true;
                break;
            }
            Err(e) => return Err(e),
        }
    }

    info!(
        "Grind stream finished: {} keys, {} skipped lines, {} unanswered, avg attempts {:.1}",
        summary.processed,
        summary.skipped,
        summary.unanswered,
        summary.average_attempts()
    );
    Ok(summary)
}
