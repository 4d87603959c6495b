//! Front ends built on the grind engine
//!
//! - `encode` / `decode`: a file as a list of key pairs whose X prefixes
//!   spell out its bits, and back.
//! - `stream`: line-oriented request/response grinding over stdin/stdout.
//! - `hash`: anchor one hex hash, four bytes per key.
//! - `stamp`: anchor a short payload a few bytes per key under a top-N mask.

pub mod decode;
pub mod encode;
pub mod hash;
pub mod stamp;
pub mod stream;

pub use decode::{decode_file, decode_pubkeys, DecodeReport};
pub use encode::{encode_file, EncodeReport};
pub use hash::{grind_hash, parse_hash_targets, HashReport};
pub use stamp::{grind_stamp, parse_stamp_payload, stamp_chunk_bytes, StampReport};
pub use stream::{parse_stream_line, run_grind_stream, stream_mask_bits, StreamLine, StreamSummary};

use crate::core::GrindResult;
use crate::error::{GrindError, Result};
use std::io::Write;

/// Write `<priv_hex> <pub_hex> <attempts>` and flush so a reader on the
/// other end of a pipe sees it immediately
pub(crate) fn emit_result<W: Write>(output: &mut W, result: &GrindResult) -> Result<()> {
    writeln!(output, "{}", result.to_line())
        .and_then(|_| output.flush())
        .map_err(|e| GrindError::stream("write result", e))
}

pub(crate) fn average(total: u64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total as f64 / count as f64
    }
}
