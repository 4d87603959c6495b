use super::average;
use crate::backend::BatchSearch;
use crate::core::{pack, FileMetadata, GrindEngine, TargetConstraint};
use crate::error::{GrindError, Result};
use crate::utils::ArtifactPaths;
use log::info;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

const PROGRESS_EVERY: usize = 16;

#[derive(Debug, Clone, PartialEq)]
pub struct EncodeReport {
    pub paths: ArtifactPaths,
    pub original_len: u64,
    pub chunks: usize,
    pub attempts: u64,
}

impl EncodeReport {
    pub fn average_attempts(&self) -> f64 {
        average(self.attempts, self.chunks)
    }
}

/// Grind one full-32-bit key per chunk of `input`.
///
/// Writes `<input>.meta` first, then appends one line per chunk to
/// `<input>.privkeys.txt` and `<input>.realpubkeys.txt` in chunk order.
pub fn encode_file<S: BatchSearch>(
    engine: &mut GrindEngine<S>,
    input: &Path,
) -> Result<EncodeReport> {
    let data = fs::read(input).map_err(|e| GrindError::io("read", input, e))?;
    let paths = ArtifactPaths::for_base(input);
    let meta = FileMetadata::new(data.len() as u64);
    fs::write(&paths.meta, meta.to_file_contents())
        .map_err(|e| GrindError::io("write", &paths.meta, e))?;

    let mut pub_out = create(&paths.pubkeys)?;
    let mut priv_out = create(&paths.privkeys)?;

    let chunks = pack(&data);
    info!(
        "Encoding '{}' ({} bytes) into {} pubkeys",
        input.display(),
        data.len(),
        chunks.len()
    );
    info!("Using batches of {} keys", engine.batch_size());

    let mut attempts_sum: u64 = 0;
    for (i, &value) in chunks.chunks().iter().enumerate() {
        if i % PROGRESS_EVERY == 0 {
            info!(
                "Progress: {i}/{} ({:.1}%)",
                chunks.len(),
                100.0 * i as f64 / chunks.len() as f64
            );
        }

        let result = engine.grind(&TargetConstraint::full(value))?;
        writeln!(priv_out, "{}", result.private_key.to_hex())
            .map_err(|e| GrindError::io("write", &paths.privkeys, e))?;
        writeln!(pub_out, "{}", result.public_key.to_hex())
            .map_err(|e| GrindError::io("write", &paths.pubkeys, e))?;
        attempts_sum = attempts_sum.saturating_add(result.attempts);
    }

    priv_out
        .flush()
        .map_err(|e| GrindError::io("flush", &paths.privkeys, e))?;
    pub_out
        .flush()
        .map_err(|e| GrindError::io("flush", &paths.pubkeys, e))?;

    let report = EncodeReport {
        paths,
        original_len: meta.original_len,
        chunks: chunks.len(),
        attempts: attempts_sum,
    };
    info!("Progress: {0}/{0} (100.0%)", report.chunks);
    info!("Pubkeys: {}", report.paths.pubkeys.display());
    info!("Privkeys: {}", report.paths.privkeys.display());
    info!("Metadata: {}", report.paths.meta.display());
    info!(
        "Avg attempts: {:.1} (expected ~{:.0})",
        report.average_attempts(),
        TargetConstraint::full(0).expected_attempts()
    );
    Ok(report)
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| GrindError::io("create", path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CandidateGenerator;
    use crate::config::GrindConfig;
    use crate::testkit::ScriptedSearcher;
    use crate::workflow::decode_file;

    fn engine() -> GrindEngine<ScriptedSearcher> {
        GrindEngine::start(
            ScriptedSearcher::match_at(1),
            CandidateGenerator::from_seed([9u8; 16]),
            &GrindConfig::default().with_batch_size(32),
        )
        .unwrap()
    }

    #[test]
    fn test_encode_deadbeef() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("payload.bin");
        fs::write(&input, [0xDE, 0xAD, 0xBE, 0xEF]).unwrap();

        let report = encode_file(&mut engine(), &input).unwrap();
        assert_eq!(report.chunks, 1);
        assert_eq!(report.attempts, 1);
        assert_eq!(fs::read_to_string(&report.paths.meta).unwrap(), "4\n");

        let pubkeys = fs::read_to_string(&report.paths.pubkeys).unwrap();
        let privkeys = fs::read_to_string(&report.paths.privkeys).unwrap();
        assert_eq!(pubkeys.lines().count(), 1);
        assert_eq!(privkeys.lines().count(), 1);
        assert_eq!(&pubkeys[2..10], "deadbeef");
        assert_eq!(privkeys.trim_end().len(), 64);

        let decoded = decode_file(&input).unwrap();
        assert_eq!(
            fs::read(decoded.output).unwrap(),
            vec![0xDE, 0xAD, 0xBE, 0xEF]
        );
    }

    #[test]
    fn test_encode_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("empty");
        fs::write(&input, []).unwrap();

        let report = encode_file(&mut engine(), &input).unwrap();
        assert_eq!(report.chunks, 0);
        assert_eq!(report.average_attempts(), 0.0);
        assert_eq!(fs::read_to_string(&report.paths.meta).unwrap(), "0\n");
        assert!(fs::read_to_string(&report.paths.pubkeys).unwrap().is_empty());
    }

    #[test]
    fn test_encode_missing_file_names_operation() {
        let dir = tempfile::tempdir().unwrap();
        let err = encode_file(&mut engine(), &dir.path().join("nope")).unwrap_err();
        assert!(err.to_string().contains("read"));
    }
}
