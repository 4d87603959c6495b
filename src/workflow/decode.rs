use crate::core::{try_unpack, FileMetadata, PublicKeyPoint};
use crate::error::{GrindError, Result};
use crate::utils::ArtifactPaths;
use log::{info, warn};
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

// The chunk count comes from the meta file; grow past this only as lines arrive
const PREALLOC_CHUNKS: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeReport {
    pub output: PathBuf,
    pub original_len: u64,
    pub chunks_expected: usize,
    pub chunks_read: usize,
}

/// Rebuild the original bytes from X prefixes of the keys in `reader`.
///
/// Blank lines are skipped and lines past the expected chunk count are
/// ignored. One malformed line fails the whole decode. Returns the bytes and
/// the number of chunks actually read.
pub fn decode_pubkeys<R: BufRead>(reader: R, meta: FileMetadata) -> Result<(Vec<u8>, usize)> {
    let expected = meta.chunk_count() as usize;
    let mut chunks = Vec::with_capacity(expected.min(PREALLOC_CHUNKS));

    for (line_no, line) in reader.lines().enumerate() {
        if chunks.len() >= expected {
            break;
        }
        let line = line.map_err(|e| GrindError::stream("read pubkey line", e))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let public_key = PublicKeyPoint::from_hex(trimmed).map_err(|e| {
            GrindError::InvalidInput(format!("invalid pubkey hex on line {}: {e}", line_no + 1))
        })?;
        chunks.push(public_key.x_prefix());
    }

    let read = chunks.len();
    Ok((try_unpack(&chunks, meta.total_bits())?, read))
}

/// Read `<base>.meta` and `<base>.realpubkeys.txt`, write `<base>-recon-real`
pub fn decode_file(base: &Path) -> Result<DecodeReport> {
    let paths = ArtifactPaths::for_base(base);
    let meta_text =
        fs::read_to_string(&paths.meta).map_err(|e| GrindError::io("read", &paths.meta, e))?;
    let meta = FileMetadata::parse(&meta_text)?;

    let pubkeys =
        File::open(&paths.pubkeys).map_err(|e| GrindError::io("open", &paths.pubkeys, e))?;
    let (data, chunks_read) = decode_pubkeys(BufReader::new(pubkeys), meta)?;

    let chunks_expected = meta.chunk_count() as usize;
    if chunks_read < chunks_expected {
        warn!("Expected {chunks_expected} chunks, read {chunks_read}; missing bits are zero");
    }

    fs::write(&paths.reconstructed, &data)
        .map_err(|e| GrindError::io("write", &paths.reconstructed, e))?;
    info!("Reconstructed: {}", paths.reconstructed.display());
    info!("Size: {} bytes", meta.original_len);

    Ok(DecodeReport {
        output: paths.reconstructed,
        original_len: meta.original_len,
        chunks_expected,
        chunks_read,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const KEY_DEADBEEF: &str = "02deadbeef000000000000000000000000000000000000000000000000000000aa";
    const KEY_CAFE: &str = "03cafe0000111111111111111111111111111111111111111111111111111111bb";

    #[test]
    fn test_decode_skips_blank_lines() {
        let input = format!("\n  {KEY_DEADBEEF}  \n\n{KEY_CAFE}\n");
        let (data, read) = decode_pubkeys(Cursor::new(input), FileMetadata::new(6)).unwrap();
        assert_eq!(read, 2);
        assert_eq!(data, vec![0xDE, 0xAD, 0xBE, 0xEF, 0xCA, 0xFE]);
    }

    #[test]
    fn test_decode_bad_line_aborts() {
        let input = format!("{KEY_DEADBEEF}\nnot-hex\n");
        let err = decode_pubkeys(Cursor::new(input), FileMetadata::new(8)).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_decode_ignores_extra_lines() {
        let input = format!("{KEY_DEADBEEF}\ngarbage after the last chunk\n");
        let (data, read) = decode_pubkeys(Cursor::new(input), FileMetadata::new(2)).unwrap();
        assert_eq!(read, 1);
        assert_eq!(data, vec![0xDE, 0xAD]);
    }

    #[test]
    fn test_decode_short_file_zero_fills() {
        let (data, read) =
            decode_pubkeys(Cursor::new(format!("{KEY_DEADBEEF}\n")), FileMetadata::new(5))
                .unwrap();
        assert_eq!(read, 1);
        assert_eq!(data, vec![0xDE, 0xAD, 0xBE, 0xEF, 0x00]);
    }

    #[test]
    fn test_decode_file_missing_meta() {
        let dir = tempfile::tempdir().unwrap();
        let err = decode_file(&dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, GrindError::Io { .. }));
    }

    fn write_artifacts(base: &Path, meta: &str, pubkeys: &str) {
        let paths = ArtifactPaths::for_base(base);
        fs::write(paths.meta, meta).unwrap();
        fs::write(paths.pubkeys, pubkeys).unwrap();
    }

    #[test]
    fn test_decode_file_rejects_overflowing_meta() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("x");
        write_artifacts(&base, "2305843009213693952\n", "");

        let err = decode_file(&base).unwrap_err();
        assert!(matches!(err, GrindError::InvalidInput(_)));
        assert!(!ArtifactPaths::for_base(&base).reconstructed.exists());
    }

    #[test]
    fn test_decode_file_unallocatable_meta_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("x");
        write_artifacts(&base, "2305843009213693951\n", &format!("{KEY_DEADBEEF}\n"));

        let err = decode_file(&base).unwrap_err();
        assert!(matches!(err, GrindError::InvalidInput(_)));
        assert!(!ArtifactPaths::for_base(&base).reconstructed.exists());
    }
}
