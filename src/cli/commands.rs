use crate::config::{GrindConfig, DEFAULT_BATCH_SIZE};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "keygrind",
    about = "Grind secp256k1 keys whose X coordinate starts with chosen bits"
)]
pub struct Opt {
    #[arg(
        long = "batch-size",
        global = true,
        default_value_t = DEFAULT_BATCH_SIZE,
        help = "Candidates handed to the searcher per round"
    )]
    pub batch_size: usize,
    #[arg(
        long = "max-batches",
        global = true,
        help = "Give up on a target after this many rounds (default: never)"
    )]
    pub max_batches: Option<u64>,
    #[arg(
        long = "threads",
        global = true,
        help = "Worker threads for the CPU searcher (default: all cores)"
    )]
    pub threads: Option<usize>,
    #[arg(short, long, global = true, help = "Enable debug logging")]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

impl Opt {
    pub fn grind_config(&self) -> GrindConfig {
        GrindConfig::default()
            .with_batch_size(self.batch_size)
            .with_max_batches(self.max_batches)
            .with_worker_threads(self.threads)
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(name = "encode", about = "Encode a file as a list of key pairs")]
    Encode {
        #[arg(help = "File to encode")]
        file: PathBuf,
    },
    #[command(name = "decode", about = "Rebuild a file from its encoded public keys")]
    Decode {
        #[arg(help = "Path given to encode (artifacts are found next to it)")]
        base_file: PathBuf,
    },
    #[command(
        name = "grind_stream",
        about = "Read 32-bit hex targets from stdin, write '<priv> <pub> <attempts>' lines"
    )]
    GrindStream {
        #[arg(help = "Match only the top BITS bits of each target (1-32, default 32)")]
        bits: Option<u32>,
    },
    #[command(
        name = "grind_hash",
        about = "Anchor a hex hash into keys, one per 4-byte chunk"
    )]
    GrindHash {
        #[arg(help = "Hash as hex, a multiple of 8 characters")]
        hex: String,
    },
    #[command(
        name = "stamp",
        about = "Anchor a hex payload a few bytes per key under a top-bits mask"
    )]
    Stamp {
        #[arg(help = "Payload as hex")]
        payload: String,
        #[arg(long = "bits", default_value_t = 24, help = "Bits per key: 8, 16, 24 or 32")]
        bits: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_grind_stream_bits() {
        let opt = Opt::try_parse_from(["keygrind", "grind_stream", "24"]).unwrap();
        assert!(matches!(opt.command, Command::GrindStream { bits: Some(24) }));

        let opt = Opt::try_parse_from(["keygrind", "grind_stream"]).unwrap();
        assert!(matches!(opt.command, Command::GrindStream { bits: None }));
    }

    #[test]
    fn test_global_flags_build_config() {
        let opt = Opt::try_parse_from([
            "keygrind",
            "grind_hash",
            "deadbeef",
            "--batch-size",
            "64",
            "--max-batches",
            "10",
        ])
        .unwrap();
        let config = opt.grind_config();
        assert_eq!(config.batch_size, 64);
        assert_eq!(config.max_batches, Some(10));
        assert_eq!(config.worker_threads, None);
    }

    #[test]
    fn test_wrong_argument_count_is_rejected() {
        assert!(Opt::try_parse_from(["keygrind", "encode"]).is_err());
        assert!(Opt::try_parse_from(["keygrind", "decode", "a", "b"]).is_err());
        assert!(Opt::try_parse_from(["keygrind", "grind_hash"]).is_err());
    }
}
