//! # keygrind
//!
//! Finds secp256k1 key pairs whose public key X coordinate begins with
//! chosen bits, and builds two tools on top of that search: storing an
//! arbitrary file as a sequence of public keys, and anchoring hash
//! fragments into keys on demand.
//!
//! ## Layout
//! - `core/`: candidate generator, target constraint, bit-packing codec,
//!   and the grind engine's retry loop
//! - `backend/`: the batch search trait and the CPU implementation
//! - `workflow/`: encode, decode, streaming, hash and stamp front ends
//! - `config/`: session settings
//! - `cli/`: command-line interface
//! - `utils/`: hex helpers and artifact file naming
//!
//! The engine is single-threaded; all parallelism sits inside a backend's
//! `search_batch`. The candidate stream is xorshift128+ seeded with 16 bytes
//! of OS entropy, so it is fast but carries no more than 128 bits of entropy
//! per session.

pub mod backend;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod utils;
pub mod workflow;

#[cfg(test)]
pub mod testkit;

pub use backend::{BatchOutcome, BatchSearch, CpuSearcher, GTable};
pub use cli::{Command, Opt};
pub use config::{GrindConfig, DEFAULT_BATCH_SIZE};
pub use core::{
    pack, unpack, CancelToken, CandidateGenerator, ChunkSequence, FileMetadata, GrindEngine,
    GrindResult, PrivateKeyCandidate, PublicKeyPoint, TargetConstraint,
};
pub use error::{GrindError, Result};
