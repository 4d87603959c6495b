//! Core grinding functionality
//!
//! This module contains the candidate generator, the target constraint,
//! the bit-packing codec and the grind engine that ties them to a backend.

pub mod cancel;
pub mod codec;
pub mod constraint;
pub mod grind;
pub mod rng;
pub mod types;

pub use cancel::CancelToken;
pub use codec::{pack, packed_len, recover_stamp, stamp_targets, try_unpack, unpack};
pub use constraint::{top_mask, TargetConstraint, FULL_MASK_BITS};
pub use grind::GrindEngine;
pub use rng::{CandidateGenerator, Xorshift128Plus, SEED_LEN};
pub use types::{
    chunk_count, ChunkSequence, FileMetadata, GrindResult, PrivateKeyCandidate, PublicKeyPoint,
    PRIVATE_KEY_LEN, PUBLIC_KEY_LEN,
};
