//! Batch search backends
//!
//! The grind engine only talks to this trait. A backend receives a batch of
//! candidate private keys and reports whether one of them derives a public
//! key whose X coordinate satisfies the target constraint. Any parallelism
//! lives inside the backend.

pub mod cpu;

pub use cpu::{CpuSearcher, GTable};

use crate::core::{PrivateKeyCandidate, PublicKeyPoint, TargetConstraint};
use crate::error::Result;

/// What a backend found in one batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    /// `index` points into the submitted batch
    Found {
        index: usize,
        public_key: PublicKeyPoint,
        attempts: u64,
    },
    /// No match; `attempts` is the partial progress for this batch
    NotFound { attempts: u64 },
}

impl BatchOutcome {
    pub fn attempts(&self) -> u64 {
        match self {
            BatchOutcome::Found { attempts, .. } => *attempts,
            BatchOutcome::NotFound { attempts } => *attempts,
        }
    }
}

/// Batch search collaborator
///
/// Lifecycle: `build_table` and `init` once, any number of `search_batch`
/// calls, then `shutdown` exactly once. [`crate::core::GrindEngine`] enforces
/// the pairing.
pub trait BatchSearch {
    /// Precomputed base-point table. The engine keeps it alive until shutdown
    /// but never looks inside.
    type Table;

    fn build_table(&self) -> Result<Self::Table>;

    fn init(&mut self, table: &Self::Table) -> Result<()>;

    /// Test `candidates` against `constraint`. `Err` is a hard failure.
    fn search_batch(
        &mut self,
        constraint: &TargetConstraint,
        candidates: &[PrivateKeyCandidate],
    ) -> Result<BatchOutcome>;

    fn shutdown(&mut self);
}
