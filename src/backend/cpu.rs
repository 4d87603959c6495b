//! CPU batch searcher over secp256k1
//!
//! Public keys are derived by summing precomputed doublings of the generator,
//! one table entry per set bit of the scalar. Candidates inside a batch are
//! checked in parallel with rayon; the lowest matching index wins so results
//! do not depend on scheduling.

use super::{BatchOutcome, BatchSearch};
use crate::core::{PrivateKeyCandidate, PublicKeyPoint, TargetConstraint, PUBLIC_KEY_LEN};
use crate::error::{GrindError, Result};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::{AffinePoint, ProjectivePoint};
use log::{debug, info};
use rayon::prelude::*;
use std::sync::Arc;

const SCALAR_BITS: usize = 256;

/// secp256k1 curve order N
const SECP256K1_ORDER: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
    0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
];

/// `2^i * G` for i in 0..256
#[derive(Clone)]
pub struct GTable {
    points: Arc<[ProjectivePoint]>,
}

impl GTable {
    pub fn build() -> GTable {
        let mut points = Vec::with_capacity(SCALAR_BITS);
        let mut current = ProjectivePoint::GENERATOR;
        for _ in 0..SCALAR_BITS {
            points.push(current);
            current = current + current;
        }
        GTable {
            points: points.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Compressed public key for a big-endian scalar, `None` if the scalar
    /// is zero or not below the curve order
    pub fn derive(&self, private_key: &[u8; 32]) -> Option<PublicKeyPoint> {
        if !is_valid_private_key(private_key) {
            return None;
        }
        let mut acc = ProjectivePoint::IDENTITY;
        for (byte_idx, byte) in private_key.iter().enumerate() {
            for bit in 0..8 {
                if (byte >> bit) & 1 == 1 {
                    acc += self.points[8 * (31 - byte_idx) + bit];
                }
            }
        }
        let encoded = AffinePoint::from(acc).to_encoded_point(true);
        let bytes: [u8; PUBLIC_KEY_LEN] = encoded.as_bytes().try_into().ok()?;
        Some(PublicKeyPoint::from_bytes(bytes))
    }
}

/// Check if private key is valid (0 < key < N)
pub fn is_valid_private_key(key: &[u8; 32]) -> bool {
    if key.iter().all(|&b| b == 0) {
        return false;
    }
    for i in 0..32 {
        if key[i] < SECP256K1_ORDER[i] {
            return true;
        }
        if key[i] > SECP256K1_ORDER[i] {
            return false;
        }
    }
    false
}

/// Rayon-backed [`BatchSearch`] implementation
#[derive(Default)]
pub struct CpuSearcher {
    worker_threads: Option<usize>,
    pool: Option<rayon::ThreadPool>,
    table: Option<GTable>,
}

impl CpuSearcher {
    pub fn new() -> CpuSearcher {
        CpuSearcher::default()
    }

    /// Use a dedicated pool of `threads` workers instead of rayon's global pool
    pub fn with_threads(threads: Option<usize>) -> CpuSearcher {
        CpuSearcher {
            worker_threads: threads,
            ..CpuSearcher::default()
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.table.is_some()
    }

    fn scan(
        table: &GTable,
        constraint: &TargetConstraint,
        candidates: &[PrivateKeyCandidate],
    ) -> Option<(usize, PublicKeyPoint)> {
        candidates
            .par_iter()
            .enumerate()
            .find_map_first(|(index, candidate)| {
                let public_key = table.derive(candidate.as_bytes())?;
                constraint
                    .matches(public_key.x_prefix())
                    .then_some((index, public_key))
            })
    }
}

impl BatchSearch for CpuSearcher {
    type Table = GTable;

    fn build_table(&self) -> Result<GTable> {
        let table = GTable::build();
        debug!("Built generator table with {} entries", table.len());
        Ok(table)
    }

    fn init(&mut self, table: &GTable) -> Result<()> {
        if table.len() != SCALAR_BITS {
            return Err(GrindError::BackendInit(format!(
                "generator table has {} entries, expected {SCALAR_BITS}",
                table.len()
            )));
        }
        if let Some(threads) = self.worker_threads {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| GrindError::BackendInit(format!("thread pool: {e}")))?;
            self.pool = Some(pool);
        }
        self.table = Some(table.clone());
        info!(
            "CPU searcher ready ({} threads)",
            self.pool
                .as_ref()
                .map(|p| p.current_num_threads())
                .unwrap_or_else(rayon::current_num_threads)
        );
        Ok(())
    }

    fn search_batch(
        &mut self,
        constraint: &TargetConstraint,
        candidates: &[PrivateKeyCandidate],
    ) -> Result<BatchOutcome> {
        let table = self
            .table
            .as_ref()
            .ok_or_else(|| GrindError::Backend("search_batch called before init".to_string()))?;

        let hit = match &self.pool {
            Some(pool) => pool.install(|| Self::scan(table, constraint, candidates)),
            None => Self::scan(table, constraint, candidates),
        };

        Ok(match hit {
            Some((index, public_key)) => BatchOutcome::Found {
                index,
                public_key,
                attempts: index as u64 + 1,
            },
            None => BatchOutcome::NotFound {
                attempts: candidates.len() as u64,
            },
        })
    }

    fn shutdown(&mut self) {
        self.table = None;
        self.pool = None;
        debug!("CPU searcher shut down");
    }
}
