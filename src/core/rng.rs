//! Candidate generation
//!
//! xorshift128+ seeded once from the OS. This is a fast stream generator,
//! not a CSPRNG: the whole session carries at most the 128 bits of entropy
//! in its seed.

use crate::core::types::{PrivateKeyCandidate, PRIVATE_KEY_LEN};
use crate::error::{GrindError, Result};
use rand::rngs::OsRng;
use rand::{RngCore, SeedableRng};

pub const SEED_LEN: usize = 16;

// Substituted when both seed words are zero, which would lock the state at zero
const FALLBACK_S0: u64 = 0x1234_5678_9abc_def0;
const FALLBACK_S1: u64 = 0x0fed_cba9_8765_4321;

/// Two 64-bit words of state, one word of output per step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Xorshift128Plus {
    s0: u64,
    s1: u64,
}

impl Xorshift128Plus {
    pub fn state(&self) -> (u64, u64) {
        (self.s0, self.s1)
    }

    fn step(&mut self) -> u64 {
        let mut x = self.s0;
        let y = self.s1;
        self.s0 = y;
        x ^= x << 23;
        x ^= x >> 17;
        x ^= y ^ (y >> 26);
        self.s1 = x;
        x.wrapping_add(y)
    }
}

impl SeedableRng for Xorshift128Plus {
    type Seed = [u8; SEED_LEN];

    fn from_seed(seed: Self::Seed) -> Self {
        let mut lo = [0u8; 8];
        let mut hi = [0u8; 8];
        lo.copy_from_slice(&seed[..8]);
        hi.copy_from_slice(&seed[8..]);
        let (s0, s1) = (u64::from_le_bytes(lo), u64::from_le_bytes(hi));
        if s0 == 0 && s1 == 0 {
            return Xorshift128Plus {
                s0: FALLBACK_S0,
                s1: FALLBACK_S1,
            };
        }
        Xorshift128Plus { s0, s1 }
    }
}

impl RngCore for Xorshift128Plus {
    fn next_u32(&mut self) -> u32 {
        (self.step() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.step()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let word = self.step().to_le_bytes();
            chunk.copy_from_slice(&word[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// Produces private key candidates for the grind engine.
///
/// Owned by exactly one engine and advanced strictly sequentially.
#[derive(Debug, Clone)]
pub struct CandidateGenerator {
    rng: Xorshift128Plus,
}

impl CandidateGenerator {
    /// Seed from the OS entropy source. Reads exactly 16 bytes.
    pub fn from_os_entropy() -> Result<CandidateGenerator> {
        let mut seed = [0u8; SEED_LEN];
        OsRng
            .try_fill_bytes(&mut seed)
            .map_err(|e| GrindError::Entropy(format!("Failed to read OS randomness: {e}")))?;
        Ok(Self::from_seed(seed))
    }

    pub fn from_seed(seed: [u8; SEED_LEN]) -> CandidateGenerator {
        CandidateGenerator {
            rng: Xorshift128Plus::from_seed(seed),
        }
    }

    /// Four generator steps, each stored little-endian
    pub fn next_candidate(&mut self) -> PrivateKeyCandidate {
        let mut bytes = [0u8; PRIVATE_KEY_LEN];
        for word in bytes.chunks_exact_mut(8) {
            word.copy_from_slice(&self.rng.next_u64().to_le_bytes());
        }
        PrivateKeyCandidate::from_bytes(bytes)
    }

    pub fn next_batch(&mut self, n: usize) -> Vec<PrivateKeyCandidate> {
        let mut batch = Vec::with_capacity(n);
        self.fill_batch(&mut batch, n);
        batch
    }

    /// Replace the contents of `batch` with `n` fresh candidates
    pub fn fill_batch(&mut self, batch: &mut Vec<PrivateKeyCandidate>, n: usize) {
        batch.clear();
        batch.extend((0..n).map(|_| self.next_candidate()));
    }
}
