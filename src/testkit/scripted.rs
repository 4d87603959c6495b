use crate::backend::{BatchOutcome, BatchSearch};
use crate::core::{PrivateKeyCandidate, PublicKeyPoint, TargetConstraint, PUBLIC_KEY_LEN};
use crate::error::{GrindError, Result};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Compressed key whose X coordinate starts with `prefix`
pub fn key_with_prefix(prefix: u32) -> PublicKeyPoint {
    let mut bytes = [0u8; PUBLIC_KEY_LEN];
    bytes[0] = 0x02;
    bytes[1..5].copy_from_slice(&prefix.to_be_bytes());
    PublicKeyPoint::from_bytes(bytes)
}

/// One scripted reply to `search_batch`
#[derive(Debug, Clone)]
pub enum SearchStep {
    NotFound(u64),
    /// (index, attempts); the key carries the constraint's target value
    Found(usize, u64),
    FoundKey(usize, u64, PublicKeyPoint),
    Fail,
}

/// Lifecycle call counts, readable after the searcher moved into an engine
#[derive(Debug, Clone, Default)]
pub struct Counters {
    init: Arc<AtomicUsize>,
    searches: Arc<AtomicUsize>,
    shutdown: Arc<AtomicUsize>,
}

impl Counters {
    pub fn init(&self) -> usize {
        self.init.load(Ordering::SeqCst)
    }

    pub fn searches(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }

    pub fn shutdown(&self) -> usize {
        self.shutdown.load(Ordering::SeqCst)
    }
}

enum Mode {
    /// Match the k-th candidate of every grind (1-based)
    MatchAt { k: u64, seen: u64 },
    Never,
    Script(VecDeque<SearchStep>),
}

pub struct ScriptedSearcher {
    mode: Mode,
    fail_init: bool,
    counters: Counters,
}

impl ScriptedSearcher {
    pub fn match_at(k: u64) -> ScriptedSearcher {
        Self::with_mode(Mode::MatchAt { k, seen: 0 })
    }

    pub fn never() -> ScriptedSearcher {
        Self::with_mode(Mode::Never)
    }

    /// Replies in order; once the script runs out every batch matches at index 0
    pub fn scripted(steps: Vec<SearchStep>) -> ScriptedSearcher {
        Self::with_mode(Mode::Script(steps.into()))
    }

    pub fn failing_init() -> ScriptedSearcher {
        ScriptedSearcher {
            fail_init: true,
            ..Self::never()
        }
    }

    pub fn counters(&self) -> Counters {
        self.counters.clone()
    }

    fn with_mode(mode: Mode) -> ScriptedSearcher {
        ScriptedSearcher {
            mode,
            fail_init: false,
            counters: Counters::default(),
        }
    }
}

impl BatchSearch for ScriptedSearcher {
    type Table = ();

    fn build_table(&self) -> Result<()> {
        Ok(())
    }

    fn init(&mut self, _table: &()) -> Result<()> {
        if self.fail_init {
            return Err(GrindError::BackendInit("scripted init failure".to_string()));
        }
        self.counters.init.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn search_batch(
        &mut self,
        constraint: &TargetConstraint,
        candidates: &[PrivateKeyCandidate],
    ) -> Result<BatchOutcome> {
        self.counters.searches.fetch_add(1, Ordering::SeqCst);
        let len = candidates.len() as u64;
        let target_key = key_with_prefix(constraint.value());

        match &mut self.mode {
            Mode::MatchAt { k, seen } => {
                if *seen + len >= *k {
                    let offset = *k - *seen;
                    *seen = 0;
                    Ok(BatchOutcome::Found {
                        index: (offset - 1) as usize,
                        public_key: target_key,
                        attempts: offset,
                    })
                } else {
                    *seen += len;
                    Ok(BatchOutcome::NotFound { attempts: len })
                }
            }
            Mode::Never => Ok(BatchOutcome::NotFound { attempts: len }),
            Mode::Script(steps) => match steps.pop_front() {
                Some(SearchStep::NotFound(attempts)) => Ok(BatchOutcome::NotFound { attempts }),
                Some(SearchStep::Found(index, attempts)) => Ok(BatchOutcome::Found {
                    index,
                    public_key: target_key,
                    attempts,
                }),
                Some(SearchStep::FoundKey(index, attempts, public_key)) => {
                    Ok(BatchOutcome::Found {
                        index,
                        public_key,
                        attempts,
                    })
                }
                Some(SearchStep::Fail) => {
                    Err(GrindError::Backend("scripted search failure".to_string()))
                }
                None => Ok(BatchOutcome::Found {
                    index: 0,
                    public_key: target_key,
                    attempts: 1,
                }),
            },
        }
    }

    fn shutdown(&mut self) {
        self.counters.shutdown.fetch_add(1, Ordering::SeqCst);
    }
}
