use crate::backend::{BatchOutcome, BatchSearch};
use crate::config::GrindConfig;
use crate::core::cancel::CancelToken;
use crate::core::constraint::TargetConstraint;
use crate::core::rng::CandidateGenerator;
use crate::core::types::{GrindResult, PrivateKeyCandidate};
use crate::error::{GrindError, Result};
use log::{debug, info};
use zeroize::Zeroize;

/// One grinding session: an initialized backend, its table, and the
/// candidate generator.
///
/// The backend is shut down exactly once, by [`GrindEngine::finish`] or on
/// drop, whichever comes first.
pub struct GrindEngine<S: BatchSearch> {
    searcher: S,
    table: Option<S::Table>,
    generator: CandidateGenerator,
    batch_size: usize,
    max_batches: Option<u64>,
    cancel: CancelToken,
    active: bool,
}

impl<S: BatchSearch> GrindEngine<S> {
    /// Build the backend table and initialize the backend
    pub fn start(
        mut searcher: S,
        generator: CandidateGenerator,
        config: &GrindConfig,
    ) -> Result<GrindEngine<S>> {
        config.validate()?;
        let table = searcher.build_table()?;
        searcher.init(&table)?;
        info!(
            "Grind session started (batch size {}{})",
            config.batch_size,
            config
                .max_batches
                .map(|limit| format!(", limit {limit} batches"))
                .unwrap_or_default()
        );
        Ok(GrindEngine {
            searcher,
            table: Some(table),
            generator,
            batch_size: config.batch_size,
            max_batches: config.max_batches,
            cancel: CancelToken::new(),
            active: true,
        })
    }

    /// Replace the engine's cancellation token with a shared one
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn searcher(&self) -> &S {
        &self.searcher
    }

    /// Search until a candidate satisfies `constraint`.
    ///
    /// Unbounded unless a batch limit is configured; the cancellation token is
    /// checked before every batch.
    pub fn grind(&mut self, constraint: &TargetConstraint) -> Result<GrindResult> {
        let _busy = self.cancel.busy_guard();
        let mut batch: Vec<PrivateKeyCandidate> = Vec::with_capacity(self.batch_size);
        let result = self.grind_with_buffer(constraint, &mut batch);
        batch.zeroize();
        result
    }

    fn grind_with_buffer(
        &mut self,
        constraint: &TargetConstraint,
        batch: &mut Vec<PrivateKeyCandidate>,
    ) -> Result<GrindResult> {
        let mut attempts_total: u64 = 0;
        let mut batches: u64 = 0;

        loop {
            if self.cancel.is_cancelled() {
                debug!("Grind for {constraint} cancelled after {attempts_total} attempts");
                return Err(GrindError::Cancelled);
            }
            if let Some(limit) = self.max_batches {
                if batches >= limit {
                    return Err(GrindError::BatchLimit {
                        batches,
                        attempts: attempts_total,
                    });
                }
            }

            self.generator.fill_batch(batch, self.batch_size);
            let outcome = self.searcher.search_batch(constraint, batch)?;
            batches += 1;
            attempts_total = attempts_total.saturating_add(outcome.attempts());

            match outcome {
                BatchOutcome::NotFound { attempts: 0 } => {
                    return Err(GrindError::ProtocolViolation(
                        "backend reported no match with zero attempts tested".to_string(),
                    ));
                }
                BatchOutcome::NotFound { .. } => continue,
                BatchOutcome::Found {
                    index, public_key, ..
                } => {
                    if index >= batch.len() {
                        return Err(GrindError::ProtocolViolation(format!(
                            "match index {index} outside batch of {}",
                            batch.len()
                        )));
                    }
                    if !constraint.matches(public_key.x_prefix()) {
                        return Err(GrindError::ProtocolViolation(format!(
                            "reported key prefix {:08x} does not satisfy {constraint}",
                            public_key.x_prefix()
                        )));
                    }
                    debug!("Matched {constraint} after {batches} batches, {attempts_total} attempts");
                    return Ok(GrindResult {
                        private_key: batch[index],
                        public_key,
                        attempts: attempts_total,
                    });
                }
            }
        }
    }

    /// Shut the backend down and release the table
    pub fn finish(mut self) {
        self.shutdown_once();
    }

    fn shutdown_once(&mut self) {
        if self.active {
            self.active = false;
            self.searcher.shutdown();
            self.table = None;
            debug!("Grind session shut down");
        }
    }
}

impl<S: BatchSearch> Drop for GrindEngine<S> {
    fn drop(&mut self) {
        self.shutdown_once();
    }
}
