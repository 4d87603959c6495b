use crate::error::{GrindError, Result};

/// Candidates per backend call. Affects latency and granularity only.
pub const DEFAULT_BATCH_SIZE: usize = 16384;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrindConfig {
    pub batch_size: usize,
    /// `None` keeps searching until a match or cancellation
    pub max_batches: Option<u64>,
    /// `None` uses rayon's global pool
    pub worker_threads: Option<usize>,
}

impl Default for GrindConfig {
    fn default() -> Self {
        GrindConfig {
            batch_size: DEFAULT_BATCH_SIZE,
            max_batches: None,
            worker_threads: None,
        }
    }
}

impl GrindConfig {
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_max_batches(mut self, max_batches: Option<u64>) -> Self {
        self.max_batches = max_batches;
        self
    }

    pub fn with_worker_threads(mut self, worker_threads: Option<usize>) -> Self {
        self.worker_threads = worker_threads;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(GrindError::Config(
                "batch size must be at least 1".to_string(),
            ));
        }
        if self.worker_threads == Some(0) {
            return Err(GrindError::Config(
                "worker thread count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GrindConfig::default();
        assert_eq!(config.batch_size, 16384);
        assert_eq!(config.max_batches, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        assert!(GrindConfig::default().with_batch_size(0).validate().is_err());
        assert!(GrindConfig::default()
            .with_worker_threads(Some(0))
            .validate()
            .is_err());
        assert!(GrindConfig::default()
            .with_batch_size(1)
            .with_max_batches(Some(0))
            .with_worker_threads(Some(2))
            .validate()
            .is_ok());
    }
}
