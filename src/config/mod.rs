//! Configuration management
//!
//! Settings for a grind session: batch granularity, an optional batch
//! limit, and the CPU backend's worker count. Everything comes from the
//! command line; there is no global state.

pub mod settings;

pub use settings::{GrindConfig, DEFAULT_BATCH_SIZE};
