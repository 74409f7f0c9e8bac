//! testology-scoring
//!
//! Per-test scoring configs and the scorer that turns raw answers into
//! dimension scores and band levels. Pure and synchronous: no I/O, no
//! shared state. Configs are validated once, up front; scoring then only
//! fails on bad answers.

pub mod config;
pub mod error;
pub mod scorer;
pub mod trace;
pub mod validate;

pub use config::ScoringConfig;
pub use error::{ConfigError, ScoringError};
pub use scorer::{Scorer, score};
