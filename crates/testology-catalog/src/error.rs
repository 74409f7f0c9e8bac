use testology_interpret::RuleError;
use testology_scoring::{ConfigError, ScoringError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("unknown test: {0}")]
    UnknownTest(String),

    #[error("invalid scoring config: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error("interpretation rule failed: {0}")]
    Rule(#[from] RuleError),
}
