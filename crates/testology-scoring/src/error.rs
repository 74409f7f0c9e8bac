use thiserror::Error;

/// Defects in an authored [`ScoringConfig`](crate::config::ScoringConfig).
///
/// Raised when a config is validated, never in the middle of a scoring run.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("test '{test_id}' must declare exactly one total dimension, found {found}")]
    AmbiguousTotalDimension { test_id: String, found: usize },

    #[error(
        "bands of dimension '{dimension_id}' leave scores from {gap_from} uncovered \
         (possible range [{min_possible}, {max_possible}])"
    )]
    UncoveredScoreRange {
        dimension_id: String,
        gap_from: f64,
        min_possible: f64,
        max_possible: f64,
    },

    #[error("dimension '{dimension_id}' declares no bands")]
    NoBands { dimension_id: String },

    #[error("band '{band_id}' of dimension '{dimension_id}' has min {min} above max {max}")]
    InvalidBand {
        dimension_id: String,
        band_id: String,
        min: f64,
        max: f64,
    },

    #[error("dimension id '{0}' is declared more than once")]
    DuplicateDimension(String),

    #[error("item {0} is declared more than once")]
    DuplicateItem(u32),

    #[error("dimension '{dimension_id}' references unknown item {order}")]
    UnknownItem { dimension_id: String, order: u32 },

    #[error("item {0} has no max option value and the config declares no default")]
    MissingOptionRange(u32),

    #[error("item {order} has invalid max option value {max}")]
    InvalidOptionRange { order: u32, max: f64 },

    #[error("option step {0} must be a positive finite number")]
    InvalidStep(f64),

    #[error("item {order} has non-finite weight {weight}")]
    InvalidWeight { order: u32, weight: f64 },

    #[error("recommendation '{rule_id}' references unknown dimension '{dimension_id}'")]
    UnknownDimension {
        rule_id: String,
        dimension_id: String,
    },

    #[error("invalid scoring config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failures of a single scoring call.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error(
        "question {question_order}: value {value} is not a selectable option \
         (0 to {max} in steps of {step})"
    )]
    InvalidAnswerValue {
        question_order: u32,
        value: f64,
        max: f64,
        step: f64,
    },

    #[error("question {0} was answered more than once")]
    DuplicateAnswer(u32),

    #[error("answers were submitted for test '{actual}' but the config is for '{expected}'")]
    TestMismatch { expected: String, actual: String },

    #[error("score {score} of dimension '{dimension_id}' fell outside every band")]
    Unclassified { dimension_id: String, score: f64 },

    #[error(transparent)]
    Config(#[from] ConfigError),
}
