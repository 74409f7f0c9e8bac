use thiserror::Error;

/// Failure raised by a narrative rule function.
///
/// The engine returns these to the caller untouched; it never substitutes a
/// default chunk.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("subscale '{0}' is missing from the scored result")]
    MissingSubscale(String),

    #[error("template '{template}' failed to render: {message}")]
    Template { template: String, message: String },

    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("invalid interpretation table JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("chunk template in '{0}' has an empty id")]
    EmptyChunkId(String),

    #[error("template '{template}' does not parse: {message}")]
    TemplateParse { template: String, message: String },
}
