//! testology-catalog
//!
//! Built-in psychological tests. Each definition pairs a validated scoring
//! config with its narrative rules; `evaluate` runs both in sequence.

pub mod error;
pub mod instruments;
mod narrative;

use serde::Serialize;
use testology_core::models::answer::RawAnswer;
use testology_core::models::chunk::InterpretationChunk;
use testology_core::models::result::ScoredResult;
use testology_interpret::InterpretationConfig;
use testology_scoring::{Scorer, ScoringConfig};

pub use error::CatalogError;

/// Trait implemented by each built-in test.
pub trait TestDefinition: Send + Sync {
    /// Unique identifier (e.g., "gad7", "neo_ffi").
    fn id(&self) -> &str;

    /// Human-readable name (e.g., "GAD-7").
    fn name(&self) -> &str;

    fn scoring_config(&self) -> &ScoringConfig;

    fn interpretation(&self) -> &InterpretationConfig;

    /// Validate the scoring config and build a scorer for it.
    fn scorer(&self) -> Result<Scorer, CatalogError> {
        Ok(Scorer::new(self.scoring_config().clone())?)
    }
}

/// Return all registered tests.
pub fn all_tests() -> Vec<Box<dyn TestDefinition>> {
    vec![
        Box::new(instruments::gad7::Gad7),
        Box::new(instruments::phq9::Phq9),
        Box::new(instruments::pss10::Pss10),
        Box::new(instruments::neo_ffi::NeoFfi),
    ]
}

/// Look up a test by ID.
pub fn get_test(id: &str) -> Option<Box<dyn TestDefinition>> {
    all_tests().into_iter().find(|t| t.id() == id)
}

/// A scored result with its narrative.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub result: ScoredResult,
    pub chunks: Vec<InterpretationChunk>,
}

/// Score `answers` and interpret the result.
///
/// `others` are the respondent's earlier results; cross-test rules only run
/// when it is supplied.
pub fn evaluate(
    test: &dyn TestDefinition,
    answers: &[RawAnswer],
    others: Option<&[ScoredResult]>,
) -> Result<Evaluation, CatalogError> {
    let result = test.scorer()?.score(answers)?;
    let chunks = test.interpretation().interpret(&result, others)?;
    tracing::info!(
        test_id = test.id(),
        total_score = result.total_score,
        level = %result.total_level_id,
        chunks = chunks.len(),
        "evaluated test"
    );
    Ok(Evaluation { result, chunks })
}

/// [`evaluate`] with the test looked up by id.
pub fn evaluate_by_id(
    test_id: &str,
    answers: &[RawAnswer],
    others: Option<&[ScoredResult]>,
) -> Result<Evaluation, CatalogError> {
    let test = get_test(test_id).ok_or_else(|| CatalogError::UnknownTest(test_id.to_string()))?;
    evaluate(test.as_ref(), answers, others)
}
