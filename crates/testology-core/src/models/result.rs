use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::answer::RawAnswer;

/// Clinical severity attached to a score band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

/// The score of one dimension together with the band it fell into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubscaleScore {
    pub id: String,
    pub label: String,
    pub score: f64,
    pub level_id: String,
    pub level_label: String,
    pub severity: Option<Severity>,
}

/// Output of a scoring run. Recomputed on every call; callers persist a
/// snapshot rather than mutating this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoredResult {
    pub test_id: String,
    pub total_score: f64,
    pub total_level_id: String,
    pub total_level_label: String,
    pub severity: Option<Severity>,
    /// One entry per configured dimension, in config order, total included.
    pub subscales: Vec<SubscaleScore>,
    pub raw_answers: Vec<RawAnswer>,
    #[serde(default)]
    pub recommended_tests: Vec<String>,
    #[serde(default)]
    pub recommendation_messages: Vec<String>,
}

impl ScoredResult {
    pub fn subscale(&self, id: &str) -> Option<&SubscaleScore> {
        self.subscales.iter().find(|s| s.id == id)
    }

    /// The submitted value for a question, if it was answered.
    pub fn answer(&self, question_order: u32) -> Option<f64> {
        self.raw_answers
            .iter()
            .find(|a| a.question_order == question_order)
            .map(|a| a.value)
    }
}
