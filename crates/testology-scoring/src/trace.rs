use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Item-by-item breakdown of a scoring run, for audit and debugging screens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoreTrace {
    pub test_id: String,
    pub items: Vec<ItemTrace>,
    pub dimensions: Vec<DimensionTrace>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ItemTrace {
    pub question_order: u32,
    /// `None` when the question was not answered (zero-filled).
    pub raw: Option<f64>,
    pub reversed: bool,
    /// Value after reversal, before weighting.
    pub adjusted: f64,
    pub weight: f64,
    pub contribution: f64,
    /// Ids of every dimension this item feeds.
    pub dimensions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DimensionTrace {
    pub id: String,
    pub item_indices: Vec<u32>,
    pub min_possible: f64,
    pub max_possible: f64,
    pub score: f64,
}
