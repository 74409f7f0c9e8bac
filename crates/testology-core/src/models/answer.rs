use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// One submitted response: the selected option value for a question.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RawAnswer {
    /// 1-based question position, aligned with the scoring config's items.
    pub question_order: u32,
    pub value: f64,
}

impl RawAnswer {
    pub fn new(question_order: u32, value: f64) -> Self {
        Self {
            question_order,
            value,
        }
    }
}

/// Build answers from a slice of values, numbering them from question 1.
pub fn sequential(values: &[f64]) -> Vec<RawAnswer> {
    values
        .iter()
        .zip(1u32..)
        .map(|(value, order)| RawAnswer::new(order, *value))
        .collect()
}
