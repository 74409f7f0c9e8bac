use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::chunk::InterpretationChunk;
use super::result::ScoredResult;
use crate::error::CoreError;

/// What a persistence sink stores for one completed test.
///
/// Created by callers after scoring; the engine never reads the clock.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ResultSnapshot {
    pub id: Uuid,
    pub test_id: String,
    pub created_at: jiff::Timestamp,
    pub result: ScoredResult,
    pub chunks: Vec<InterpretationChunk>,
}

impl ResultSnapshot {
    pub fn new(result: ScoredResult, chunks: Vec<InterpretationChunk>) -> Self {
        Self {
            id: Uuid::new_v4(),
            test_id: result.test_id.clone(),
            created_at: jiff::Timestamp::now(),
            result,
            chunks,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
