use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Priority {
    #[default]
    Normal,
    High,
}

/// One self-contained unit of generated narrative.
///
/// `id` is derived from the rule that produced the chunk, so identical input
/// always yields identical ids. Chunks from cross-test rules carry ids
/// starting with [`InterpretationChunk::CROSS_TEST_PREFIX`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InterpretationChunk {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    pub body: String,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub test_id: Option<String>,
}

impl InterpretationChunk {
    pub const CROSS_TEST_PREFIX: &'static str = "combo_";

    pub fn new(id: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            body: body.into(),
            priority: None,
            test_id: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn test_id(mut self, test_id: impl Into<String>) -> Self {
        self.test_id = Some(test_id.into());
        self
    }

    pub fn is_high_priority(&self) -> bool {
        self.priority == Some(Priority::High)
    }

    pub fn is_cross_test(&self) -> bool {
        self.id.starts_with(Self::CROSS_TEST_PREFIX)
    }
}
