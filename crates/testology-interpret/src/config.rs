use std::collections::BTreeMap;
use std::fmt;

use testology_core::models::chunk::InterpretationChunk;
use testology_core::models::result::{ScoredResult, SubscaleScore};

use crate::cross_test::CrossTestRule;
use crate::engine::interpret;
use crate::error::RuleError;

pub type RuleResult<T> = Result<T, RuleError>;

/// Produces the single narrative chunk for a total-score level.
pub type LevelRule = Box<dyn Fn(&ScoredResult) -> RuleResult<InterpretationChunk> + Send + Sync>;

/// Produces zero or more chunks, one per subscale threshold crossed. The
/// function owns its threshold logic.
pub type SubscaleRule =
    Box<dyn Fn(&ScoredResult) -> RuleResult<Vec<InterpretationChunk>> + Send + Sync>;

/// Narrative rules for one test.
///
/// Built once per test and read-only afterwards. A level without a rule
/// simply produces no chunk.
pub struct InterpretationConfig {
    pub test_id: String,
    pub by_level: BTreeMap<String, LevelRule>,
    pub by_subscale: Option<SubscaleRule>,
    pub cross_test: Vec<CrossTestRule>,
}

impl InterpretationConfig {
    pub fn new(test_id: impl Into<String>) -> Self {
        Self {
            test_id: test_id.into(),
            by_level: BTreeMap::new(),
            by_subscale: None,
            cross_test: Vec::new(),
        }
    }

    pub fn level<F>(mut self, level_id: impl Into<String>, rule: F) -> Self
    where
        F: Fn(&ScoredResult) -> RuleResult<InterpretationChunk> + Send + Sync + 'static,
    {
        self.by_level.insert(level_id.into(), Box::new(rule));
        self
    }

    pub fn subscales<F>(mut self, rule: F) -> Self
    where
        F: Fn(&ScoredResult) -> RuleResult<Vec<InterpretationChunk>> + Send + Sync + 'static,
    {
        self.by_subscale = Some(Box::new(rule));
        self
    }

    pub fn cross_test(mut self, rule: CrossTestRule) -> Self {
        self.cross_test.push(rule);
        self
    }

    pub fn cross_tests(mut self, rules: impl IntoIterator<Item = CrossTestRule>) -> Self {
        self.cross_test.extend(rules);
        self
    }

    /// Shorthand for [`interpret`] with this config.
    pub fn interpret(
        &self,
        result: &ScoredResult,
        other_results: Option<&[ScoredResult]>,
    ) -> RuleResult<Vec<InterpretationChunk>> {
        interpret(result, self, other_results)
    }
}

impl fmt::Debug for InterpretationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterpretationConfig")
            .field("test_id", &self.test_id)
            .field("levels", &self.by_level.keys().collect::<Vec<_>>())
            .field("has_subscale_rule", &self.by_subscale.is_some())
            .field("cross_test", &self.cross_test)
            .finish()
    }
}

/// Look up a subscale a rule depends on, failing loudly if it is absent.
pub fn require_subscale<'r>(result: &'r ScoredResult, id: &str) -> RuleResult<&'r SubscaleScore> {
    result
        .subscale(id)
        .ok_or_else(|| RuleError::MissingSubscale(id.to_string()))
}
