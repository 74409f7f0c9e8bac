//! Rules that fire on the combined results of several tests.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use testology_core::models::chunk::InterpretationChunk;
use testology_core::models::result::ScoredResult;
use testology_scoring::config::{Comparator, Target};

use crate::config::RuleResult;

/// The current result plus a respondent's other completed tests, keyed by
/// test id.
///
/// The current result always wins over another result with the same test
/// id; among the others the first one supplied wins.
#[derive(Debug, Clone)]
pub struct ResultSet<'a> {
    current: &'a ScoredResult,
    by_test: BTreeMap<&'a str, &'a ScoredResult>,
}

impl<'a> ResultSet<'a> {
    pub fn new(current: &'a ScoredResult, others: &'a [ScoredResult]) -> Self {
        let mut by_test = BTreeMap::new();
        for other in others {
            by_test.entry(other.test_id.as_str()).or_insert(other);
        }
        by_test.insert(current.test_id.as_str(), current);
        Self { current, by_test }
    }

    pub fn current(&self) -> &'a ScoredResult {
        self.current
    }

    pub fn get(&self, test_id: &str) -> Option<&'a ScoredResult> {
        self.by_test.get(test_id).copied()
    }

    pub fn test_ids(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.by_test.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.by_test.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_test.is_empty()
    }
}

/// What a condition requires of the targeted score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Check {
    /// The score's band id is one of these.
    LevelIn(Vec<String>),
    Compare { comparator: Comparator, value: f64 },
}

/// A requirement on one test's result. Fails when that test is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCondition {
    pub test_id: String,
    #[serde(default = "total_target")]
    pub target: Target,
    pub check: Check,
}

fn total_target() -> Target {
    Target::Total
}

impl TestCondition {
    pub fn level_in(test_id: impl Into<String>, levels: &[&str]) -> Self {
        Self {
            test_id: test_id.into(),
            target: Target::Total,
            check: Check::LevelIn(levels.iter().map(|l| l.to_string()).collect()),
        }
    }

    pub fn compare(
        test_id: impl Into<String>,
        target: Target,
        comparator: Comparator,
        value: f64,
    ) -> Self {
        Self {
            test_id: test_id.into(),
            target,
            check: Check::Compare { comparator, value },
        }
    }

    pub fn holds(&self, set: &ResultSet<'_>) -> bool {
        let Some(result) = set.get(&self.test_id) else {
            return false;
        };

        let (score, level) = match &self.target {
            Target::Total => (result.total_score, result.total_level_id.as_str()),
            Target::Subscale(id) => match result.subscale(id) {
                Some(s) => (s.score, s.level_id.as_str()),
                None => return false,
            },
        };

        match &self.check {
            Check::LevelIn(levels) => levels.iter().any(|l| l == level),
            Check::Compare { comparator, value } => comparator.holds(score, *value),
        }
    }
}

type CrossTestBuilder =
    Box<dyn Fn(&ResultSet<'_>) -> RuleResult<InterpretationChunk> + Send + Sync>;

/// Emits one chunk when every condition holds across the result set.
pub struct CrossTestRule {
    pub id: String,
    pub conditions: Vec<TestCondition>,
    build: CrossTestBuilder,
}

impl CrossTestRule {
    pub fn new<F>(id: impl Into<String>, conditions: Vec<TestCondition>, build: F) -> Self
    where
        F: Fn(&ResultSet<'_>) -> RuleResult<InterpretationChunk> + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            conditions,
            build: Box::new(build),
        }
    }

    pub fn matches(&self, set: &ResultSet<'_>) -> bool {
        self.conditions.iter().all(|c| c.holds(set))
    }

    /// Build this rule's chunk if it fires.
    ///
    /// The chunk id is forced into the `combo_` namespace and a missing test
    /// id is filled with the current result's.
    pub fn evaluate(&self, set: &ResultSet<'_>) -> RuleResult<Option<InterpretationChunk>> {
        if !self.matches(set) {
            return Ok(None);
        }

        let mut chunk = (self.build)(set)?;
        if !chunk.is_cross_test() {
            chunk.id = format!("{}{}", InterpretationChunk::CROSS_TEST_PREFIX, chunk.id);
        }
        if chunk.test_id.is_none() {
            chunk.test_id = Some(set.current().test_id.clone());
        }
        Ok(Some(chunk))
    }
}

impl fmt::Debug for CrossTestRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrossTestRule")
            .field("id", &self.id)
            .field("conditions", &self.conditions)
            .finish_non_exhaustive()
    }
}
