use serde::{Deserialize, Serialize};
use testology_core::models::result::Severity;
use ts_rs::TS;

use crate::error::ConfigError;

/// Floating point tolerance used for band membership and option steps.
pub(crate) const EPSILON: f64 = 1e-9;

/// Declarative description of how a test's raw answers become scores.
///
/// Authored by an admin and stored as JSON. Validate it with
/// [`Scorer::new`](crate::scorer::Scorer::new) before scoring anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoringConfig {
    pub test_id: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Highest selectable option value shared by every item that does not
    /// declare its own.
    #[serde(default)]
    pub max_option_value: Option<f64>,
    /// Distance between selectable option values. Defaults to 1.
    #[serde(default)]
    pub option_step: Option<f64>,
    pub dimensions: Vec<Dimension>,
    pub items: Vec<Item>,
    #[serde(default)]
    pub recommendations: Vec<RecommendationRule>,
}

impl ScoringConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        tracing::debug!(
            test_id = %config.test_id,
            dimensions = config.dimensions.len(),
            items = config.items.len(),
            "parsed scoring config"
        );
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn dimension(&self, id: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.id == id)
    }

    pub fn item(&self, order: u32) -> Option<&Item> {
        self.items.iter().find(|i| i.order == order)
    }

    pub fn step(&self) -> f64 {
        self.option_step.unwrap_or(1.0)
    }
}

/// How a dimension combines its item contributions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Aggregation {
    #[default]
    Sum,
    /// Sum divided by the number of items the dimension lists.
    Average,
}

/// A named sub-score computed from a subset of the test's items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Dimension {
    pub id: String,
    pub label: String,
    pub item_indices: Vec<u32>,
    /// Marks the test-level dimension. Exactly one per config.
    #[serde(default)]
    pub is_total: bool,
    #[serde(default)]
    pub aggregation: Aggregation,
    /// Checked in declared order; the first band containing a score wins.
    pub bands: Vec<Band>,
}

/// Per-question scoring metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Item {
    /// 1-based question position.
    pub order: u32,
    #[serde(default)]
    pub is_reverse: bool,
    #[serde(default)]
    pub weight: Option<f64>,
    /// Overrides the config-level maximum for this item's option set.
    #[serde(default)]
    pub max_option_value: Option<f64>,
}

impl Item {
    pub fn new(order: u32) -> Self {
        Self {
            order,
            is_reverse: false,
            weight: None,
            max_option_value: None,
        }
    }

    pub fn reversed(order: u32) -> Self {
        Self {
            is_reverse: true,
            ..Self::new(order)
        }
    }

    pub fn weight(&self) -> f64 {
        self.weight.unwrap_or(1.0)
    }
}

/// A named score range used to classify a dimension's score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Band {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    pub min: f64,
    pub max: f64,
    #[serde(default)]
    pub severity: Option<Severity>,
}

impl Band {
    pub fn new(id: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            id: id.into(),
            label: None,
            min,
            max,
            severity: None,
        }
    }

    pub fn labelled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }

    /// Inclusive on both ends.
    pub fn contains(&self, score: f64) -> bool {
        score >= self.min - EPSILON && score <= self.max + EPSILON
    }
}

/// Range of selectable values for one item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptionRange {
    pub max: f64,
    pub step: f64,
}

impl OptionRange {
    /// Values run from 0 to `max` in increments of `step`.
    pub fn contains(&self, value: f64) -> bool {
        if !value.is_finite() || value < 0.0 || value > self.max + EPSILON {
            return false;
        }
        let remainder = value % self.step;
        remainder < EPSILON || (self.step - remainder) < EPSILON
    }
}

/// Comparison operator used by threshold conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Comparator {
    Lt,
    Lte,
    Gt,
    Gte,
}

impl Comparator {
    pub fn holds(self, score: f64, threshold: f64) -> bool {
        match self {
            Comparator::Lt => score < threshold,
            Comparator::Lte => score <= threshold,
            Comparator::Gt => score > threshold,
            Comparator::Gte => score >= threshold,
        }
    }
}

/// Which score a condition reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Target {
    Total,
    Subscale(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Condition {
    pub target: Target,
    pub comparator: Comparator,
    pub value: f64,
}

/// Suggests follow-up tests when every condition holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RecommendationRule {
    pub id: String,
    pub conditions: Vec<Condition>,
    pub recommend_tests: Vec<String>,
    #[serde(default)]
    pub message: Option<String>,
}
