use std::collections::BTreeMap;

use testology_core::models::answer::RawAnswer;
use testology_core::models::result::{ScoredResult, SubscaleScore};

use crate::config::{Aggregation, Band, ScoringConfig, Target};
use crate::error::{ConfigError, ScoringError};
use crate::trace::{DimensionTrace, ItemTrace, ScoreTrace};
use crate::validate::{ScoreBounds, Validated, validate};

/// A validated scoring config, ready to score submissions.
///
/// Construction performs every config check; a `Scorer` that exists can only
/// fail on bad answers. It holds no mutable state and can be shared freely
/// across threads.
#[derive(Debug, Clone)]
pub struct Scorer {
    config: ScoringConfig,
    validated: Validated,
}

impl Scorer {
    pub fn new(config: ScoringConfig) -> Result<Self, ConfigError> {
        let validated = validate(&config)?;
        Ok(Self { config, validated })
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Self::new(ScoringConfig::from_json(json)?)
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn test_id(&self) -> &str {
        &self.config.test_id
    }

    /// Reachable score range of a dimension.
    pub fn bounds(&self, dimension_id: &str) -> Option<ScoreBounds> {
        self.dimension_index(dimension_id)
            .map(|i| self.validated.bounds[i])
    }

    /// The band a score falls into: first match in declared order.
    pub fn classify(&self, dimension_id: &str, score: f64) -> Option<&Band> {
        let dimension = self.config.dimension(dimension_id)?;
        dimension.bands.iter().find(|b| b.contains(score))
    }

    pub fn score(&self, answers: &[RawAnswer]) -> Result<ScoredResult, ScoringError> {
        self.run(answers).map(|(result, _)| result)
    }

    /// Score and also return the per-item breakdown.
    pub fn score_with_trace(
        &self,
        answers: &[RawAnswer],
    ) -> Result<(ScoredResult, ScoreTrace), ScoringError> {
        self.run(answers)
    }

    fn dimension_index(&self, dimension_id: &str) -> Option<usize> {
        self.config
            .dimensions
            .iter()
            .position(|d| d.id == dimension_id)
    }

    /// Index valid answers by question order. Answers to unknown questions
    /// are ignored; out-of-range values and repeats are rejected.
    fn collect_answers(&self, answers: &[RawAnswer]) -> Result<BTreeMap<u32, f64>, ScoringError> {
        let mut by_order = BTreeMap::new();
        for answer in answers {
            let Some(item) = self.validated.items.get(&answer.question_order) else {
                continue;
            };
            if !item.range.contains(answer.value) {
                return Err(ScoringError::InvalidAnswerValue {
                    question_order: answer.question_order,
                    value: answer.value,
                    max: item.range.max,
                    step: item.range.step,
                });
            }
            if by_order.insert(answer.question_order, answer.value).is_some() {
                return Err(ScoringError::DuplicateAnswer(answer.question_order));
            }
        }
        Ok(by_order)
    }

    fn run(&self, answers: &[RawAnswer]) -> Result<(ScoredResult, ScoreTrace), ScoringError> {
        let values = self.collect_answers(answers)?;

        // Unanswered items contribute zero.
        let mut items = Vec::with_capacity(self.config.items.len());
        let mut contributions = BTreeMap::new();
        for item in &self.config.items {
            let resolved = &self.validated.items[&item.order];
            let raw = values.get(&item.order).copied();
            let adjusted = match raw {
                Some(value) if resolved.is_reverse => resolved.range.max - value,
                Some(value) => value,
                None => 0.0,
            };
            let contribution = adjusted * resolved.weight;
            contributions.insert(item.order, contribution);

            items.push(ItemTrace {
                question_order: item.order,
                raw,
                reversed: resolved.is_reverse,
                adjusted,
                weight: resolved.weight,
                contribution,
                dimensions: self
                    .config
                    .dimensions
                    .iter()
                    .filter(|d| d.item_indices.contains(&item.order))
                    .map(|d| d.id.clone())
                    .collect(),
            });
        }

        let mut subscales = Vec::with_capacity(self.config.dimensions.len());
        let mut dimensions = Vec::with_capacity(self.config.dimensions.len());
        for (index, dimension) in self.config.dimensions.iter().enumerate() {
            let sum: f64 = dimension
                .item_indices
                .iter()
                .map(|order| contributions.get(order).copied().unwrap_or(0.0))
                .sum();
            let score = match dimension.aggregation {
                Aggregation::Average if !dimension.item_indices.is_empty() => {
                    sum / dimension.item_indices.len() as f64
                }
                _ => sum,
            };

            let band = dimension
                .bands
                .iter()
                .find(|b| b.contains(score))
                .ok_or_else(|| ScoringError::Unclassified {
                    dimension_id: dimension.id.clone(),
                    score,
                })?;

            subscales.push(SubscaleScore {
                id: dimension.id.clone(),
                label: dimension.label.clone(),
                score,
                level_id: band.id.clone(),
                level_label: band.label().to_string(),
                severity: band.severity,
            });

            let bounds = self.validated.bounds[index];
            dimensions.push(DimensionTrace {
                id: dimension.id.clone(),
                item_indices: dimension.item_indices.clone(),
                min_possible: bounds.min,
                max_possible: bounds.max,
                score,
            });
        }

        let total = &subscales[self.validated.total];
        let (recommended_tests, recommendation_messages) =
            self.recommendations(total.score, &subscales);

        let result = ScoredResult {
            test_id: self.config.test_id.clone(),
            total_score: total.score,
            total_level_id: total.level_id.clone(),
            total_level_label: total.level_label.clone(),
            severity: total.severity,
            subscales,
            raw_answers: answers.to_vec(),
            recommended_tests,
            recommendation_messages,
        };
        let trace = ScoreTrace {
            test_id: self.config.test_id.clone(),
            items,
            dimensions,
        };
        Ok((result, trace))
    }

    /// Evaluate recommendation rules in declared order. Suggested tests are
    /// de-duplicated, keeping the first occurrence.
    fn recommendations(&self, total: f64, subscales: &[SubscaleScore]) -> (Vec<String>, Vec<String>) {
        let mut tests: Vec<String> = Vec::new();
        let mut messages = Vec::new();

        for rule in &self.config.recommendations {
            let fired = rule.conditions.iter().all(|condition| {
                let score = match &condition.target {
                    Target::Total => Some(total),
                    Target::Subscale(id) => subscales.iter().find(|s| &s.id == id).map(|s| s.score),
                };
                score.is_some_and(|s| condition.comparator.holds(s, condition.value))
            });
            if !fired {
                continue;
            }
            for test in &rule.recommend_tests {
                if !tests.contains(test) {
                    tests.push(test.clone());
                }
            }
            if let Some(message) = &rule.message {
                messages.push(message.clone());
            }
        }

        (tests, messages)
    }
}

/// Validate `config` and score `answers` against it.
///
/// Prefer building a [`Scorer`] once when scoring many submissions for the
/// same test; this re-validates the config on every call.
pub fn score(
    test_id: &str,
    config: &ScoringConfig,
    answers: &[RawAnswer],
) -> Result<ScoredResult, ScoringError> {
    if test_id != config.test_id {
        return Err(ScoringError::TestMismatch {
            expected: config.test_id.clone(),
            actual: test_id.to_string(),
        });
    }
    Scorer::new(config.clone())?.score(answers)
}
