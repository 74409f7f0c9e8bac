//! Eager validation of scoring configs.
//!
//! Everything that can be wrong with a config is detected here, before any
//! answers are seen, so scoring itself only fails on bad answers.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::{Aggregation, Band, Dimension, EPSILON, OptionRange, ScoringConfig, Target};
use crate::error::ConfigError;

/// An item with its option range and weight resolved against config defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedItem {
    pub order: u32,
    pub range: OptionRange,
    pub is_reverse: bool,
    pub weight: f64,
}

/// The range of scores a dimension can reach.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBounds {
    pub min: f64,
    pub max: f64,
    /// Only whole-number scores are reachable.
    pub integral: bool,
}

/// Output of a successful validation pass.
#[derive(Debug, Clone)]
pub(crate) struct Validated {
    pub items: BTreeMap<u32, ResolvedItem>,
    pub total: usize,
    pub bounds: Vec<ScoreBounds>,
}

pub(crate) fn validate(config: &ScoringConfig) -> Result<Validated, ConfigError> {
    let items = resolve_items(config)?;

    let mut seen = BTreeSet::new();
    for dimension in &config.dimensions {
        if !seen.insert(dimension.id.as_str()) {
            return Err(ConfigError::DuplicateDimension(dimension.id.clone()));
        }
        if let Some(order) = dimension
            .item_indices
            .iter()
            .find(|order| !items.contains_key(order))
        {
            return Err(ConfigError::UnknownItem {
                dimension_id: dimension.id.clone(),
                order: *order,
            });
        }
        check_bands_wellformed(dimension)?;
    }

    for rule in &config.recommendations {
        for condition in &rule.conditions {
            if let Target::Subscale(id) = &condition.target
                && !seen.contains(id.as_str())
            {
                return Err(ConfigError::UnknownDimension {
                    rule_id: rule.id.clone(),
                    dimension_id: id.clone(),
                });
            }
        }
    }

    let total = total_dimension(config)?;

    let mut bounds = Vec::with_capacity(config.dimensions.len());
    for dimension in &config.dimensions {
        let b = dimension_bounds(dimension, &items, config.step());
        check_coverage(dimension, b)?;
        bounds.push(b);
    }

    Ok(Validated {
        items,
        total,
        bounds,
    })
}

fn resolve_items(config: &ScoringConfig) -> Result<BTreeMap<u32, ResolvedItem>, ConfigError> {
    let step = config.step();
    if !step.is_finite() || step <= 0.0 {
        return Err(ConfigError::InvalidStep(step));
    }

    let mut resolved = BTreeMap::new();
    for item in &config.items {
        let max = item
            .max_option_value
            .or(config.max_option_value)
            .ok_or(ConfigError::MissingOptionRange(item.order))?;
        if !max.is_finite() || max < 0.0 {
            return Err(ConfigError::InvalidOptionRange {
                order: item.order,
                max,
            });
        }

        let weight = item.weight();
        if !weight.is_finite() {
            return Err(ConfigError::InvalidWeight {
                order: item.order,
                weight,
            });
        }

        let entry = ResolvedItem {
            order: item.order,
            range: OptionRange { max, step },
            is_reverse: item.is_reverse,
            weight,
        };
        if resolved.insert(item.order, entry).is_some() {
            return Err(ConfigError::DuplicateItem(item.order));
        }
    }
    Ok(resolved)
}

fn total_dimension(config: &ScoringConfig) -> Result<usize, ConfigError> {
    let totals: Vec<usize> = config
        .dimensions
        .iter()
        .enumerate()
        .filter(|(_, d)| d.is_total)
        .map(|(i, _)| i)
        .collect();

    match totals.as_slice() {
        [index] => Ok(*index),
        _ => Err(ConfigError::AmbiguousTotalDimension {
            test_id: config.test_id.clone(),
            found: totals.len(),
        }),
    }
}

fn check_bands_wellformed(dimension: &Dimension) -> Result<(), ConfigError> {
    if dimension.bands.is_empty() {
        return Err(ConfigError::NoBands {
            dimension_id: dimension.id.clone(),
        });
    }
    for band in &dimension.bands {
        if !band.min.is_finite() || !band.max.is_finite() || band.min > band.max {
            return Err(ConfigError::InvalidBand {
                dimension_id: dimension.id.clone(),
                band_id: band.id.clone(),
                min: band.min,
                max: band.max,
            });
        }
    }
    Ok(())
}

/// Compute the reachable score range of a dimension.
///
/// Every item contributes between 0 and `weight * max` (reversal keeps the
/// same range), so the bounds are plain sums of those extremes.
pub fn dimension_bounds(
    dimension: &Dimension,
    items: &BTreeMap<u32, ResolvedItem>,
    step: f64,
) -> ScoreBounds {
    let mut min = 0.0;
    let mut max = 0.0;
    let mut integral = dimension.aggregation == Aggregation::Sum && is_whole(step);

    for item in dimension.item_indices.iter().filter_map(|o| items.get(o)) {
        let extreme = item.weight * item.range.max;
        min += extreme.min(0.0);
        max += extreme.max(0.0);
        integral = integral && is_whole(item.weight) && is_whole(item.range.max);
    }

    if dimension.aggregation == Aggregation::Average && !dimension.item_indices.is_empty() {
        let n = dimension.item_indices.len() as f64;
        min /= n;
        max /= n;
    }

    ScoreBounds { min, max, integral }
}

fn check_coverage(dimension: &Dimension, bounds: ScoreBounds) -> Result<(), ConfigError> {
    let mut bands: Vec<&Band> = dimension.bands.iter().collect();
    bands.sort_by(|a, b| a.min.total_cmp(&b.min));

    let gap = if bounds.integral {
        first_uncovered_integer(&bands, bounds)
    } else {
        first_uncovered_point(&bands, bounds)
    };

    match gap {
        Some(gap_from) => Err(ConfigError::UncoveredScoreRange {
            dimension_id: dimension.id.clone(),
            gap_from,
            min_possible: bounds.min,
            max_possible: bounds.max,
        }),
        None => Ok(()),
    }
}

fn first_uncovered_integer(sorted: &[&Band], bounds: ScoreBounds) -> Option<f64> {
    let hi = bounds.max.round() as i64;
    let mut next = bounds.min.round() as i64;

    for band in sorted {
        if next > hi {
            break;
        }
        let first = (band.min - EPSILON).ceil() as i64;
        let last = (band.max + EPSILON).floor() as i64;
        if last < first || last < next {
            continue;
        }
        if first > next {
            return Some(next as f64);
        }
        next = last + 1;
    }

    (next <= hi).then_some(next as f64)
}

fn first_uncovered_point(sorted: &[&Band], bounds: ScoreBounds) -> Option<f64> {
    let mut covered = bounds.min;
    let mut reached = false;

    for band in sorted {
        if band.max < covered - EPSILON {
            continue;
        }
        if band.min > covered + EPSILON {
            return Some(covered);
        }
        covered = covered.max(band.max);
        reached = true;
        if covered >= bounds.max - EPSILON {
            return None;
        }
    }

    if reached && covered >= bounds.max - EPSILON {
        None
    } else {
        Some(covered)
    }
}

fn is_whole(x: f64) -> bool {
    (x - x.round()).abs() < EPSILON
}
