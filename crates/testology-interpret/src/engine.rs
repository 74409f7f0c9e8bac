use testology_core::models::chunk::InterpretationChunk;
use testology_core::models::result::ScoredResult;

use crate::config::{InterpretationConfig, RuleResult};
use crate::cross_test::ResultSet;

/// Produce the interpretation chunks for a scored result.
///
/// Output order is part of the contract:
///
/// 1. the chunk from the rule for `result.total_level_id`, if one exists;
/// 2. the subscale rule's chunks, in the order it returned them;
/// 3. chunks from cross-test rules that fire, in declared order. These are
///    only evaluated when `other_results` is supplied.
///
/// Nothing is re-sorted or de-duplicated. A rule error is returned as is.
pub fn interpret(
    result: &ScoredResult,
    config: &InterpretationConfig,
    other_results: Option<&[ScoredResult]>,
) -> RuleResult<Vec<InterpretationChunk>> {
    let mut chunks = Vec::new();

    if let Some(rule) = config.by_level.get(&result.total_level_id) {
        chunks.push(rule(result)?);
    }

    if let Some(rule) = &config.by_subscale {
        chunks.extend(rule(result)?);
    }

    if let Some(others) = other_results
        && !config.cross_test.is_empty()
    {
        let set = ResultSet::new(result, others);
        for rule in &config.cross_test {
            if let Some(chunk) = rule.evaluate(&set)? {
                chunks.push(chunk);
            }
        }
    }

    Ok(chunks)
}
