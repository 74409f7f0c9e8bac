//! Stateless helpers over chunk lists. All of them preserve input order.

use std::collections::{BTreeMap, BTreeSet};

use testology_core::models::chunk::InterpretationChunk;

pub fn filter_by_test_id<'a>(
    chunks: &'a [InterpretationChunk],
    test_id: &str,
) -> Vec<&'a InterpretationChunk> {
    chunks
        .iter()
        .filter(|c| c.test_id.as_deref() == Some(test_id))
        .collect()
}

pub fn high_priority_chunks(chunks: &[InterpretationChunk]) -> Vec<&InterpretationChunk> {
    chunks.iter().filter(|c| c.is_high_priority()).collect()
}

/// Group chunks by test id. Chunks without a test id are left out.
pub fn group_by_test_id(
    chunks: &[InterpretationChunk],
) -> BTreeMap<&str, Vec<&InterpretationChunk>> {
    let mut groups: BTreeMap<&str, Vec<&InterpretationChunk>> = BTreeMap::new();
    for chunk in chunks {
        if let Some(test_id) = chunk.test_id.as_deref() {
            groups.entry(test_id).or_default().push(chunk);
        }
    }
    groups
}

/// Chunks produced by cross-test rules.
pub fn cross_test_chunks(chunks: &[InterpretationChunk]) -> Vec<&InterpretationChunk> {
    chunks.iter().filter(|c| c.is_cross_test()).collect()
}

/// Drop chunks whose id was already seen; the first occurrence wins.
pub fn dedup_by_id(chunks: Vec<InterpretationChunk>) -> Vec<InterpretationChunk> {
    let mut seen = BTreeSet::new();
    chunks
        .into_iter()
        .filter(|c| seen.insert(c.id.clone()))
        .collect()
}
