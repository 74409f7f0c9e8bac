//! Small builders shared by the built-in narrative rules.

use testology_core::models::chunk::{InterpretationChunk, Priority};
use testology_core::models::result::Severity;
use testology_scoring::config::{Band, Dimension, Item};

pub(crate) fn chunk(test_id: &str, id: &str, title: &str, body: &str) -> InterpretationChunk {
    InterpretationChunk::new(id, body)
        .title(title)
        .priority(Priority::Normal)
        .test_id(test_id)
}

pub(crate) fn urgent(test_id: &str, id: &str, title: &str, body: &str) -> InterpretationChunk {
    chunk(test_id, id, title, body).priority(Priority::High)
}

pub(crate) fn band(id: &str, label: &str, min: f64, max: f64, severity: Option<Severity>) -> Band {
    let band = Band::new(id, min, max).labelled(label);
    match severity {
        Some(s) => band.severity(s),
        None => band,
    }
}

pub(crate) fn items(count: u32, reverse: &[u32]) -> Vec<Item> {
    (1..=count)
        .map(|order| {
            if reverse.contains(&order) {
                Item::reversed(order)
            } else {
                Item::new(order)
            }
        })
        .collect()
}

pub(crate) fn dimension(id: &str, label: &str, item_indices: Vec<u32>, bands: Vec<Band>) -> Dimension {
    Dimension {
        id: id.to_string(),
        label: label.to_string(),
        item_indices,
        is_total: false,
        aggregation: Default::default(),
        bands,
    }
}

pub(crate) fn total(label: &str, item_indices: Vec<u32>, bands: Vec<Band>) -> Dimension {
    Dimension {
        is_total: true,
        ..dimension("total", label, item_indices, bands)
    }
}
