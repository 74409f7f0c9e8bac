//! Storage key/path conventions.
//!
//! Pure string functions. These define the canonical layout of objects a
//! persistence sink writes for Testology; the engine itself never writes.

use uuid::Uuid;

pub fn result_snapshot(id: Uuid) -> String {
    format!("results/{id}.json")
}

pub fn scoring_config(test_id: &str) -> String {
    format!("tests/{test_id}/scoring.json")
}

pub fn interpretation_table(test_id: &str) -> String {
    format!("tests/{test_id}/interpretation.json")
}

pub const RESULTS_PREFIX: &str = "results/";
