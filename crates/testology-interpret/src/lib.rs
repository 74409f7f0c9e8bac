//! testology-interpret
//!
//! Turns a scored result into an ordered list of interpretation chunks by
//! matching its level and subscale scores (and optionally other completed
//! tests) against per-test rules. Also hosts pure helpers for filtering and
//! rendering chunk lists.

pub mod chunks;
pub mod config;
pub mod cross_test;
pub mod engine;
pub mod error;
pub mod render;
pub mod table;

pub use config::{InterpretationConfig, RuleResult};
pub use engine::interpret;
pub use error::{RuleError, TableError};
