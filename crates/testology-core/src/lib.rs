//! testology-core
//!
//! Pure domain types shared by the scoring and interpretation crates, plus
//! storage key conventions. No behavior beyond small accessors; this is the
//! shared vocabulary of the Testology engine.

pub mod error;
pub mod models;
pub mod storage_keys;
