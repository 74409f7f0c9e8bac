//! testology-cli
//!
//! Command-line front end for the scoring and interpretation engine.

pub mod commands;
pub mod config;
