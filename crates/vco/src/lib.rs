//! Library side of the `vco` command-line tool
//!
//! Commands live here rather than in the binary so they can be driven
//! from integration tests.

pub mod commands;
pub mod config;
