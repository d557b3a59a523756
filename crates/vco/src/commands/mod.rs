//! Command implementations for the vco CLI
//!
//! Each command module handles the CLI interface and delegates to
//! vco-transform for the actual work.

pub mod excluded;
pub mod transform;
