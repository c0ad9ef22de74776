//! CLI command implementations.

pub mod clean;
pub mod profile;
pub mod steps;
