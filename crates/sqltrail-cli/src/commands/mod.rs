//! CLI command implementations for sqltrail.

pub mod check;
pub mod classify;
pub mod exec;
