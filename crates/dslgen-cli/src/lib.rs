//! dslgen CLI library.
//!
//! Exposes the command implementations, source discovery and output
//! formatting used by the `dslgen` binary so they can be tested directly.

pub mod commands;
pub mod formatters;
pub mod sources;
