//! Command implementations for the dslgen CLI.
//!
//! Each command resolves its inputs, runs the operation, prints its result
//! in the requested format and returns an exit code.

pub mod completions;
pub mod generate;
pub mod scan;
