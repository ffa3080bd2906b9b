//! Tooling & Integration Layer
//!
//! Command-line surface over a session, plus text formatting for its output.

pub mod cli;
pub mod format;

pub use cli::{Cli, CliContext, Commands};
