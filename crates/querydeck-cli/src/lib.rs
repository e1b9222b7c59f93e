//! The `qdeck` command-line runner.
//!
//! ```text
//! qdeck vars    <definition>
//! qdeck render  <definition> [--var NAME=VALUE]... [--type NAME=TYPE]...
//! qdeck run     <definition> --fixtures <file> [--var ...] [--view ID] [-o json|yaml|csv]
//! qdeck views
//! ```
//!
//! Logs go to stderr, filtered by `QDECK_LOG`.

pub mod cli;
pub mod commands;
pub mod fixtures;
pub mod output;

pub use cli::Cli;
pub use commands::dispatch;
