//! Command-line front end for `blog-lint`.
//!
//! The binary is a thin wrapper: argument parsing and the run loop live
//! here so they can be driven from tests without spawning a process.

pub mod cli;
pub mod logging;
