//! Subcommands of the `extracto` binary.

pub mod batch;
pub mod config;
pub mod parse;
