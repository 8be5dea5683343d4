//! tokensync CLI Library
//!
//! Core library components for the `tokensync` binary.

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

pub use cli::{Cli, OutputFormat};
pub use error::CliError;
