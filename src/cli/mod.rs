//! Command-line interface for rendering tag descriptors

pub mod commands;
pub mod error;

pub use error::CliError;
