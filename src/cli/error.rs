//! CLI-specific error types

use crate::config::ConfigError;
use crate::render::RenderError;
use crate::tree::TagError;
use std::path::PathBuf;
use thiserror::Error;

/// CLI-specific error type
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read file {0}: {1}")]
    FileReadError(PathBuf, String),

    #[error("Failed to write file {0}: {1}")]
    FileWriteError(PathBuf, String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Tag error: {0}")]
    TagError(#[from] TagError),

    #[error("Render error: {0}")]
    RenderError(#[from] RenderError),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("IO error: {0}")]
    IoError(String),
}
