//! Crate-level error type.

use crate::charts::ChartError;
use crate::notebook::{NotebookError, ScriptError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlidesError {
    #[error("Chart error: {0}")]
    Chart(#[from] ChartError),

    #[error("Notebook error: {0}")]
    Notebook(#[from] NotebookError),

    #[error("Chart cell error: {0}")]
    Script(#[from] ScriptError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Zip operation failed: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },
}

pub type Result<T> = std::result::Result<T, SlidesError>;
