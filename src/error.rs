//! Error types for the diff engine.
//!
//! Library modules return [`DiffError`]; the binary wraps them in `anyhow`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiffError {
    #[error("{}: {}", .path.display(), .reason)]
    Format { path: PathBuf, reason: String },

    #[error(
        "{} has {} sheet(s) but {} has {}",
        .from.display(),
        .from_sheets,
        .to.display(),
        .to_sheets
    )]
    Mismatch {
        from: PathBuf,
        to: PathBuf,
        from_sheets: u32,
        to_sheets: u32,
    },

    #[error("rendering page {} of {} failed: {}", .page, .path.display(), .reason)]
    Render {
        path: PathBuf,
        page: u32,
        reason: String,
    },

    #[error("failed to parse {}: {}", .path.display(), .reason)]
    Parse { path: PathBuf, reason: String },

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("PDF assembly failed: {0}")]
    Document(#[from] lopdf::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DiffError {
    pub fn format(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        DiffError::Format {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn parse(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        DiffError::Parse {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DiffError>;
