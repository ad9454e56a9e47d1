//! Error types for the ct-app service layer.

use std::path::PathBuf;

/// Unified error for CLI and other front ends.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Profile error: {0}")]
    Profile(String),

    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Profile validation failed: {0}")]
    Validation(String),

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("Curve error: {0}")]
    Curve(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for ct-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<ct_curves::CurveError> for AppError {
    fn from(err: ct_curves::CurveError) -> Self {
        AppError::Curve(err.to_string())
    }
}

impl From<ct_core::StoreError> for AppError {
    fn from(err: ct_core::StoreError) -> Self {
        AppError::Store(err.to_string())
    }
}
