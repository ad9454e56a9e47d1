use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failures reported by a `SeriesStore` backend.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Encoding error: {message}")]
    Encoding { message: String },

    #[error("Invalid timestamp for {device_id}: {value}")]
    InvalidTimestamp { device_id: String, value: String },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Backend unavailable: {message}")]
    Unavailable { message: String },
}
