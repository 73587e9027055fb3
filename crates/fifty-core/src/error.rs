//! Error types for Fifty

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Malformed input rejected at the boundary (bad date, bad goal id, ...)
    #[error("Validation error: {0}")]
    Validation(String),

    /// The insight generator timed out, replied with garbage, or is not configured
    #[error("Insight generator unavailable: {0}")]
    GeneratorUnavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
