//! Error types for the TDOA estimation engine

use std::fmt;

/// Errors that can occur while configuring or feeding the estimator
#[derive(Debug, Clone)]
pub enum TdoaError {
    /// Invalid configuration (block size, sample rate, sensor spacing)
    InvalidConfig(String),

    /// Invalid input samples or channel layout
    InvalidInput(String),

    /// Audio decoding error
    DecodingError(String),

    /// Processing error outside the numeric core (queues, sources)
    ProcessingError(String),
}

impl fmt::Display for TdoaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TdoaError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            TdoaError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            TdoaError::DecodingError(msg) => write!(f, "Decoding error: {}", msg),
            TdoaError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
        }
    }
}

impl std::error::Error for TdoaError {}

impl From<symphonia::core::errors::Error> for TdoaError {
    fn from(err: symphonia::core::errors::Error) -> Self {
        TdoaError::DecodingError(err.to_string())
    }
}

impl From<std::io::Error> for TdoaError {
    fn from(err: std::io::Error) -> Self {
        TdoaError::DecodingError(err.to_string())
    }
}
