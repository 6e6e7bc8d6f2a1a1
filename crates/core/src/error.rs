// Central Error Type for the Adapter

use crate::domain::Unconfigured;
use crate::port::{MappingError, RunError};
use thiserror::Error;

/// Adapter-level error type
#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("Not configured: {0}")]
    NotConfigured(Unconfigured),

    #[error("Mapping error: {0}")]
    Mapping(#[from] MappingError),

    #[error("Mapping panicked: {0}")]
    MappingPanicked(String),

    #[error("Execution error: {0}")]
    Run(#[from] RunError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using AdapterError
pub type Result<T> = std::result::Result<T, AdapterError>;

impl From<Unconfigured> for AdapterError {
    fn from(missing: Unconfigured) -> Self {
        AdapterError::NotConfigured(missing)
    }
}
