// Adapter step outcomes

use crate::error::AdapterError;
use thiserror::Error;

/// The configuration piece an adapter step needed but did not have
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unconfigured {
    #[error("no executable configured")]
    NoExecutable,

    #[error("no input path configured")]
    NoInputPath,

    #[error("no output path configured")]
    NoOutputPath,
}

/// Tagged result of an adapter step
///
/// `NotConfigured` is a "nothing to do yet" signal, distinct from a step
/// that was attempted and failed.
#[derive(Debug)]
pub enum Outcome<T> {
    Success(T),
    NotConfigured(Unconfigured),
    Failed(AdapterError),
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn is_not_configured(&self) -> bool {
        matches!(self, Outcome::NotConfigured(_))
    }

    /// Success value, discarding the reason for anything else
    pub fn success(self) -> Option<T> {
        match self {
            Outcome::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Success(value) => Outcome::Success(f(value)),
            Outcome::NotConfigured(missing) => Outcome::NotConfigured(missing),
            Outcome::Failed(err) => Outcome::Failed(err),
        }
    }

    /// Collapse into a `Result`, turning `NotConfigured` into an error
    pub fn into_result(self) -> Result<T, AdapterError> {
        match self {
            Outcome::Success(value) => Ok(value),
            Outcome::NotConfigured(missing) => Err(AdapterError::NotConfigured(missing)),
            Outcome::Failed(err) => Err(err),
        }
    }
}

impl<T> From<Result<T, AdapterError>> for Outcome<T> {
    fn from(result: Result<T, AdapterError>) -> Self {
        match result {
            Ok(value) => Outcome::Success(value),
            Err(AdapterError::NotConfigured(missing)) => Outcome::NotConfigured(missing),
            Err(err) => Outcome::Failed(err),
        }
    }
}
