use thiserror::Error;

use crate::form::ValidationErrors;
use crate::id::ProfileId;

pub type Result<T> = std::result::Result<T, ProfileError>;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to fetch profiles: {0}")]
    Fetch(String),
    #[error("Profile not found: {0}")]
    NotFound(ProfileId),
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("Parsing error")]
    Parse,
    #[error("Storage error: {0} {1}")]
    Storage(String, String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ProfileError {
    /// Failures the user can retry from the UI without changing input.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Fetch(_) | Self::Io(_))
    }
}

impl From<serde_json::Error> for ProfileError {
    fn from(_: serde_json::Error) -> Self {
        Self::Parse
    }
}

impl From<ValidationErrors> for ProfileError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}
