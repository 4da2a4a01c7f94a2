//! Spec loading errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpecError {
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid widget at {path}: {message}")]
    Invalid { path: String, message: String },

    #[error("invalid file reference: {0}")]
    FileRef(String),
}

impl SpecError {
    pub fn invalid(path: &str, message: impl Into<String>) -> Self {
        Self::Invalid {
            path: path.to_string(),
            message: message.into(),
        }
    }
}
