//! Render error types.

use sunwet_api::SpecError;
use sunwet_layout::LayoutError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum RenderError {
    /// The widget config itself is broken. Aborts the whole view.
    #[error("config error: {0}")]
    Config(String),

    #[error("missing field `{0}`")]
    MissingField(String),

    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    #[error("query `{id}` failed: {message}")]
    Query { id: String, message: String },
}

/// How far an error travels before it is caught.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Aborts the whole view.
    Config,
    /// Caught at the nearest `DataRows` boundary.
    Data,
    /// Caught at the nearest `DataRows` boundary.
    Query,
}

impl RenderError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn type_mismatch(msg: impl Into<String>) -> Self {
        Self::TypeMismatch(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            RenderError::Config(_) => ErrorKind::Config,
            RenderError::MissingField(_) | RenderError::TypeMismatch(_) => ErrorKind::Data,
            RenderError::Query { .. } => ErrorKind::Query,
        }
    }

    /// Whether a `DataRows` boundary may absorb this error.
    pub fn is_local(&self) -> bool {
        self.kind() != ErrorKind::Config
    }
}

impl ErrorKind {
    pub fn label(self) -> &'static str {
        match self {
            ErrorKind::Config => "config",
            ErrorKind::Data => "data",
            ErrorKind::Query => "query",
        }
    }
}

impl From<SpecError> for RenderError {
    fn from(err: SpecError) -> Self {
        RenderError::Config(err.to_string())
    }
}

impl From<LayoutError> for RenderError {
    fn from(err: LayoutError) -> Self {
        RenderError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(RenderError::config("x").kind(), ErrorKind::Config);
        assert_eq!(RenderError::MissingField("x".into()).kind(), ErrorKind::Data);
        assert_eq!(RenderError::type_mismatch("x").kind(), ErrorKind::Data);
        let query = RenderError::Query {
            id: "q".into(),
            message: "timeout".into(),
        };
        assert_eq!(query.kind(), ErrorKind::Query);
        assert!(query.is_local());
        assert!(!RenderError::config("x").is_local());
    }

    #[test]
    fn test_display_prefixes_are_stable() {
        assert!(RenderError::config("x").to_string().starts_with("config error:"));
        assert_eq!(RenderError::MissingField("title".into()).to_string(), "missing field `title`");
        let query = RenderError::Query {
            id: "tracks".into(),
            message: "timeout".into(),
        };
        assert_eq!(query.to_string(), "query `tracks` failed: timeout");
    }

    #[test]
    fn test_layout_errors_are_config() {
        let err: RenderError = LayoutError::NoColumns.into();
        assert_eq!(err.kind(), ErrorKind::Config);
    }
}
