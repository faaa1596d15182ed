use thiserror::Error;

/// Errors that can occur while building or rendering an RPS document.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RpsError {
    /// A mandatory element is missing or empty.
    #[error("schema violation: mandatory element {path} is missing or empty")]
    SchemaViolation {
        /// Slash-separated element path (e.g. "InfRps/Servico/Discriminacao").
        path: String,
    },

    /// An amount could not be read as a decimal number.
    #[error("formatting error: {path} value {value:?} is not a decimal number")]
    Formatting {
        /// Slash-separated element path of the amount.
        path: String,
        /// The offending input text.
        value: String,
    },

    /// One or more validation rules failed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// XML generation error.
    #[error("XML error: {0}")]
    Xml(String),

    /// JSON payload could not be decoded.
    #[error("JSON error: {0}")]
    Json(String),
}

impl RpsError {
    pub(crate) fn missing(path: impl Into<String>) -> Self {
        Self::SchemaViolation { path: path.into() }
    }

    /// Element path the error refers to, if any.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::SchemaViolation { path } | Self::Formatting { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// A single validation error with element path and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Slash-separated path to the offending element.
    pub field: String,
    /// Human-readable error description.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<RpsError> for ValidationError {
    fn from(err: RpsError) -> Self {
        let field = err.path().unwrap_or_default().to_string();
        let message = match &err {
            RpsError::SchemaViolation { .. } => "mandatory element is missing or empty".to_string(),
            RpsError::Formatting { value, .. } => format!("{value:?} is not a decimal number"),
            other => other.to_string(),
        };
        Self { field, message }
    }
}
