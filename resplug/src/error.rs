//! Error types for resplug

/// Error type for resplug operations
#[derive(Debug, thiserror::Error)]
pub enum ResplugError {
    #[error("Missing required property '{0}'")]
    MissingRequiredProperty(String),

    #[error("Ambiguous arguments: {0}")]
    AmbiguousArguments(String),

    #[error("Invalid resource options: {0}")]
    InvalidOptions(String),

    #[error("Invalid property values: {0}")]
    InvalidValues(String),

    #[error("Invalid type token: {0}")]
    InvalidTypeToken(String),

    #[error("Invalid URN: {0}")]
    InvalidUrn(String),

    #[error("Property not found: {0}")]
    PropertyNotFound(String),

    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    #[error("Encoding error: {0}")]
    EncodingError(String),

    #[error("Decoding error: {0}")]
    DecodingError(String),

    #[error("Registration of {name} failed: {message}")]
    Registration { name: String, message: String },

    #[error("Invoke of {token} failed: {message}")]
    Invoke { token: String, message: String },

    #[error("Output was dropped before it was resolved")]
    OutputDropped,

    #[error("Output rejected: {0}")]
    OutputRejected(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Task failed: {0}")]
    TaskFailed(String),

    #[error("{0}")]
    Custom(String),
}

/// Result type alias for resplug operations
pub type Result<T> = std::result::Result<T, ResplugError>;

impl From<String> for ResplugError {
    fn from(s: String) -> Self {
        ResplugError::Custom(s)
    }
}

impl From<&str> for ResplugError {
    fn from(s: &str) -> Self {
        ResplugError::Custom(s.to_string())
    }
}

impl From<tokio::task::JoinError> for ResplugError {
    fn from(err: tokio::task::JoinError) -> Self {
        ResplugError::TaskFailed(err.to_string())
    }
}
