//! Error types for ReviewSense

/// Result type alias using ReviewSense's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for ReviewSense operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Schema-level failures: empty text, missing fields, empty or oversized batch
    #[error("{0}")]
    Validation(String),

    /// Text longer than the word limit with truncation disabled
    #[error("{0}")]
    LengthPolicy(String),

    /// Classifier execution errors
    #[error("classifier error: {0}")]
    Classifier(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Network/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

/// Coarse error category, used by callers that need to branch on the
/// failure class (status codes, metric labels) without matching payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    LengthPolicy,
    Classifier,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation_error",
            Self::LengthPolicy => "length_policy_violation",
            Self::Classifier => "classifier_error",
            Self::Internal => "internal_error",
        }
    }
}

impl Error {
    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new length policy error
    pub fn length_policy(msg: impl Into<String>) -> Self {
        Self::LengthPolicy(msg.into())
    }

    /// Create a new classifier error
    pub fn classifier(msg: impl Into<String>) -> Self {
        Self::Classifier(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::LengthPolicy(_) => ErrorKind::LengthPolicy,
            Self::Classifier(_) => ErrorKind::Classifier,
            Self::Config(_) | Self::Io(_) | Self::Serialization(_) | Self::Internal(_) => {
                ErrorKind::Internal
            }
        }
    }
}
