use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExtractError>;

/// How a caller should surface a failure to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Please add some content first")]
    EmptyInput,

    #[error("Unknown extraction type: {0}")]
    UnknownType(String),

    #[error("Invalid regex pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("No data to export")]
    EmptyStore,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ExtractError {
    pub fn severity(&self) -> Severity {
        match self {
            ExtractError::EmptyInput | ExtractError::EmptyStore => Severity::Warning,
            _ => Severity::Error,
        }
    }
}
