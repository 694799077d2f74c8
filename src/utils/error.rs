use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Sheet API request failed: {0}")]
    Api(#[from] reqwest::Error),

    #[error("Sheet API returned status {status}: {message}")]
    Sheet { status: u16, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfig { field: String },

    #[error("Validation error for {field}: {reason}")]
    Validation { field: String, reason: String },
}

impl RelayError {
    /// True for failures of the remote sheet itself, the class of errors
    /// the durable appender retries.
    pub fn is_remote(&self) -> bool {
        matches!(self, RelayError::Api(_) | RelayError::Sheet { .. })
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;
