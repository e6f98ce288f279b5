//! Error types for anno-yaml

/// Result type for anno-yaml operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in anno-yaml operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to parse YAML content: {message}")]
    Parse { message: String },

    #[error(transparent)]
    Fs(#[from] anno_fs::Error),

    #[error("Invalid configuration: {message}")]
    Configuration { message: String },
}

impl Error {
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}
