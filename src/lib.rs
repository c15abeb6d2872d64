pub mod history;
pub mod session;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum VoxlineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IOError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<std::io::Error> for VoxlineError {
    fn from(e: std::io::Error) -> Self {
        VoxlineError::IOError(e.to_string())
    }
}

impl From<serde_json::Error> for VoxlineError {
    fn from(e: serde_json::Error) -> Self {
        VoxlineError::SerializationError(e.to_string())
    }
}

impl VoxlineError {
    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Bad configuration requires user intervention
            VoxlineError::ConfigError(_) => false,
            VoxlineError::IOError(_) => false,
            // A corrupt call log can be cleared and rebuilt
            VoxlineError::SerializationError(_) => true,
        }
    }

    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            VoxlineError::ConfigError(_) => {
                "Call configuration error. Please check settings.".to_string()
            }
            VoxlineError::IOError(_) => {
                "File system error occurred.".to_string()
            }
            VoxlineError::SerializationError(_) => {
                "Call history could not be read. It may be corrupt.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, VoxlineError>;
