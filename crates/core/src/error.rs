//! Error types for the crosstool generator
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

use ndk_crosstool_toolchain::NdkError;

/// Main error type for the crosstool generator
#[derive(Error, Debug)]
pub enum CrosstoolError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("NDK error: {0}")]
    Ndk(#[from] NdkError),
}

/// Result type alias for crosstool operations
pub type Result<T> = std::result::Result<T, CrosstoolError>;

impl CrosstoolError {
    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            CrosstoolError::Io(e) => format!("File operation failed: {}", e),
            CrosstoolError::Config(msg) => format!("Configuration error: {}", msg),
            CrosstoolError::TomlParse(e) => format!("Invalid configuration file: {}", e),
            CrosstoolError::Ndk(e) => format!("Android NDK issue: {}", e),
            _ => self.to_string(),
        }
    }
}
