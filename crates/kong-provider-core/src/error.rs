//! Error types for the Kong provider
//!
//! Resolution of environment defaults never fails. Errors surface at the
//! decode step (wrong types, missing required values), when the HTTP client
//! is built, and when the admin API is called.

use thiserror::Error;

/// Errors that can occur while configuring the provider or calling the admin API
#[derive(Error, Debug)]
pub enum ProviderError {
    /// A setting name that is not part of the provider schema
    #[error("Unknown setting: {0}")]
    UnknownSetting(String),

    /// A required setting resolved to nothing
    #[error("Missing required setting: {name} (set it explicitly or via {env_var})")]
    MissingRequired { name: String, env_var: String },

    /// A value could not be converted to the type the schema declares
    #[error("Setting {name} expects a {expected} value, got {value:?} (from {origin})")]
    TypeMismatch {
        name: String,
        /// Env var name, `explicit value` or `default`
        origin: String,
        expected: &'static str,
        value: String,
    },

    /// A `.env` file could not be read
    #[error("Env file error: {0}")]
    EnvFile(String),

    /// The HTTP client could not be initialised
    #[error("Failed to build admin API client: {0}")]
    ClientBuild(String),

    /// Transport-level failure reaching the admin API
    #[error("Connection error: {0}")]
    Connection(String),

    /// The admin API rejected the credentials
    #[error("Authentication failed: {status}")]
    Authentication { status: u16 },

    /// Any other non-success response from the admin API
    #[error("Admin API error {status}: {message}")]
    AdminApi { status: u16, message: String },

    /// A response body could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),
}

impl ProviderError {
    /// Check if this error was caused by user input rather than the environment
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            ProviderError::UnknownSetting(_)
                | ProviderError::MissingRequired { .. }
                | ProviderError::TypeMismatch { .. }
                | ProviderError::EnvFile(_)
        )
    }

    /// Check if this error came from talking to the admin API
    ///
    /// An undecodable response counts: the host answered, but not as Kong.
    pub fn is_remote_error(&self) -> bool {
        matches!(
            self,
            ProviderError::Connection(_)
                | ProviderError::Authentication { .. }
                | ProviderError::AdminApi { .. }
                | ProviderError::Decode(_)
        )
    }
}

/// Result type alias for provider operations
pub type Result<T> = std::result::Result<T, ProviderError>;
