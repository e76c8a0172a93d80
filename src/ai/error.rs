//! Error types for text generation

use thiserror::Error;

/// Result type for text-generation operations
pub type AiResult<T> = Result<T, AiError>;

/// Errors that can occur while talking to a generation backend
#[derive(Error, Debug)]
pub enum AiError {
    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error: {status_code} - {message}")]
    ApiError { status_code: u16, message: String },
}

impl AiError {
    /// User-facing message, embedded into the labeled Portuguese error
    /// strings the agent returns.
    pub fn user_message(&self) -> String {
        match self {
            AiError::ProviderError(msg) => msg.clone(),
            AiError::ConfigurationError(msg) => msg.clone(),
            AiError::NetworkError(msg) => msg.clone(),
            AiError::ApiError {
                status_code,
                message,
            } => format!("API retornou status {status_code}: {message}"),
        }
    }
}
