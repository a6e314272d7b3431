use reqwest::StatusCode;
use thiserror::Error;

/// Why a single chat-completion call produced no text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("HTTP {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("invalid response: {0}")]
    Parse(String),

    #[error("API Error: {0}")]
    Api(String),

    #[error("response contained no completion")]
    EmptyResponse,
}
