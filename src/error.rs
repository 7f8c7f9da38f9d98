use thiserror::Error;

/// Error type for convolution shape and padding computations
#[derive(Error, Debug, Clone)]
pub enum ConvError {
    /// Malformed or rank-mismatched input: wrong-length shape vectors,
    /// unsupported tensor rank. Always a caller bug.
    #[error("Invalid argument in operation '{operation}': {reason}")]
    InvalidArgument { operation: String, reason: String },

    /// Kernel/padding/input-size combination that is geometrically impossible
    /// for the requested convolution mode.
    #[error("{message}")]
    InvalidInput { message: String },

    /// Strict-mode divisibility violated. The message embeds the exact
    /// arithmetic and the output sizes obtainable via Truncate and Same modes.
    #[error("{message}")]
    InvalidConfig { message: String },

    /// An internally-derived padding or shape value became negative, meaning
    /// the already-validated intermediate values are mutually inconsistent.
    #[error("{message}")]
    InvalidState { message: String },
}

impl ConvError {
    pub fn invalid_argument(operation: &str, reason: impl Into<String>) -> Self {
        ConvError::InvalidArgument {
            operation: operation.to_string(),
            reason: reason.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        ConvError::InvalidInput {
            message: message.into(),
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        ConvError::InvalidConfig {
            message: message.into(),
        }
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        ConvError::InvalidState {
            message: message.into(),
        }
    }
}

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, ConvError>;
