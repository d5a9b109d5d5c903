use thiserror::Error;

/// Errors raised by a Bango client call.
///
/// `Auth` and `Provider` are reported by Bango (or the proxy in front of it);
/// the remaining variants come from this crate or its transports.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Unknown request: {0}")]
    UnknownOperation(String),

    #[error("Access denied: {code}: {message}")]
    Auth { code: String, message: String },

    #[error("Bango error: {code}: {message}")]
    Provider { code: String, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ClientError {
    /// Response code reported by the provider, if this error carries one.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            ClientError::Auth { code, .. } | ClientError::Provider { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Response message reported by the provider, if this error carries one.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            ClientError::Auth { message, .. } | ClientError::Provider { message, .. } => {
                Some(message)
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn is_auth(&self) -> bool {
        matches!(self, ClientError::Auth { .. })
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Serialization(err.to_string())
    }
}

impl From<figment::Error> for ClientError {
    fn from(err: figment::Error) -> Self {
        ClientError::Config(err.to_string())
    }
}
