use animetrack_core::AnimetrackError;
use thiserror::Error;

/// Errors raised by the HTTP client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Building, sending or reading a request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered 401; the stored token has been cleared.
    #[error("unauthorized: stored credentials were cleared")]
    Unauthorized,

    /// The server answered with another non-2xx status.
    #[error("{path} failed with status {status}: {message}")]
    Status {
        path: String,
        status: u16,
        message: String,
    },

    /// The body of a 2xx response did not match the expected payload.
    #[error("unexpected response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Reading or writing the token file failed.
    #[error("credential storage error: {0}")]
    Credentials(#[from] std::io::Error),

    /// A configuration value could not be used.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type alias for client operations.
pub type ClientResult<T> = std::result::Result<T, ClientError>;

impl From<ClientError> for AnimetrackError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Unauthorized => AnimetrackError::Unauthorized,
            ClientError::Status {
                status, message, ..
            } => AnimetrackError::Status { status, message },
            ClientError::Decode { .. } => AnimetrackError::Decode(err.to_string()),
            ClientError::Http(ref inner) if inner.is_decode() => {
                AnimetrackError::Decode(err.to_string())
            }
            ClientError::Http(_) | ClientError::Credentials(_) | ClientError::Config(_) => {
                AnimetrackError::Transport(err.to_string())
            }
        }
    }
}
