use thiserror::Error;

/// Errors that can occur during AnimeTracker core operations.
#[derive(Debug, Error)]
pub enum AnimetrackError {
    /// A top-list capacity of zero was requested.
    #[error("top capacity must be at least 1, got {0}")]
    InvalidCapacity(u32),

    /// A drag or remove referenced a slot outside the top list.
    #[error("index {index} is out of bounds for a top list of length {len}")]
    IndexOutOfBounds {
        /// The offending index.
        index: usize,
        /// Length of the list at the time of the call.
        len: usize,
    },

    /// A list was created or renamed with a blank title.
    #[error("list title must not be empty")]
    EmptyListTitle,

    /// The server rejected the bearer token; stored credentials were cleared.
    #[error("unauthorized: stored credentials were cleared, log in again")]
    Unauthorized,

    /// The server answered with a non-2xx status.
    #[error("request failed with status {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// The `message` field of the error body, or a generic description.
        message: String,
    },

    /// The request never produced a response (connect, timeout, TLS).
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body did not match the expected payload.
    #[error("malformed response: {0}")]
    Decode(String),
}

/// Result type alias for AnimeTracker operations.
pub type Result<T> = std::result::Result<T, AnimetrackError>;
