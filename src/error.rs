//! The single error type surfaced by every call in this crate.
//!
//! Nothing is retried and nothing is swallowed: whatever went wrong on the
//! wire (or before it) comes back to the caller as one of these variants.

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The response body could not be parsed as JSON.
    #[error("Invalid JSON response from server.")]
    InvalidResponse,

    /// Non-success status from Discord. `body` is the decoded error payload,
    /// untouched.
    #[error("Discord API error {status}: {body}")]
    Api {
        status: u16,
        body: serde_json::Value,
    },

    /// Network-level failure (DNS, TLS, connection reset, ...).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A success response whose JSON did not have the expected shape.
    #[error("unexpected response shape: {0}")]
    Decode(#[source] serde_json::Error),

    /// Guild names must be 2..=100 characters long.
    #[error("Guild name must be between 2 and 100 characters (got {length}).")]
    InvalidGuildName { length: usize },

    /// `type` code in a channel payload that maps to no known channel kind.
    #[error("Unknown channel type: {0}")]
    UnknownChannelType(i64),

    #[error("DISCORD_TOKEN is not set")]
    MissingToken,
}

impl Error {
    /// Status code of an [`Error::Api`] failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Decoded error body of an [`Error::Api`] failure.
    pub fn body(&self) -> Option<&serde_json::Value> {
        match self {
            Error::Api { body, .. } => Some(body),
            _ => None,
        }
    }
}
