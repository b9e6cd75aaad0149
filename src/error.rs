//! Error types for client operations.
//!
//! Every failure surfaces directly to the caller with no transformation and no
//! local recovery: there is no retry logic anywhere in this crate, so from the
//! caller's perspective every error is recoverable by issuing the call again.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while talking to a Bank or Validator node.
///
/// The two kinds a caller usually cares about are [`Transport`](ClientError::Transport)
/// (the network layer could not complete the exchange) and
/// [`Request`](ClientError::Request) (the node answered with a non-success status).
/// The remaining variants cover malformed inputs and unparseable replies.
///
/// # Example
///
/// ```rust
/// use tnb::ClientError;
///
/// fn describe(err: &ClientError) -> String {
///     match err {
///         ClientError::Request { status, body } => {
///             format!("node rejected the request ({status}): {body}")
///         },
///         other => other.to_string(),
///     }
/// }
/// ```
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never completed: connection refused, timeout, DNS failure,
    /// TLS handshake error.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The node responded with a non-success HTTP status.
    ///
    /// Carries the status code and the parsed JSON error body for caller
    /// inspection. A body that is not valid JSON is carried as a JSON string.
    #[error("Request failed with status {status}: {body}")]
    Request {
        /// The HTTP status code returned by the node.
        status: StatusCode,
        /// The error body, parsed as JSON where possible.
        body: Value,
    },

    /// Joining the base URL with a resource path produced an invalid URL.
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// A 2xx response body could not be decoded as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A signed request could not be built from the supplied signing key.
    #[error("Signing error: {0}")]
    Signing(#[from] SigningError),
}

/// Errors from building a signed request envelope.
#[derive(Debug, Error)]
pub enum SigningError {
    /// The signing key was not valid hex.
    #[error("Signing key is not valid hex: {0}")]
    MalformedKey(#[from] hex::FromHexError),

    /// The decoded signing key was not the Ed25519 seed length (32 bytes).
    #[error("Signing key must decode to 32 bytes, got {0}")]
    KeyLength(usize),

    /// The message data could not be canonically serialized for signing.
    #[error("Message serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}
