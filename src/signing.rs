//! Signed request envelopes.
//!
//! Every privileged node operation travels as a `{message, node_identifier,
//! signature}` envelope: the message payload, the hex Ed25519 verifying key of
//! the sender, and the hex Ed25519 signature over the canonical JSON form of
//! the message. Nodes recompute the canonical form server-side and check the
//! signature against the claimed identifier, so the bytes signed here must be
//! byte-identical to what a node derives from `message`. The message is
//! therefore canonicalized (RFC 8785: sorted keys, compact separators) before
//! signing rather than signed as-given.
//!
//! [`Validator`](crate::Validator) calls [`generate_signed_request`] internally
//! for its control actions; it is public so callers can precompute envelopes
//! for operations that accept a ready-made signature.

use ed25519_dalek::{Signer, SigningKey};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SigningError;

/// A fully formed signed request envelope, ready to be posted to a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedRequest {
    /// The payload that was signed, unchanged.
    pub message: Value,
    /// Hex verifying key derived from the signing key.
    pub node_identifier: String,
    /// Hex Ed25519 signature over the canonical JSON form of `message`.
    pub signature: String,
}

/// Builds a signed request envelope from a message payload and a hex signing key.
///
/// `signing_key` is the 64-character hex encoding of a 32-byte Ed25519 seed.
/// The node identifier is derived from it, so the caller supplies only the key
/// and the data.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use tnb::generate_signed_request;
///
/// let signing_key = "a37e2836805975f334108b55523634c995bd2a4db610062f404510617e83126f";
/// let signed = generate_signed_request(json!({"crawl": "start"}), signing_key)?;
///
/// assert_eq!(signed.message, json!({"crawl": "start"}));
/// assert_eq!(signed.node_identifier.len(), 64);
/// assert_eq!(signed.signature.len(), 128);
/// # Ok::<(), tnb::SigningError>(())
/// ```
///
/// # Errors
///
/// Returns [`SigningError`] if the key is not valid hex, does not decode to 32
/// bytes, or the data cannot be canonically serialized.
pub fn generate_signed_request(data: Value, signing_key: &str) -> Result<SignedRequest, SigningError> {
    let key = decode_signing_key(signing_key)?;
    let canonical = serde_jcs::to_string(&data)?;
    let signature = key.sign(canonical.as_bytes());

    Ok(SignedRequest {
        message: data,
        node_identifier: hex::encode(key.verifying_key().to_bytes()),
        signature: hex::encode(signature.to_bytes()),
    })
}

fn decode_signing_key(signing_key: &str) -> Result<SigningKey, SigningError> {
    let bytes = hex::decode(signing_key)?;
    let seed: [u8; 32] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| SigningError::KeyLength(bytes.len()))?;
    Ok(SigningKey::from_bytes(&seed))
}
