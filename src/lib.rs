//! HTTP client library for thenewboston Bank and Validator nodes.
//!
//! This crate provides typed clients for the two public node roles of the
//! thenewboston network. It handles URL construction, query and JSON body
//! encoding, signed request envelopes, and error mapping, and returns each
//! node's JSON reply unmodified for the caller to interpret.
//!
//! # Architecture
//!
//! The crate is organized into a few components:
//!
//! - [`Bank`] - Client for bank node endpoints (accounts, blocks, trust
//!   levels, confirmation services)
//! - [`Validator`] - Client for primary and confirmation validator endpoints
//!   (balances, confirmation blocks, crawl and clean control)
//! - [`generate_signed_request`] / [`SignedRequest`] - Signed envelope
//!   construction for privileged node operations
//! - [`ClientError`] - Error type shared by every operation
//!
//! Each client method performs exactly one HTTP round trip. There are no
//! retries, caches, or background tasks; callers own any higher-level policy.
//!
//! # Example
//!
//! ```rust,no_run
//! use url::Url;
//! use tnb::Bank;
//!
//! # async fn example() -> Result<(), tnb::ClientError> {
//! let bank = Bank::new(Url::parse("http://143.110.137.54")?)?;
//!
//! let config = bank.fetch_config().await?;
//! println!("node type: {}", config["node_type"]);
//!
//! let accounts = bank.fetch_accounts(0, 50).await?;
//! println!("{} accounts", accounts["count"]);
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! All operations return [`Result`] types with appropriate error information.
//! The [`ClientError`] enum provides specific variants for the failure modes:
//!
//! - Transport failures (connection refused, timeouts)
//! - Non-success responses (the status code plus the node's error body)
//! - Malformed reply bodies
//! - Invalid signing keys passed to the signing operations

mod bank;
mod error;
mod node_client;
mod signing;
mod validator;

pub use bank::Bank;
pub use error::{ClientError, SigningError};
pub use signing::{SignedRequest, generate_signed_request};
pub use validator::Validator;
