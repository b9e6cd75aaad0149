//! Client for Validator nodes.
//!
//! Validators hold the authoritative account state: the primary validator
//! processes new blocks and confirmation validators re-verify its results.
//! [`Validator`] maps each REST resource of a validator node onto one method:
//!
//! | Method | HTTP | Path |
//! |--------|------|------|
//! | [`Validator::fetch_accounts`] | GET | `/accounts` |
//! | [`Validator::fetch_account_balance`] | GET | `/accounts/{account_number}/balance` |
//! | [`Validator::fetch_account_balance_lock`] | GET | `/accounts/{account_number}/balance_lock` |
//! | [`Validator::fetch_confirmation_block`] | GET | `/confirmation_blocks/{block_identifier}/valid` |
//! | [`Validator::fetch_validator_config`] | GET | `/config` |
//! | [`Validator::connection_requests`] | POST | `/connection_requests` |
//! | [`Validator::clean`] | POST | `/clean` |
//! | [`Validator::crawl`] | POST | `/crawl` |
//! | [`Validator::fetch_banks`] | GET | `/banks` |
//! | [`Validator::fetch_bank`] | GET | `/banks/{node_identifier}` |
//! | [`Validator::patch_bank`] | PATCH | `/banks/{node_identifier}` |
//! | [`Validator::fetch_validators`] | GET | `/validators` |
//! | [`Validator::fetch_validator`] | GET | `/validators/{node_identifier}` |
//! | [`Validator::patch_validators`] | PATCH | `/validators/{node_identifier}` |
//! | [`Validator::post_upgrade_request`] | POST | `/upgrade_request` |
//!
//! The `clean`, `crawl` and `connection_requests` operations take the caller's
//! hex signing key and build the signed envelope themselves via
//! [`generate_signed_request`]; the remaining write operations accept a
//! precomputed signature like their [`Bank`](crate::Bank) counterparts.

use std::time::Duration;

use log::info;
use serde_json::{Value, json};
use url::Url;

use crate::error::ClientError;
use crate::node_client::NodeClient;
use crate::signing::generate_signed_request;

/// HTTP client for one Validator node, primary or confirmation.
///
/// Like [`Bank`](crate::Bank), every method is a single request returning the
/// node's JSON reply as a [`Value`]. The signing key passed to the control
/// operations is used for one envelope and not retained.
///
/// # Example
///
/// ```rust,no_run
/// use url::Url;
/// use tnb::Validator;
///
/// # async fn example() -> Result<(), tnb::ClientError> {
/// let validator = Validator::new(Url::parse("http://157.230.75.212")?)?;
///
/// let balance = validator
///     .fetch_account_balance("0cdd4ba04456ca169baca3d66eace869520c62fe84421329086e03d91a68acdb")
///     .await?;
/// println!("balance: {}", balance["balance"]);
/// # Ok(())
/// # }
/// ```
pub struct Validator {
    client: NodeClient,
}

impl Validator {
    /// Creates a client for the validator at `base_url` with the default
    /// request timeout (30 seconds).
    pub fn new(base_url: Url) -> Result<Self, ClientError> {
        Ok(Self {
            client: NodeClient::new(base_url)?,
        })
    }

    /// Creates a client with a caller-chosen transport timeout.
    pub fn with_timeout(base_url: Url, timeout: Duration) -> Result<Self, ClientError> {
        Ok(Self {
            client: NodeClient::with_timeout(base_url, timeout)?,
        })
    }

    /// Returns the configured node address, for logging and display.
    pub fn address(&self) -> String {
        self.client.base_url().to_string()
    }

    /// Fetch the accounts tracked by the validator.
    ///
    /// Paged like the bank listings: `offset` is the record to start at,
    /// `limit` caps the page size.
    pub async fn fetch_accounts(&self, offset: u64, limit: u64) -> Result<Value, ClientError> {
        let params = [("offset", offset), ("limit", limit)];
        self.client.fetch("/accounts", Some(&params)).await
    }

    /// Fetch the balance of one account.
    pub async fn fetch_account_balance(&self, account_number: &str) -> Result<Value, ClientError> {
        let resource = format!("/accounts/{account_number}/balance");
        self.client.fetch(&resource, None).await
    }

    /// Fetch the balance lock of one account.
    ///
    /// The balance lock is the value a block's `balance_key` must match for
    /// the validator to accept it.
    pub async fn fetch_account_balance_lock(&self, account_number: &str) -> Result<Value, ClientError> {
        let resource = format!("/accounts/{account_number}/balance_lock");
        self.client.fetch(&resource, None).await
    }

    /// Check whether the validator holds a valid confirmation block for
    /// `block_identifier`.
    pub async fn fetch_confirmation_block(&self, block_identifier: &str) -> Result<Value, ClientError> {
        let resource = format!("/confirmation_blocks/{block_identifier}/valid");
        self.client.fetch(&resource, None).await
    }

    /// Fetch the validator's node configuration.
    pub async fn fetch_validator_config(&self) -> Result<Value, ClientError> {
        self.client.fetch("/config", None).await
    }

    /// Ask the validator to connect back to the node at `ip_address`.
    ///
    /// The envelope is signed here with `signing_key`; the node identifier the
    /// validator sees is derived from that key.
    pub async fn connection_requests(
        &self,
        ip_address: &str,
        port: u16,
        protocol: &str,
        signing_key: &str,
    ) -> Result<Value, ClientError> {
        info!(target: "audit", ip_address = ip_address; "HTTP: Requesting connection");
        let signed = generate_signed_request(
            json!({
                "ip_address": ip_address,
                "port": port,
                "protocol": protocol,
            }),
            signing_key,
        )?;
        self.client.post("/connection_requests", &serde_json::to_value(&signed)?).await
    }

    /// Start or stop the validator's registered-node clean process.
    ///
    /// `action` is `"start"` or `"stop"`; the node rejects anything else.
    pub async fn clean(&self, signing_key: &str, action: &str) -> Result<Value, ClientError> {
        info!(target: "audit", action = action; "HTTP: Signalling clean");
        let signed = generate_signed_request(json!({ "clean": action }), signing_key)?;
        self.client.post("/clean", &serde_json::to_value(&signed)?).await
    }

    /// Start or stop the validator's network crawl.
    ///
    /// `action` is `"start"` or `"stop"`; the node rejects anything else.
    pub async fn crawl(&self, signing_key: &str, action: &str) -> Result<Value, ClientError> {
        info!(target: "audit", action = action; "HTTP: Signalling crawl");
        let signed = generate_signed_request(json!({ "crawl": action }), signing_key)?;
        self.client.post("/crawl", &serde_json::to_value(&signed)?).await
    }

    /// Fetch the banks the validator knows about.
    pub async fn fetch_banks(&self, offset: u64, limit: u64) -> Result<Value, ClientError> {
        let params = [("offset", offset), ("limit", limit)];
        self.client.fetch("/banks", Some(&params)).await
    }

    /// Fetch one bank by its node identifier.
    pub async fn fetch_bank(&self, node_identifier: &str) -> Result<Value, ClientError> {
        let resource = format!("/banks/{node_identifier}");
        self.client.fetch(&resource, None).await
    }

    /// Set the trust level the validator assigns to a bank.
    pub async fn patch_bank(
        &self,
        trust: f64,
        node_identifier: &str,
        signature: &str,
    ) -> Result<Value, ClientError> {
        let resource = format!("/banks/{node_identifier}");
        let body = json!({
            "message": { "trust": trust },
            "node_identifier": node_identifier,
            "signature": signature,
        });
        self.client.patch(&resource, &body).await
    }

    /// Fetch the validators this validator knows about.
    pub async fn fetch_validators(&self, offset: u64, limit: u64) -> Result<Value, ClientError> {
        let params = [("offset", offset), ("limit", limit)];
        self.client.fetch("/validators", Some(&params)).await
    }

    /// Fetch one validator by its node identifier.
    pub async fn fetch_validator(&self, node_identifier: &str) -> Result<Value, ClientError> {
        let resource = format!("/validators/{node_identifier}");
        self.client.fetch(&resource, None).await
    }

    /// Set the trust level the validator assigns to another validator.
    pub async fn patch_validators(
        &self,
        node_identifier: &str,
        trust: f64,
        signature: &str,
    ) -> Result<Value, ClientError> {
        let resource = format!("/validators/{node_identifier}");
        let body = json!({
            "message": { "trust": trust },
            "node_identifier": node_identifier,
            "signature": signature,
        });
        self.client.patch(&resource, &body).await
    }

    /// Ask the validator identified by `validator_node_identifier` to take
    /// over as primary.
    pub async fn post_upgrade_request(
        &self,
        validator_node_identifier: &str,
        node_identifier: &str,
        signature: &str,
    ) -> Result<Value, ClientError> {
        let body = json!({
            "message": { "validator_node_identifier": validator_node_identifier },
            "node_identifier": node_identifier,
            "signature": signature,
        });
        self.client.post("/upgrade_request", &body).await
    }
}
