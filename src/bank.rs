//! Client for Bank nodes.
//!
//! Banks are the account-keeping role in the network: they accept signed
//! blocks from account owners, maintain trust levels for their peers, and
//! relay confirmation traffic to and from validators. [`Bank`] maps each REST
//! resource of a bank node onto one method:
//!
//! | Method | HTTP | Path |
//! |--------|------|------|
//! | [`Bank::fetch_accounts`] | GET | `/accounts` |
//! | [`Bank::fetch_bank_transactions`] | GET | `/bank_transactions` |
//! | [`Bank::fetch_invalid_blocks`] | GET | `/invalid_blocks` |
//! | [`Bank::fetch_confirmation_blocks`] | GET | `/confirmation_blocks` |
//! | [`Bank::fetch_validators`] | GET | `/validators` |
//! | [`Bank::fetch_validator_confirmation_services`] | GET | `/validator_confirmation_services` |
//! | [`Bank::create_validator_confirmation_service`] | POST | `/validator_confirmation_services` |
//! | [`Bank::fetch_banks`] | GET | `/banks` |
//! | [`Bank::fetch_config`] | GET | `/config` |
//! | [`Bank::patch_trust_level`] | PATCH | `/banks/{node_identifier}` |
//! | [`Bank::patch_account`] | PATCH | `/accounts/{account_number}` |
//! | [`Bank::patch_validator`] | PATCH | `/validators/{node_identifier}` |
//! | [`Bank::send_confirmation_block`] | POST | `/confirmation_blocks` |
//! | [`Bank::connection_requests`] | POST | `/connection_requests` |
//! | [`Bank::post_invalid_block`] | POST | `/invalid_blocks` |
//! | [`Bank::post_upgrade_notice`] | POST | `/upgrade_notice` |
//! | [`Bank::fetch_blocks`] | GET | `/blocks` |
//! | [`Bank::post_block`] | POST | `/blocks` |

use std::time::Duration;

use log::info;
use serde_json::{Value, json};
use url::Url;

use crate::error::ClientError;
use crate::node_client::NodeClient;

/// HTTP client for one Bank node.
///
/// Every method performs exactly one request and returns the node's JSON reply
/// unmodified as a [`Value`]; failures surface as [`ClientError`] with no
/// retries or other recovery. Operations that change node state carry the
/// caller-supplied signed request fields; this client never holds key
/// material for a bank.
///
/// Sharing one `Bank` across tasks or threads is safe: it holds only the
/// immutable base URL and a pooled HTTP client.
///
/// # Example
///
/// ```rust,no_run
/// use url::Url;
/// use tnb::Bank;
///
/// # async fn example() -> Result<(), tnb::ClientError> {
/// let bank = Bank::new(Url::parse("http://143.110.137.54")?)?;
///
/// let config = bank.fetch_config().await?;
/// println!("primary validator: {}", config["primary_validator"]["ip_address"]);
/// # Ok(())
/// # }
/// ```
pub struct Bank {
    client: NodeClient,
}

impl Bank {
    /// Creates a client for the bank at `base_url` with the default request
    /// timeout (30 seconds).
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

    /// Fetch the accounts known to the bank.
    ///
    /// Results are paged: `offset` is the record to start at and `limit` caps
    /// the page size. The bank reports the total count in its reply; callers
    /// iterate by advancing `offset` themselves.
    pub async fn fetch_accounts(&self, offset: u64, limit: u64) -> Result<Value, ClientError> {
        let params = [("offset", offset), ("limit", limit)];
        self.client.fetch("/accounts", Some(&params)).await
    }

    /// Fetch transactions processed by the bank.
    pub async fn fetch_bank_transactions(&self, offset: u64, limit: u64) -> Result<Value, ClientError> {
        let params = [("offset", offset), ("limit", limit)];
        self.client.fetch("/bank_transactions", Some(&params)).await
    }

    /// Fetch blocks the network flagged as invalid.
    pub async fn fetch_invalid_blocks(&self, offset: u64, limit: u64) -> Result<Value, ClientError> {
        let params = [("offset", offset), ("limit", limit)];
        self.client.fetch("/invalid_blocks", Some(&params)).await
    }

    /// Fetch confirmation blocks seen by the bank.
    pub async fn fetch_confirmation_blocks(&self, offset: u64, limit: u64) -> Result<Value, ClientError> {
        let params = [("offset", offset), ("limit", limit)];
        self.client.fetch("/confirmation_blocks", Some(&params)).await
    }

    /// Fetch the validators the bank knows about.
    pub async fn fetch_validators(&self, offset: u64, limit: u64) -> Result<Value, ClientError> {
        let params = [("offset", offset), ("limit", limit)];
        self.client.fetch("/validators", Some(&params)).await
    }

    /// Fetch the confirmation service windows the bank has been granted by
    /// validators.
    pub async fn fetch_validator_confirmation_services(
        &self,
        offset: u64,
        limit: u64,
    ) -> Result<Value, ClientError> {
        let params = [("offset", offset), ("limit", limit)];
        self.client.fetch("/validator_confirmation_services", Some(&params)).await
    }

    /// Record a confirmation service window on the bank.
    ///
    /// `end` and `start` are ISO 8601 datetimes bounding the period the
    /// validator will confirm blocks for this bank; the envelope is signed by
    /// the bank's own node identifier signing key.
    pub async fn create_validator_confirmation_service(
        &self,
        end: &str,
        start: &str,
        node_identifier: &str,
        signature: &str,
    ) -> Result<Value, ClientError> {
        let body = json!({
            "message": {
                "end": end,
                "start": start,
            },
            "node_identifier": node_identifier,
            "signature": signature,
        });
        self.client.post("/validator_confirmation_services", &body).await
    }

    /// Fetch the bank's picture of the other banks in the network.
    pub async fn fetch_banks(&self, offset: u64, limit: u64) -> Result<Value, ClientError> {
        let params = [("offset", offset), ("limit", limit)];
        self.client.fetch("/banks", Some(&params)).await
    }

    /// Fetch the bank's node configuration.
    pub async fn fetch_config(&self) -> Result<Value, ClientError> {
        self.client.fetch("/config", None).await
    }

    /// Set the trust level this bank assigns to another bank.
    ///
    /// `node_identifier` names the bank being rated and must match the signer
    /// of `signature`.
    pub async fn patch_trust_level(
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

    /// Set the trust level the bank assigns to an account.
    pub async fn patch_account(
        &self,
        account_number: &str,
        node_identifier: &str,
        trust: f64,
        signature: &str,
    ) -> Result<Value, ClientError> {
        let resource = format!("/accounts/{account_number}");
        let body = json!({
            "message": { "trust": trust },
            "node_identifier": node_identifier,
            "signature": signature,
        });
        self.client.patch(&resource, &body).await
    }

    /// Set the trust level the bank assigns to a validator.
    pub async fn patch_validator(
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

    /// Forward a confirmation block to the bank.
    ///
    /// `message` is the confirmation block content, passed through unmodified
    /// inside the signed envelope.
    pub async fn send_confirmation_block(
        &self,
        message: Value,
        node_identifier: &str,
        signature: &str,
    ) -> Result<Value, ClientError> {
        let body = json!({
            "message": message,
            "node_identifier": node_identifier,
            "signature": signature,
        });
        self.client.post("/confirmation_blocks", &body).await
    }

    /// Ask the bank to connect to the node at `ip_address`.
    ///
    /// Unlike [`Validator::connection_requests`](crate::Validator::connection_requests),
    /// the bank variant takes a precomputed signature: the requesting node
    /// signs `{ip_address, port, protocol}` itself and passes the envelope
    /// fields here.
    pub async fn connection_requests(
        &self,
        ip_address: &str,
        port: u16,
        protocol: &str,
        node_identifier: &str,
        signature: &str,
    ) -> Result<Value, ClientError> {
        let body = json!({
            "message": {
                "ip_address": ip_address,
                "port": port,
                "protocol": protocol,
            },
            "node_identifier": node_identifier,
            "signature": signature,
        });
        self.client.post("/connection_requests", &body).await
    }

    /// Report a block the primary validator rejected.
    ///
    /// Sent by a confirmation validator; `block` is the offending block as the
    /// validator received it.
    pub async fn post_invalid_block(
        &self,
        block: Value,
        block_identifier: &str,
        primary_validator_node_identifier: &str,
        node_identifier: &str,
        signature: &str,
    ) -> Result<Value, ClientError> {
        let body = json!({
            "message": {
                "block": block,
                "block_identifier": block_identifier,
                "primary_validator_node_identifier": primary_validator_node_identifier,
            },
            "node_identifier": node_identifier,
            "signature": signature,
        });
        self.client.post("/invalid_blocks", &body).await
    }

    /// Notify the bank identified by `bank_node_identifier` of a pending
    /// primary validator upgrade.
    pub async fn post_upgrade_notice(
        &self,
        bank_node_identifier: &str,
        node_identifier: &str,
        signature: &str,
    ) -> Result<Value, ClientError> {
        let body = json!({
            "message": { "bank_node_identifier": bank_node_identifier },
            "node_identifier": node_identifier,
            "signature": signature,
        });
        self.client.post("/upgrade_notice", &body).await
    }

    /// Fetch blocks the bank has processed.
    pub async fn fetch_blocks(&self, offset: u64, limit: u64) -> Result<Value, ClientError> {
        let params = [("offset", offset), ("limit", limit)];
        self.client.fetch("/blocks", Some(&params)).await
    }

    /// Submit a block of transactions on behalf of an account.
    ///
    /// `balance_key` must match the sending account's current balance lock and
    /// `signature` is the account owner's signature over the message contents.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use serde_json::json;
    /// use url::Url;
    /// use tnb::Bank;
    ///
    /// # async fn example() -> Result<(), tnb::ClientError> {
    /// let bank = Bank::new(Url::parse("http://143.110.137.54")?)?;
    ///
    /// let txs = vec![json!({
    ///     "amount": 5,
    ///     "recipient": "484b3176c63d5f37d808404af1a12c4b9649cd6f6769f35bdf5a816133623fbc",
    /// })];
    /// bank.post_block("9eca00cdd", "354dcbbb", &txs, "a2ba346d").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn post_block(
        &self,
        account_number: &str,
        balance_key: &str,
        transactions: &[Value],
        signature: &str,
    ) -> Result<Value, ClientError> {
        info!(target: "audit", account = account_number; "HTTP: Submitting block");
        let body = json!({
            "account_number": account_number,
            "message": {
                "balance_key": balance_key,
                "txs": transactions,
            },
            "signature": signature,
        });
        self.client.post("/blocks", &body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const NODE_IDENTIFIER: &str = "03edfa24a4669dcc2b49ac020d63dd8fa847a4f252424ed302a8691802f20d21";
    const SIGNATURE: &str = "98eeadfbbf9555d1eef0fe40d843a27ceb4f7ca6ea14d17b58ef3e8c6dfff685\
                             0890267a18077cea22cbbf31aef94b71d1e13db64ffaaf10d88acc4a654897e2";

    fn bank_for(server: &MockServer) -> Bank {
        Bank::new(Url::parse(&server.uri()).unwrap()).unwrap()
    }

    async fn received_body(server: &MockServer) -> Value {
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        serde_json::from_slice(&requests[0].body).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_accounts_sends_offset_and_limit() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/accounts"))
            .and(query_param("offset", "25"))
            .and(query_param("limit", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 0, "results": []})))
            .mount(&server)
            .await;

        let bank = bank_for(&server);
        let reply = bank.fetch_accounts(25, 10).await.unwrap();
        assert_eq!(reply["count"], 0);

        // The query string carries exactly the two paging parameters.
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests[0].url.query(), Some("offset=25&limit=10"));
    }

    #[tokio::test]
    async fn test_fetch_methods_hit_expected_paths() {
        let server = MockServer::start().await;
        for resource in [
            "/accounts",
            "/bank_transactions",
            "/invalid_blocks",
            "/confirmation_blocks",
            "/validators",
            "/validator_confirmation_services",
            "/banks",
            "/blocks",
        ] {
            Mock::given(method("GET"))
                .and(path(resource))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
                .expect(1)
                .mount(&server)
                .await;
        }

        let bank = bank_for(&server);
        bank.fetch_accounts(0, 50).await.unwrap();
        bank.fetch_bank_transactions(0, 50).await.unwrap();
        bank.fetch_invalid_blocks(0, 50).await.unwrap();
        bank.fetch_confirmation_blocks(0, 50).await.unwrap();
        bank.fetch_validators(0, 50).await.unwrap();
        bank.fetch_validator_confirmation_services(0, 50).await.unwrap();
        bank.fetch_banks(0, 50).await.unwrap();
        bank.fetch_blocks(0, 50).await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_config_sends_no_query() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/config"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"node_type": "BANK"})))
            .mount(&server)
            .await;

        let bank = bank_for(&server);
        let config = bank.fetch_config().await.unwrap();
        assert_eq!(config["node_type"], "BANK");

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests[0].url.query(), None);
    }

    #[tokio::test]
    async fn test_patch_trust_level_body_is_exact() {
        let server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path(format!("/banks/{NODE_IDENTIFIER}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"trust": 75.2})))
            .mount(&server)
            .await;

        let bank = bank_for(&server);
        bank.patch_trust_level(75.2, NODE_IDENTIFIER, SIGNATURE).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let body = String::from_utf8(requests[0].body.clone()).unwrap();
        assert_eq!(
            body,
            format!(
                r#"{{"message":{{"trust":75.2}},"node_identifier":"{NODE_IDENTIFIER}","signature":"{SIGNATURE}"}}"#
            )
        );
    }

    #[tokio::test]
    async fn test_trust_patches_target_expected_resources() {
        let server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/accounts/fake_account_number"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path(format!("/validators/{NODE_IDENTIFIER}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let bank = bank_for(&server);
        bank.patch_account("fake_account_number", NODE_IDENTIFIER, 40.0, SIGNATURE)
            .await
            .unwrap();
        bank.patch_validator(NODE_IDENTIFIER, 40.0, SIGNATURE).await.unwrap();

        for request in server.received_requests().await.unwrap() {
            let body: Value = serde_json::from_slice(&request.body).unwrap();
            assert_eq!(body["message"], json!({"trust": 40.0}));
            assert_eq!(body["node_identifier"], NODE_IDENTIFIER);
        }
    }

    #[tokio::test]
    async fn test_post_block_matches_wire_format() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/blocks"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "block-1"})))
            .mount(&server)
            .await;

        let bank = bank_for(&server);
        bank.post_block("acc1", "bal1", &[], "sig1").await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(
            requests[0].body,
            br#"{"account_number":"acc1","message":{"balance_key":"bal1","txs":[]},"signature":"sig1"}"#
        );
    }

    #[tokio::test]
    async fn test_create_validator_confirmation_service_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/validator_confirmation_services"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
            .mount(&server)
            .await;

        let bank = bank_for(&server);
        bank.create_validator_confirmation_service(
            "2026-09-01T00:00:00Z",
            "2026-08-01T00:00:00Z",
            NODE_IDENTIFIER,
            SIGNATURE,
        )
        .await
        .unwrap();

        let body = received_body(&server).await;
        assert_eq!(
            body,
            json!({
                "message": {
                    "end": "2026-09-01T00:00:00Z",
                    "start": "2026-08-01T00:00:00Z",
                },
                "node_identifier": NODE_IDENTIFIER,
                "signature": SIGNATURE,
            })
        );
    }

    #[tokio::test]
    async fn test_connection_requests_sends_port_as_number() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/connection_requests"))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({})))
            .mount(&server)
            .await;

        let bank = bank_for(&server);
        bank.connection_requests("144.126.219.20", 80, "http", NODE_IDENTIFIER, SIGNATURE)
            .await
            .unwrap();

        let body = received_body(&server).await;
        assert!(body["message"]["port"].is_u64());
        assert_eq!(
            body["message"],
            json!({"ip_address": "144.126.219.20", "port": 80, "protocol": "http"})
        );
    }

    #[tokio::test]
    async fn test_send_confirmation_block_passes_message_through() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/confirmation_blocks"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
            .mount(&server)
            .await;

        let message = json!({
            "block": {"account_number": "acc1", "message": {"balance_key": "bal1", "txs": []}},
            "block_identifier": "b8f7a5",
        });

        let bank = bank_for(&server);
        bank.send_confirmation_block(message.clone(), NODE_IDENTIFIER, SIGNATURE)
            .await
            .unwrap();

        let body = received_body(&server).await;
        assert_eq!(body["message"], message);
        assert_eq!(body["signature"], SIGNATURE);
    }

    #[tokio::test]
    async fn test_post_invalid_block_nests_block_payload() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/invalid_blocks"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
            .mount(&server)
            .await;

        let block = json!({"account_number": "acc1", "signature": "sig1"});

        let bank = bank_for(&server);
        bank.post_invalid_block(block.clone(), "block-9", "primary-nid", NODE_IDENTIFIER, SIGNATURE)
            .await
            .unwrap();

        let body = received_body(&server).await;
        assert_eq!(body["message"]["block"], block);
        assert_eq!(body["message"]["block_identifier"], "block-9");
        assert_eq!(body["message"]["primary_validator_node_identifier"], "primary-nid");
        assert_eq!(body["node_identifier"], NODE_IDENTIFIER);
    }

    #[tokio::test]
    async fn test_post_upgrade_notice_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/upgrade_notice"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let bank = bank_for(&server);
        let reply = bank
            .post_upgrade_notice("receiving-bank-nid", NODE_IDENTIFIER, SIGNATURE)
            .await
            .unwrap();
        // Notice endpoints acknowledge with a bare status code.
        assert_eq!(reply, Value::Null);

        let body = received_body(&server).await;
        assert_eq!(body["message"], json!({"bank_node_identifier": "receiving-bank-nid"}));
    }
}
