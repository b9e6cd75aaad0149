use std::time::Duration;

use log::debug;
use reqwest::Method;
use serde_json::Value;
use url::Url;

use crate::error::ClientError;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Shared HTTP primitive for Bank and Validator clients.
///
/// Holds the node's base URL and a pooled `reqwest` client. Every call is one
/// request and one response: no retries, no redirect away from the caller's
/// error handling.
pub(crate) struct NodeClient {
    base_url: Url,
    client: reqwest::Client,
}

impl NodeClient {
    pub fn new(base_url: Url) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: Url, timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// GET `path` with `params` encoded as the query string.
    pub async fn fetch(&self, path: &str, params: Option<&[(&str, u64)]>) -> Result<Value, ClientError> {
        self.send_request(Method::GET, path, params, None).await
    }

    /// POST `body` as JSON to `path`.
    pub async fn post(&self, path: &str, body: &Value) -> Result<Value, ClientError> {
        self.send_request(Method::POST, path, None, Some(body)).await
    }

    /// PATCH `body` as JSON to `path`.
    pub async fn patch(&self, path: &str, body: &Value) -> Result<Value, ClientError> {
        self.send_request(Method::PATCH, path, None, Some(body)).await
    }

    async fn send_request(
        &self,
        method: Method,
        path: &str,
        params: Option<&[(&str, u64)]>,
        body: Option<&Value>,
    ) -> Result<Value, ClientError> {
        let url = self.base_url.join(path)?;
        debug!(method:% = method, path = path; "HTTP: Sending node request");

        let mut req = self.client.request(method, url);
        if let Some(params) = params {
            req = req.query(params);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send().await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read response body".into());
            let body: Value = serde_json::from_str(&text).unwrap_or(Value::String(text));
            return Err(ClientError::Request { status, body });
        }

        let text = resp.text().await?;
        if text.is_empty() {
            // Some write endpoints acknowledge with a bare status code.
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}
