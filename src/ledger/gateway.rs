//! Remote ledger gateway boundary.
//!
//! # Responsibilities
//! - Abstract GET/POST request channel used by every ledger component
//! - HTTP implementation with per-request timeout and request IDs
//! - Map transport failures to [`LedgerError::RemoteUnavailable`]

use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use url::Url;
use uuid::Uuid;

use crate::config::GatewayConfig;
use crate::ledger::types::{LedgerError, LedgerResult};
use crate::observability::metrics;

/// Request ID header attached to every gateway request.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Structured response from the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayResponse {
    /// HTTP-like status code.
    pub status: u16,
    /// Decoded body. Non-JSON bodies are carried as a JSON string.
    pub body: Value,
}

impl GatewayResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// 200 response with the given body.
    pub fn ok(body: Value) -> Self {
        Self::new(200, body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The body's `status` discriminator, if present.
    pub fn status_field(&self) -> Option<&str> {
        self.body.get("status").and_then(Value::as_str)
    }

    /// Raw body text for diagnostics.
    pub fn body_text(&self) -> String {
        match &self.body {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Convert a non-success response into [`LedgerError::Remote`].
    pub fn error_for_status(self) -> LedgerResult<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(LedgerError::Remote {
                status: self.status,
                body: self.body_text(),
            })
        }
    }
}

/// Request/response channel to the remote ledger.
///
/// Routes are given as path segments (e.g. `["balance", address]`); each
/// segment is percent-encoded, so caller data cannot change the route.
pub trait LedgerGateway: Send + Sync {
    /// Issue a GET for `route`.
    fn get(&self, route: &[&str]) -> impl Future<Output = LedgerResult<GatewayResponse>> + Send;

    /// Issue a POST with a JSON body.
    fn post(
        &self,
        route: &[&str],
        body: &Value,
    ) -> impl Future<Output = LedgerResult<GatewayResponse>> + Send;
}

impl<T: LedgerGateway> LedgerGateway for &T {
    fn get(&self, route: &[&str]) -> impl Future<Output = LedgerResult<GatewayResponse>> + Send {
        (**self).get(route)
    }

    fn post(
        &self,
        route: &[&str],
        body: &Value,
    ) -> impl Future<Output = LedgerResult<GatewayResponse>> + Send {
        (**self).post(route, body)
    }
}

impl<T: LedgerGateway> LedgerGateway for Arc<T> {
    fn get(&self, route: &[&str]) -> impl Future<Output = LedgerResult<GatewayResponse>> + Send {
        (**self).get(route)
    }

    fn post(
        &self,
        route: &[&str],
        body: &Value,
    ) -> impl Future<Output = LedgerResult<GatewayResponse>> + Send {
        (**self).post(route, body)
    }
}

/// HTTP gateway backed by reqwest.
#[derive(Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: Url,
    timeout_duration: Duration,
}

impl HttpGateway {
    /// Create a gateway for the configured base URL.
    pub fn new(config: &GatewayConfig) -> LedgerResult<Self> {
        let timeout_duration = Duration::from_secs(config.request_timeout_secs);
        let base_url = parse_base_url(&config.rpc_url)?;

        let mut builder = reqwest::Client::builder().timeout(timeout_duration);
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(|e| LedgerError::RemoteUnavailable(format!("HTTP client setup: {}", e)))?;

        tracing::info!(
            rpc_url = %base_url,
            timeout_secs = config.request_timeout_secs,
            "Ledger gateway initialized"
        );

        Ok(Self {
            client,
            base_url,
            timeout_duration,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append `route` to the base URL, percent-encoding every segment.
    fn url_for(&self, route: &[&str]) -> LedgerResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                LedgerError::RemoteUnavailable(format!(
                    "Base URL {} cannot hold a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(route);
        Ok(url)
    }

    async fn send(
        &self,
        method: &'static str,
        request: reqwest::RequestBuilder,
        url: &Url,
    ) -> LedgerResult<GatewayResponse> {
        let request_id = Uuid::new_v4();
        let result = request
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                metrics::record_gateway_request(method, "unavailable");
                if e.is_timeout() {
                    tracing::warn!(%url, %request_id, "Gateway request timed out");
                    return Err(LedgerError::RemoteUnavailable(format!(
                        "Request to {} timed out after {:?}",
                        url, self.timeout_duration
                    )));
                }
                tracing::warn!(%url, %request_id, error = %e, "Gateway request failed");
                return Err(LedgerError::RemoteUnavailable(e.to_string()));
            }
        };

        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| {
            metrics::record_gateway_request(method, "unavailable");
            LedgerError::RemoteUnavailable(format!("Failed to read response body: {}", e))
        })?;
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));

        let outcome = if (200..300).contains(&status) { "ok" } else { "error" };
        metrics::record_gateway_request(method, outcome);
        tracing::debug!(%url, %request_id, status, "Gateway response");

        Ok(GatewayResponse::new(status, body))
    }
}

impl LedgerGateway for HttpGateway {
    async fn get(&self, route: &[&str]) -> LedgerResult<GatewayResponse> {
        let url = self.url_for(route)?;
        let request = self.client.get(url.clone());
        self.send("GET", request, &url).await
    }

    async fn post(&self, route: &[&str], body: &Value) -> LedgerResult<GatewayResponse> {
        let url = self.url_for(route)?;
        let request = self.client.post(url.clone()).json(body);
        self.send("POST", request, &url).await
    }
}

impl std::fmt::Debug for HttpGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGateway")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout_duration)
            .finish()
    }
}

/// Parse a base URL, normalized to end with `/`.
pub fn parse_base_url(raw: &str) -> LedgerResult<Url> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };
    let url: Url = normalized.parse().map_err(|e| {
        LedgerError::RemoteUnavailable(format!("Invalid RPC URL '{}': {}", raw, e))
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(LedgerError::RemoteUnavailable(format!(
            "Unsupported RPC URL scheme '{}'",
            url.scheme()
        )));
    }
    Ok(url)
}
