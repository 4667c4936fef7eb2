use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use tracing::{debug, info_span, warn, Instrument};
use uuid::Uuid;

use console_domain::{ApiEnvelope, ApiError, BackendApi, QueryParams, RuntimeConfig, TokenSource};

use crate::utils::join_url;

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

pub struct HttpBackendApi {
    client: Client,
    base_url: String,
    tokens: Arc<dyn TokenSource>,
}

impl HttpBackendApi {
    pub fn new(config: &RuntimeConfig, tokens: Arc<dyn TokenSource>) -> Result<Self> {
        let client = Client::builder().timeout(config.request_timeout()).build()?;
        Ok(Self {
            client,
            base_url: join_url(&config.api_base_url, &config.api_prefix),
            tokens,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        params: Option<&QueryParams>,
        body: Option<Value>,
    ) -> Result<ApiEnvelope, ApiError> {
        let request_id = Uuid::new_v4().to_string();
        let span = info_span!("api_request", method = %method, path, request_id = %request_id);

        async move {
            let mut request = self
                .client
                .request(method, join_url(&self.base_url, path))
                .header(CONTENT_TYPE, "application/json")
                .header(REQUEST_ID_HEADER, request_id.as_str());

            if let Some(params) = params {
                let pairs = params.effective();
                if !pairs.is_empty() {
                    request = request.query(&pairs);
                }
            }
            if let Some(token) = self.tokens.token().await {
                request = request.bearer_auth(token);
            }
            if let Some(body) = body {
                request = request.json(&body);
            }

            let response = request.send().await.map_err(|err| {
                warn!(error = %err, "request failed before a response");
                ApiError::Transport(err.to_string())
            })?;
            let status = response.status();
            let bytes = response
                .bytes()
                .await
                .map_err(|err| ApiError::Transport(err.to_string()))?;

            if !status.is_success() {
                let message = http_error_message(status, &bytes);
                warn!(status = status.as_u16(), message = %message, "non-success response");
                return Err(ApiError::Http {
                    status: status.as_u16(),
                    message,
                });
            }

            let envelope = decode_envelope(&bytes)?;
            if envelope.code != 0 {
                warn!(code = envelope.code, message = %envelope.message, "application error");
                return Err(ApiError::Application {
                    code: envelope.code,
                    message: envelope.message,
                });
            }
            debug!(status = status.as_u16(), "request ok");
            Ok(envelope)
        }
        .instrument(span)
        .await
    }
}

/// Empty 2xx bodies decode as an empty envelope.
fn decode_envelope(bytes: &[u8]) -> Result<ApiEnvelope, ApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(ApiEnvelope::default());
    }
    serde_json::from_slice(bytes).map_err(|err| ApiError::Decode(err.to_string()))
}

/// `message`, then `error` from a JSON body, then the reason phrase.
fn http_error_message(status: StatusCode, bytes: &[u8]) -> String {
    let body: Option<Value> = serde_json::from_slice(bytes).ok();
    let from_body = body.as_ref().and_then(|body| {
        ["message", "error"].iter().find_map(|key| {
            body.get(*key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .map(str::to_string)
        })
    });
    from_body
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| format!("request failed: {}", status.as_u16()))
}

#[async_trait]
impl BackendApi for HttpBackendApi {
    async fn get(&self, path: &str, params: &QueryParams) -> Result<ApiEnvelope, ApiError> {
        self.send(Method::GET, path, Some(params), None).await
    }

    async fn post(&self, path: &str, body: Option<Value>) -> Result<ApiEnvelope, ApiError> {
        self.send(Method::POST, path, None, body).await
    }

    async fn put(&self, path: &str, body: Option<Value>) -> Result<ApiEnvelope, ApiError> {
        self.send(Method::PUT, path, None, body).await
    }

    async fn del(&self, path: &str) -> Result<ApiEnvelope, ApiError> {
        self.send(Method::DELETE, path, None, None).await
    }
}
