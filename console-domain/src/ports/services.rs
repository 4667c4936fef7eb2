use async_trait::async_trait;
use serde_json::Value;

use crate::entities::ApiEnvelope;
use crate::error::ApiError;
use crate::value_objects::QueryParams;

/// JSON-over-HTTP access to the backend. Paths are relative to the versioned
/// API prefix, e.g. `/merchant`.
#[async_trait]
pub trait BackendApi: Send + Sync {
    async fn get(&self, path: &str, params: &QueryParams) -> Result<ApiEnvelope, ApiError>;
    async fn post(&self, path: &str, body: Option<Value>) -> Result<ApiEnvelope, ApiError>;
    async fn put(&self, path: &str, body: Option<Value>) -> Result<ApiEnvelope, ApiError>;
    async fn del(&self, path: &str) -> Result<ApiEnvelope, ApiError>;
}

#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn token(&self) -> Option<String>;
}

pub struct NoToken;

#[async_trait]
impl TokenSource for NoToken {
    async fn token(&self) -> Option<String> {
        None
    }
}
