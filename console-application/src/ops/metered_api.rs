use std::sync::Arc;

use async_trait::async_trait;
use console_domain::{ApiEnvelope, ApiError, BackendApi, QueryParams};
use serde_json::Value;

use crate::Metrics;

pub struct MeteredApi {
    inner: Arc<dyn BackendApi>,
    metrics: Arc<Metrics>,
}

impl MeteredApi {
    pub fn new(inner: Arc<dyn BackendApi>, metrics: Arc<Metrics>) -> Self {
        Self { inner, metrics }
    }

    fn track(&self, result: Result<ApiEnvelope, ApiError>) -> Result<ApiEnvelope, ApiError> {
        self.metrics.record_request(result.is_ok());
        result
    }
}

#[async_trait]
impl BackendApi for MeteredApi {
    async fn get(&self, path: &str, params: &QueryParams) -> Result<ApiEnvelope, ApiError> {
        let result = self.inner.get(path, params).await;
        self.track(result)
    }

    async fn post(&self, path: &str, body: Option<Value>) -> Result<ApiEnvelope, ApiError> {
        let result = self.inner.post(path, body).await;
        self.track(result)
    }

    async fn put(&self, path: &str, body: Option<Value>) -> Result<ApiEnvelope, ApiError> {
        let result = self.inner.put(path, body).await;
        self.track(result)
    }

    async fn del(&self, path: &str) -> Result<ApiEnvelope, ApiError> {
        let result = self.inner.del(path).await;
        self.track(result)
    }
}
