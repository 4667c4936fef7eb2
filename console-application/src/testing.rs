// In-memory fakes for tests (enabled with the `test-util` feature)

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use console_domain::{
    ApiEnvelope, ApiError, BackendApi, QueryParams, RuntimeConfig, Session, SessionStore,
};
use serde_json::Value;

use crate::{AppState, SessionContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FakeMethod {
    Get,
    Post,
    Put,
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: FakeMethod,
    pub path: String,
    pub params: Vec<(String, String)>,
    pub body: Option<Value>,
}

/// Scripted backend. Responses queue per route; the last one repeats.
/// Unscripted routes answer 404.
#[derive(Default)]
pub struct FakeBackend {
    routes: Mutex<HashMap<(FakeMethod, String), VecDeque<Result<ApiEnvelope, ApiError>>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, method: FakeMethod, path: &str, data: Value) {
        self.push(method, path, Ok(ApiEnvelope::ok(data)));
    }

    pub fn respond_envelope(&self, method: FakeMethod, path: &str, envelope: ApiEnvelope) {
        self.push(method, path, Ok(envelope));
    }

    pub fn fail(&self, method: FakeMethod, path: &str, err: ApiError) {
        self.push(method, path, Err(err));
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    pub fn call_count(&self, method: FakeMethod, path: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.method == method && call.path == path)
            .count()
    }

    pub fn last_body(&self, method: FakeMethod, path: &str) -> Option<Value> {
        self.calls()
            .into_iter()
            .rev()
            .find(|call| call.method == method && call.path == path)
            .and_then(|call| call.body)
    }

    fn push(&self, method: FakeMethod, path: &str, response: Result<ApiEnvelope, ApiError>) {
        if let Ok(mut routes) = self.routes.lock() {
            routes
                .entry((method, path.to_string()))
                .or_default()
                .push_back(response);
        }
    }

    fn answer(
        &self,
        method: FakeMethod,
        path: &str,
        params: Vec<(String, String)>,
        body: Option<Value>,
    ) -> Result<ApiEnvelope, ApiError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                method,
                path: path.to_string(),
                params,
                body,
            });
        }
        let mut routes = self
            .routes
            .lock()
            .map_err(|_| ApiError::Transport("fake backend poisoned".into()))?;
        let queue = routes
            .get_mut(&(method, path.to_string()))
            .ok_or_else(|| ApiError::Http {
                status: 404,
                message: format!("no fake route for {path}"),
            })?;
        let response = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        let response = response.ok_or_else(|| ApiError::Http {
            status: 404,
            message: format!("no fake route for {path}"),
        })?;
        match response {
            Ok(envelope) if envelope.code != 0 => Err(ApiError::Application {
                code: envelope.code,
                message: envelope.message,
            }),
            other => other,
        }
    }
}

#[async_trait]
impl BackendApi for FakeBackend {
    async fn get(&self, path: &str, params: &QueryParams) -> Result<ApiEnvelope, ApiError> {
        self.answer(FakeMethod::Get, path, params.effective(), None)
    }

    async fn post(&self, path: &str, body: Option<Value>) -> Result<ApiEnvelope, ApiError> {
        self.answer(FakeMethod::Post, path, Vec::new(), body)
    }

    async fn put(&self, path: &str, body: Option<Value>) -> Result<ApiEnvelope, ApiError> {
        self.answer(FakeMethod::Put, path, Vec::new(), body)
    }

    async fn del(&self, path: &str) -> Result<ApiEnvelope, ApiError> {
        self.answer(FakeMethod::Delete, path, Vec::new(), None)
    }
}

#[derive(Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }

    pub fn snapshot(&self) -> Option<Session> {
        self.session.lock().ok().and_then(|session| session.clone())
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> anyhow::Result<Option<Session>> {
        Ok(self.snapshot())
    }

    async fn save(&self, session: &Session) -> anyhow::Result<()> {
        if let Ok(mut current) = self.session.lock() {
            *current = Some(session.clone());
        }
        Ok(())
    }

    async fn clear(&self) -> anyhow::Result<()> {
        if let Ok(mut current) = self.session.lock() {
            *current = None;
        }
        Ok(())
    }
}

pub async fn test_state(api: Arc<FakeBackend>) -> AppState {
    let config = RuntimeConfig::default();
    let store = Arc::new(MemorySessionStore::with_session(Session::authenticated(
        "admin", None,
    )));
    let session = Arc::new(SessionContext::new(store, &config));
    let _ = session.initialize().await;
    AppState::new(config, api, session)
}
