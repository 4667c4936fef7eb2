// Session context and gate

use std::sync::Arc;

use async_trait::async_trait;
use console_domain::{normalize_optional_text, RuntimeConfig, Session, SessionStore, TokenSource};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::AppError;

/// Owns the persisted login state. Nothing is read from the store until
/// `initialize` is called.
pub struct SessionContext {
    store: Arc<dyn SessionStore>,
    current: RwLock<Session>,
    demo_username: String,
    demo_password: String,
}

impl SessionContext {
    pub fn new(store: Arc<dyn SessionStore>, config: &RuntimeConfig) -> Self {
        Self {
            store,
            current: RwLock::new(Session::default()),
            demo_username: config.demo_username.clone(),
            demo_password: config.demo_password.clone(),
        }
    }

    pub async fn initialize(&self) -> Result<Session, AppError> {
        let loaded = self.store.load().await?.unwrap_or_default();
        let mut current = self.current.write().await;
        *current = loaded.clone();
        Ok(loaded)
    }

    /// Demo credential check. `token`, when given, is sent as the bearer
    /// token on later requests.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        token: Option<String>,
    ) -> Result<Session, AppError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AppError::validation("username and password are required"));
        }
        if username != self.demo_username || password != self.demo_password {
            warn!(username, "login rejected");
            return Err(AppError::validation("invalid username or password"));
        }

        let session = Session::authenticated(username, normalize_optional_text(token));
        self.store.save(&session).await?;
        *self.current.write().await = session.clone();
        info!(username, "logged in");
        Ok(session)
    }

    pub async fn logout(&self) -> Result<(), AppError> {
        self.store.clear().await?;
        *self.current.write().await = Session::default();
        info!("logged out");
        Ok(())
    }

    pub async fn current(&self) -> Session {
        self.current.read().await.clone()
    }

    pub async fn require_authenticated(&self) -> Result<Session, AppError> {
        let session = self.current().await;
        if session.is_authenticated {
            Ok(session)
        } else {
            Err(AppError::Unauthorized)
        }
    }
}

#[async_trait]
impl TokenSource for SessionContext {
    async fn token(&self) -> Option<String> {
        self.current.read().await.bearer_token().map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemorySessionStore;

    fn context(store: Arc<MemorySessionStore>) -> SessionContext {
        SessionContext::new(store, &RuntimeConfig::default())
    }

    #[tokio::test]
    async fn gate_rejects_until_login() {
        let store = Arc::new(MemorySessionStore::default());
        let session = context(store.clone());
        session.initialize().await.expect("initialize");

        assert!(matches!(
            session.require_authenticated().await,
            Err(AppError::Unauthorized)
        ));

        session.login("admin", "123456", None).await.expect("login");
        let current = session.require_authenticated().await.expect("authenticated");
        assert_eq!(current.username.as_deref(), Some("admin"));
        assert!(store.snapshot().is_some());
    }

    #[tokio::test]
    async fn wrong_password_is_a_validation_error() {
        let session = context(Arc::new(MemorySessionStore::default()));
        let err = session.login("admin", "nope", None).await.expect_err("rejected");
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn initialize_restores_persisted_session_and_token() {
        let store = Arc::new(MemorySessionStore::with_session(Session::authenticated(
            "admin",
            Some("tok-1".into()),
        )));
        let session = context(store);
        session.initialize().await.expect("initialize");

        assert_eq!(session.token().await.as_deref(), Some("tok-1"));
        session.logout().await.expect("logout");
        assert_eq!(session.token().await, None);
        assert!(session.require_authenticated().await.is_err());
    }
}
