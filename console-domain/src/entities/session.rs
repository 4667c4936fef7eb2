// Session entity

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub is_authenticated: bool,
    #[serde(default)]
    pub username: Option<String>,
    /// Bearer token for the backend. The demo login does not issue one.
    #[serde(default)]
    pub token: Option<String>,
}

impl Session {
    pub fn authenticated(username: impl Into<String>, token: Option<String>) -> Self {
        Self {
            is_authenticated: true,
            username: Some(username.into()),
            token,
        }
    }

    pub fn bearer_token(&self) -> Option<&str> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }
}
