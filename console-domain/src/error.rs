use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (connect, timeout, TLS).
    #[error("network error: {0}")]
    Transport(String),
    #[error("{message}")]
    Http { status: u16, message: String },
    /// 2xx response whose envelope carries a non-zero `code`.
    #[error("{message}")]
    Application { code: i64, message: String },
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn server_message(&self) -> Option<&str> {
        let message = match self {
            ApiError::Http { message, .. } | ApiError::Application { message, .. } => message,
            _ => return None,
        };
        let trimmed = message.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Http { status: 401, .. })
    }
}
