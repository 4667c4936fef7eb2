use console_domain::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized, please log in")]
    Unauthorized,
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    /// Text for the notice channel: the original message when there is one,
    /// otherwise the operation's fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            AppError::Unauthorized => self.to_string(),
            AppError::Validation(message) => message.clone(),
            AppError::Api(ApiError::Transport(message)) if !message.trim().is_empty() => {
                format!("network error: {}", message.trim())
            }
            AppError::Api(err) => err
                .server_message()
                .map(str::to_string)
                .unwrap_or_else(|| fallback.to_string()),
            AppError::Internal(_) => fallback.to_string(),
        }
    }
}
