use console_application::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("not logged in, run `ops-console login` first")]
    Unauthorized,
    #[error("{0}")]
    Invalid(String),
    #[error("{0}")]
    Failed(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Failed(_) => 1,
            CliError::Invalid(_) => 2,
            CliError::Unauthorized => 3,
            CliError::Internal(_) => 70,
        }
    }
}

impl From<AppError> for CliError {
    fn from(value: AppError) -> Self {
        match &value {
            AppError::Unauthorized => CliError::Unauthorized,
            AppError::Api(err) if err.is_unauthorized() => CliError::Unauthorized,
            AppError::Validation(message) => CliError::Invalid(message.clone()),
            AppError::Api(_) => CliError::Failed(value.user_message("request failed")),
            AppError::Internal(err) => CliError::Internal(err.to_string()),
        }
    }
}

impl From<anyhow::Error> for CliError {
    fn from(value: anyhow::Error) -> Self {
        CliError::Internal(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use console_domain::ApiError;

    #[test]
    fn app_errors_map_to_exit_codes() {
        let err = CliError::from(AppError::validation("name is required"));
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.to_string(), "name is required");

        let err = CliError::from(AppError::from(ApiError::Http {
            status: 401,
            message: "expired".into(),
        }));
        assert!(matches!(err, CliError::Unauthorized));

        let err = CliError::from(AppError::from(ApiError::Application {
            code: 7,
            message: "merchant exists".into(),
        }));
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.to_string(), "merchant exists");
    }
}
