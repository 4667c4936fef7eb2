use console_application::AppState;

use crate::error::CliError;
use crate::handlers::Emit;
use crate::views::Screen;

pub async fn login(
    state: &AppState,
    username: &str,
    password: &str,
    token: Option<String>,
    emit: Emit<'_>,
) -> Result<(), CliError> {
    let session = state.session.login(username, password, token).await?;
    emit(Screen::message(format!(
        "logged in as {}",
        session.username.unwrap_or_default()
    )));
    Ok(())
}

pub async fn logout(state: &AppState, emit: Emit<'_>) -> Result<(), CliError> {
    state.session.logout().await?;
    emit(Screen::message("logged out"));
    Ok(())
}

pub async fn whoami(state: &AppState, emit: Emit<'_>) -> Result<(), CliError> {
    let session = state.session.current().await;
    let screen = Screen::titled("Session")
        .field("user", session.username.unwrap_or_else(|| "-".to_string()))
        .field(
            "token",
            if session.token.is_some() { "present" } else { "none" },
        );
    emit(screen);
    Ok(())
}
