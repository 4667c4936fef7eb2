use console_application::AppState;
use tracing::debug;

use crate::error::CliError;
use crate::routes::Command;

/// Session gate. Every command except `login` needs an authenticated session.
pub async fn require_session(state: &AppState, command: &Command) -> Result<(), CliError> {
    if command.is_public() {
        return Ok(());
    }
    let session = state.session.require_authenticated().await?;
    debug!(user = ?session.username, command = command.name(), "session accepted");
    Ok(())
}
