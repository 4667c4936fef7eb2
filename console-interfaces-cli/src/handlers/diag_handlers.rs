use console_application::AppState;

use crate::error::CliError;
use crate::handlers::Emit;
use crate::views::Screen;

pub async fn metrics_prometheus(state: &AppState, emit: Emit<'_>) -> Result<(), CliError> {
    emit(Screen::message(state.metrics.render_prometheus().trim_end()));
    Ok(())
}
