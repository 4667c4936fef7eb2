// Write-side operations

pub mod merchant_commands;
pub mod sync_commands;
pub mod task_commands;

pub use merchant_commands::*;
pub use sync_commands::*;
pub use task_commands::*;

use crate::{AppError, AppState};

/// Posts the outcome of a command to the notice channel and passes it on.
pub(crate) fn report<T>(
    state: &AppState,
    result: Result<T, AppError>,
    success: impl FnOnce(&T) -> String,
    fallback: &str,
) -> Result<T, AppError> {
    match &result {
        Ok(value) => state.notices.success(success(value)),
        Err(err) => state.notices.error(err.user_message(fallback)),
    }
    result
}
