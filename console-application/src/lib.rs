// Console application layer

pub mod commands;
pub mod detail_view;
pub mod error;
pub mod filters;
pub mod forms;
pub mod list_view;
pub mod metrics;
pub mod notices;
pub mod ops;
pub mod queries;
pub mod session;
pub mod state;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use error::AppError;
pub use metrics::Metrics;
pub use notices::{Notice, NoticeBoard, NoticeLevel};
pub use session::SessionContext;
pub use state::AppState;
