// Domain entities
pub mod config;
pub mod envelope;
pub mod merchant;
pub mod order;
pub mod search;
pub mod session;
pub mod shop;
pub mod task;

pub use config::*;
pub use envelope::*;
pub use merchant::*;
pub use order::*;
pub use search::*;
pub use session::*;
pub use shop::*;
pub use task::*;
