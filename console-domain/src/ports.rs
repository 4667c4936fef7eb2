// Port traits (interfaces)
// Define what the console needs from infrastructure

pub mod repositories;
pub mod services;

pub use repositories::*;
pub use services::*;
