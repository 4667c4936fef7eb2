// Creation and edit dialogs

pub mod merchant_form;
pub mod task_form;

pub use merchant_form::*;
pub use task_form::*;
