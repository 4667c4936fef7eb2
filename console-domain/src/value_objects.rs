// Domain value objects
pub mod identifiers;
pub mod query_params;
pub mod status;
pub mod task_kind;
pub mod timestamp;

pub use identifiers::*;
pub use query_params::*;
pub use status::*;
pub use task_kind::*;
pub use timestamp::*;
