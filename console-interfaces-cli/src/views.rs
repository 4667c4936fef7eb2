pub mod badges;
pub mod progress;
pub mod screen;
pub mod table;

pub use badges::*;
pub use progress::*;
pub use screen::*;
pub use table::*;
