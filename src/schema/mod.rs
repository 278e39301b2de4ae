pub mod categories;
pub mod scalars;
pub mod target;

pub use categories::*;
pub use scalars::*;
pub use target::*;
