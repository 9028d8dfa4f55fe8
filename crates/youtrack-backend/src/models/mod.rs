pub mod field;
pub mod project;

pub use field::*;
pub use project::*;
