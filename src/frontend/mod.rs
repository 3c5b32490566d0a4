pub mod loader;
pub mod parse_error;

pub use loader::{LoadError, Program};
pub use parse_error::ParseError;
