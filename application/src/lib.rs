pub mod prompt;
pub mod response_generator;

pub use response_generator::{ResponseGenerator, DEFAULT_TOP_K};
