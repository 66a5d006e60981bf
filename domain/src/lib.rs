pub mod error;
pub mod models;
pub mod providers;
pub mod session;
pub mod template;

pub use error::SupportBotError;
pub use session::{Role, Session, SessionHistory, Turn};
pub use template::PlaceholderMap;
