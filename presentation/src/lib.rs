pub mod cli;
pub mod conversation_view;
