pub mod catalog;
pub mod config;
pub mod error;
pub mod event;
pub mod message;


pub use error::AssistantError;
pub type Result<T> = std::result::Result<T, AssistantError>;
