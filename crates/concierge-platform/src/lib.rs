pub mod analytics;
pub mod catalog;
pub mod llm;
pub mod storage;
pub mod time;
