pub mod context;
pub mod debounce;
pub mod event_bus;
pub mod ports;
pub mod prompt;
pub mod session;
