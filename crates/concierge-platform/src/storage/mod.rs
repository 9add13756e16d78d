pub mod auto;
pub mod local_storage;
pub mod memory;

pub use auto::open_storage;
pub use local_storage::LocalStorage;
pub use memory::MemoryStorage;
