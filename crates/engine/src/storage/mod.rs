//! Storage adapters for the progress & save store.

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;
