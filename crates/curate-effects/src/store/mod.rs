//! Object store handlers.

mod filesystem;
mod memory;

pub use filesystem::FilesystemObjectStore;
pub use memory::MemoryObjectStore;
