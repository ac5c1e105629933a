/* src/persist/adapter/mod.rs */

mod file;
mod memory;

pub use file::FilePersistence;
pub use memory::MemoryPersistence;
