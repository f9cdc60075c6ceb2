pub mod memory;
pub mod store;
pub mod validation;

pub use memory::MemoryStore;
pub use store::EntityStore;
