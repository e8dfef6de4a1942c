pub mod manager;
pub mod memory;
pub mod query_builder;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryStore;
pub use store::{Collection, Document, DocumentStore, InsertOneResult};
