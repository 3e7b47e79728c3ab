pub mod fs;
pub mod memory;
pub mod traits;

pub use fs::FsObjectStorage;
pub use memory::InMemoryObjectStorage;
pub use traits::{ObjectStorage, StorageError};
