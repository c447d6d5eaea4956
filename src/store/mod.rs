pub mod file;
pub mod marker;
pub mod memory;

use async_trait::async_trait;

use crate::error::Result;

pub use file::FileMarkerStore;
pub use memory::MemoryMarkerStore;

/// Durable byte values keyed by name.
#[async_trait]
pub trait MarkerStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;
}
