pub mod mattermost;
pub mod types;

use async_trait::async_trait;

use crate::error::Result;
use types::*;

#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Deliver a post to its channel.
    async fn create_post(&self, post: &Post) -> Result<()>;
}
