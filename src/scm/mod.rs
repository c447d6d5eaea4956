pub mod github;
pub mod types;

use async_trait::async_trait;

use crate::error::Result;
use types::*;

#[async_trait]
pub trait SourceControl: Send + Sync {
    /// List commits on the default branch, newest first.
    async fn list_commits(&self, owner: &str, repo: &str) -> Result<Vec<CommitInfo>>;
}
