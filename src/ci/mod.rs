pub mod jenkins;
pub mod types;

use async_trait::async_trait;

use crate::error::Result;
use types::*;

#[async_trait]
pub trait CiProvider: Send + Sync {
    /// List every build of the job, newest first.
    async fn list_build_ids(&self, job: &str) -> Result<Vec<BuildId>>;

    /// Fetch the outcome of one build.
    async fn get_build(&self, job: &str, number: u64) -> Result<BuildRecord>;

    /// Fetch the most recent build of the job.
    async fn get_latest_build(&self, job: &str) -> Result<BuildRecord>;

    /// Fetch the test report attached to a build.
    async fn get_test_result(&self, job: &str, build: &BuildRecord) -> Result<TestResult>;
}
