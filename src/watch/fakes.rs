//! In-memory providers for exercising the engine without a network.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::chat::types::{ChatContext, Post};
use crate::chat::ChatTransport;
use crate::ci::types::{BuildId, BuildRecord, TestResult};
use crate::ci::CiProvider;
use crate::config::{test_config, ConfigHandle};
use crate::error::{AppError, Result};
use crate::scm::types::CommitInfo;
use crate::scm::SourceControl;
use crate::state::AppState;
use crate::store::MemoryMarkerStore;

/// Builds are listed newest first, in the order they were added.
#[derive(Default)]
pub struct FakeCi {
    order: Vec<u64>,
    builds: HashMap<u64, BuildRecord>,
    latest: Option<u64>,
    test_results: HashMap<u64, TestResult>,
    failing_builds: HashSet<u64>,
    fail_list: bool,
    fail_test_result: bool,
    delay: Option<Duration>,
    list_calls: AtomicUsize,
    test_result_calls: AtomicUsize,
}

impl FakeCi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_build(mut self, number: u64, is_good: bool, is_running: bool) -> Self {
        self.order.push(number);
        self.builds.insert(
            number,
            BuildRecord {
                number,
                is_good,
                is_running,
                url: format!("https://ci.example.com/job/nightly/{number}/"),
                test_result: None,
            },
        );
        self
    }

    /// Report `number` as the latest build instead of the newest listed one.
    pub fn with_latest(mut self, number: u64) -> Self {
        self.latest = Some(number);
        self
    }

    pub fn with_test_result(mut self, number: u64, result: TestResult) -> Self {
        self.test_results.insert(number, result);
        self
    }

    pub fn failing_build(mut self, number: u64) -> Self {
        self.failing_builds.insert(number);
        self
    }

    pub fn failing_list(mut self) -> Self {
        self.fail_list = true;
        self
    }

    pub fn failing_test_result(mut self) -> Self {
        self.fail_test_result = true;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn test_result_calls(&self) -> usize {
        self.test_result_calls.load(Ordering::SeqCst)
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn lookup(&self, number: u64) -> Result<BuildRecord> {
        if self.failing_builds.contains(&number) {
            return Err(AppError::Jenkins(format!("build {number} unavailable")));
        }
        self.builds
            .get(&number)
            .cloned()
            .ok_or_else(|| AppError::Jenkins(format!("build {number} not found")))
    }
}

#[async_trait]
impl CiProvider for FakeCi {
    async fn list_build_ids(&self, _job: &str) -> Result<Vec<BuildId>> {
        self.pause().await;
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list {
            return Err(AppError::Jenkins("connection refused".to_string()));
        }
        Ok(self.order.iter().map(|&number| BuildId { number }).collect())
    }

    async fn get_build(&self, _job: &str, number: u64) -> Result<BuildRecord> {
        self.pause().await;
        self.lookup(number)
    }

    async fn get_latest_build(&self, _job: &str) -> Result<BuildRecord> {
        self.pause().await;
        let number = self
            .latest
            .or_else(|| self.order.first().copied())
            .ok_or_else(|| AppError::Jenkins("no builds".to_string()))?;
        self.lookup(number)
    }

    async fn get_test_result(&self, _job: &str, build: &BuildRecord) -> Result<TestResult> {
        self.pause().await;
        self.test_result_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_test_result {
            return Err(AppError::Jenkins("no test report".to_string()));
        }
        self.test_results
            .get(&build.number)
            .cloned()
            .ok_or_else(|| AppError::Jenkins(format!("no test report for {}", build.number)))
    }
}

/// Repositories keyed by `owner/name`; anything else fails to resolve.
#[derive(Default)]
pub struct FakeScm {
    commits: HashMap<String, Vec<CommitInfo>>,
}

impl FakeScm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commits get sha `<repo>-<index>`, newest first.
    pub fn with_commits(mut self, repo: &str, authors: &[&str]) -> Self {
        let commits = authors
            .iter()
            .enumerate()
            .map(|(i, author)| {
                let sha = format!("{repo}-{i}");
                CommitInfo {
                    author_login: author.to_string(),
                    html_url: format!("https://github.com/{repo}/commit/{sha}"),
                    sha,
                }
            })
            .collect();
        self.commits.insert(repo.to_string(), commits);
        self
    }
}

#[async_trait]
impl SourceControl for FakeScm {
    async fn list_commits(&self, owner: &str, repo: &str) -> Result<Vec<CommitInfo>> {
        self.commits
            .get(&format!("{owner}/{repo}"))
            .cloned()
            .ok_or_else(|| AppError::GitHubApi(format!("{owner}/{repo} not found")))
    }
}

#[derive(Default)]
pub struct RecordingChat {
    posts: Mutex<Vec<Post>>,
    fail: bool,
}

impl RecordingChat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            posts: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn posts(&self) -> Vec<Post> {
        self.posts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatTransport for RecordingChat {
    async fn create_post(&self, post: &Post) -> Result<()> {
        if self.fail {
            return Err(AppError::Chat("503 Service Unavailable".to_string()));
        }
        self.posts.lock().unwrap().push(post.clone());
        Ok(())
    }
}

pub fn test_state(
    ci: impl Into<Arc<FakeCi>>,
    scm: FakeScm,
    chat: Arc<RecordingChat>,
) -> AppState {
    let ci: Arc<FakeCi> = ci.into();
    AppState::from_parts(
        Arc::new(ConfigHandle::new(test_config())),
        ChatContext {
            team_id: "team1".to_string(),
            channel_id: "chan1".to_string(),
            bot_user_id: "bot1".to_string(),
        },
        ci,
        Arc::new(scm),
        chat,
        Arc::new(MemoryMarkerStore::new()),
    )
}
