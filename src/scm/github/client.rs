use async_trait::async_trait;
use octocrab::Octocrab;
use serde::Serialize;

use crate::config::GitHubConfig;
use crate::error::{AppError, Result};
use crate::scm::types::*;
use crate::scm::SourceControl;

use super::mapper::{self, GitHubCommit};

/// Only the newest few commits are ever shown, so don't page through history.
const COMMITS_PER_PAGE: u8 = 3;

#[derive(Serialize)]
struct ListCommitsParams {
    per_page: u8,
}

pub struct GitHubSource {
    client: Octocrab,
}

impl GitHubSource {
    pub fn new(config: &GitHubConfig) -> Result<Self> {
        let mut builder = Octocrab::builder().personal_token(config.token.clone());

        if let Some(base) = &config.api_base_url {
            builder = builder
                .base_uri(base.clone())
                .map_err(|e| AppError::Config(format!("Invalid GitHub API URL {base}: {e}")))?;
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl SourceControl for GitHubSource {
    async fn list_commits(&self, owner: &str, repo: &str) -> Result<Vec<CommitInfo>> {
        let url = format!(
            "/repos/{}/{}/commits",
            urlencoding::encode(owner),
            urlencoding::encode(repo)
        );
        let params = ListCommitsParams {
            per_page: COMMITS_PER_PAGE,
        };

        tracing::debug!(owner = owner, repo = repo, "Listing commits");
        let commits: Vec<GitHubCommit> = self.client.get(&url, Some(&params)).await?;

        Ok(commits.into_iter().map(mapper::map_commit).collect())
    }
}
