use std::time::Duration;

use crate::error::Result;
use crate::scm::types::{CommitInfo, RepositoryRef};
use crate::scm::SourceControl;
use crate::watch::bounded;

/// Commits shown per repository.
const COMMITS_PER_REPOSITORY: usize = 3;

/// Rendered commit attribution. `ok == false` means resolution failed and
/// `message` is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitBlame {
    pub message: String,
    pub ok: bool,
}

impl CommitBlame {
    pub fn failed() -> Self {
        Self {
            message: String::new(),
            ok: false,
        }
    }
}

/// Fetch the newest commits of every repository, in configuration order.
///
/// All or nothing: one failing repository discards the whole result.
pub async fn resolve(
    scm: &dyn SourceControl,
    repositories: &[RepositoryRef],
    timeout: Duration,
) -> CommitBlame {
    match render(scm, repositories, timeout).await {
        Ok(message) => CommitBlame { message, ok: true },
        Err(e) => {
            tracing::error!(error = %e, "Error when getting the list of commits");
            CommitBlame::failed()
        }
    }
}

async fn render(
    scm: &dyn SourceControl,
    repositories: &[RepositoryRef],
    timeout: Duration,
) -> Result<String> {
    let mut lines = vec!["**Last 3 Commiters for the following Repositories:**".to_string()];

    for repo in repositories {
        let commits = bounded(timeout, scm.list_commits(&repo.owner, &repo.name)).await?;
        lines.push(format!("**Repository**: `{repo}`"));
        lines.extend(
            commits
                .iter()
                .take(COMMITS_PER_REPOSITORY)
                .map(format_commit),
        );
    }

    Ok(lines.join("\n"))
}

fn format_commit(commit: &CommitInfo) -> String {
    format!(
        "1. @{} - `SHA`:[{}]({})",
        commit.author_login, commit.sha, commit.html_url
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::watch::fakes::FakeScm;

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn repos(raw: &str) -> Vec<RepositoryRef> {
        RepositoryRef::parse_list(raw).unwrap()
    }

    #[tokio::test]
    async fn test_renders_first_three_commits_per_repository() {
        let scm = FakeScm::new()
            .with_commits("acme/server", &["alice", "bob", "carol", "dave"])
            .with_commits("acme/webapp", &["erin"]);

        let blame = resolve(&scm, &repos("acme/server,acme/webapp"), TIMEOUT).await;

        assert!(blame.ok);
        assert_eq!(
            blame.message,
            [
                "**Last 3 Commiters for the following Repositories:**",
                "**Repository**: `acme/server`",
                "1. @alice - `SHA`:[acme/server-0](https://github.com/acme/server/commit/acme/server-0)",
                "1. @bob - `SHA`:[acme/server-1](https://github.com/acme/server/commit/acme/server-1)",
                "1. @carol - `SHA`:[acme/server-2](https://github.com/acme/server/commit/acme/server-2)",
                "**Repository**: `acme/webapp`",
                "1. @erin - `SHA`:[acme/webapp-0](https://github.com/acme/webapp/commit/acme/webapp-0)",
            ]
            .join("\n")
        );
    }

    #[tokio::test]
    async fn test_one_failing_repository_discards_everything() {
        let scm = FakeScm::new().with_commits("acme/server", &["alice"]);

        let blame = resolve(&scm, &repos("acme/server,acme/missing"), TIMEOUT).await;

        assert_eq!(blame, CommitBlame::failed());
    }

    #[tokio::test]
    async fn test_no_repositories_renders_header_only() {
        let blame = resolve(&FakeScm::new(), &[], TIMEOUT).await;
        assert!(blame.ok);
        assert_eq!(
            blame.message,
            "**Last 3 Commiters for the following Repositories:**"
        );
    }
}
