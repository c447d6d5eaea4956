use serde::Deserialize;

use crate::scm::types;

/// The subset of a GitHub commit listing entry we read.
#[derive(Debug, Deserialize)]
pub struct GitHubCommit {
    pub sha: String,
    #[serde(default)]
    pub html_url: String,
    /// `null` when the commit email is not linked to an account.
    #[serde(default)]
    pub author: Option<GitHubUser>,
}

#[derive(Debug, Deserialize)]
pub struct GitHubUser {
    pub login: String,
}

/// Map a GitHub commit payload to our commit type.
pub fn map_commit(commit: GitHubCommit) -> types::CommitInfo {
    types::CommitInfo {
        author_login: commit.author.map(|a| a.login).unwrap_or_default(),
        sha: commit.sha,
        html_url: commit.html_url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_commit_without_linked_author() {
        let raw: GitHubCommit = serde_json::from_value(serde_json::json!({
            "sha": "abc123",
            "html_url": "https://github.com/acme/server/commit/abc123",
            "author": null,
            "commit": { "message": "fix build" }
        }))
        .unwrap();

        let commit = map_commit(raw);
        assert_eq!(commit.author_login, "");
        assert_eq!(commit.sha, "abc123");
    }
}
