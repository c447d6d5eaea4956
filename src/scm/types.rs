use std::fmt;

use crate::error::{AppError, Result};

/// A repository named in configuration as `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRef {
    pub owner: String,
    pub name: String,
}

impl RepositoryRef {
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        match raw.split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(Self {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(AppError::Config(format!("Invalid repository: {raw}"))),
        }
    }

    /// Parse a comma-delimited `owner/name,owner2/name2` list, keeping its order.
    pub fn parse_list(raw: &str) -> Result<Vec<Self>> {
        raw.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(Self::parse)
            .collect()
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// One commit from a repository's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    /// Empty when the commit is not linked to an account.
    pub author_login: String,
    pub sha: String,
    pub html_url: String,
}
