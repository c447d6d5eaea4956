use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::error::{AppError, Result};
use crate::scm::types::RepositoryRef;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub jenkins: JenkinsConfig,
    pub github: GitHubConfig,
    pub mattermost: MattermostConfig,
    #[serde(default)]
    pub poll: PollConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Deserialize, Clone)]
pub struct JenkinsConfig {
    pub server_url: String,
    pub username: String,
    pub token: String,
    /// Job name; folder jobs are written as `folder/job`.
    pub job: String,
}

// Manual Debug impl to avoid leaking the API token
impl std::fmt::Debug for JenkinsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JenkinsConfig")
            .field("server_url", &self.server_url)
            .field("username", &self.username)
            .field("token", &"[REDACTED]")
            .field("job", &self.job)
            .finish()
    }
}

#[derive(Deserialize, Clone)]
pub struct GitHubConfig {
    pub token: String,
    /// Comma-delimited `owner/name` list.
    pub repositories: String,
    #[serde(default)]
    pub api_base_url: Option<String>,
}

impl std::fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("token", &"[REDACTED]")
            .field("repositories", &self.repositories)
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

#[derive(Deserialize, Clone)]
pub struct MattermostConfig {
    pub server_url: String,
    pub token: String,
    /// `team,channel`
    pub team_channel: String,
    pub bot_username: String,
    #[serde(default = "default_blame_username")]
    pub blame_username: String,
    #[serde(default = "default_blame_icon_url")]
    pub blame_icon_url: String,
}

impl std::fmt::Debug for MattermostConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MattermostConfig")
            .field("server_url", &self.server_url)
            .field("token", &"[REDACTED]")
            .field("team_channel", &self.team_channel)
            .field("bot_username", &self.bot_username)
            .field("blame_username", &self.blame_username)
            .field("blame_icon_url", &self.blame_icon_url)
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PollConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_call_timeout_secs")]
    pub call_timeout_secs: u64,
    #[serde(default = "default_run_on_start")]
    pub run_on_start: bool,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            call_timeout_secs: default_call_timeout_secs(),
            run_on_start: default_run_on_start(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

fn default_blame_username() -> String {
    "Burnning Jenkins".to_string()
}

fn default_blame_icon_url() -> String {
    "https://raw.githubusercontent.com/jenkins-infra/jenkins.io/master/content/images/logos/fire/fire.png"
        .to_string()
}

fn default_interval_secs() -> u64 {
    20 * 60
}

fn default_call_timeout_secs() -> u64 {
    30
}

fn default_run_on_start() -> bool {
    true
}

fn default_store_path() -> PathBuf {
    PathBuf::from("jenkins-blame-state.json")
}

impl AppConfig {
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        } else {
            builder = builder.add_source(config::File::with_name("jenkins-blame").required(false));
        }

        // Environment variable overrides with JENKINS_BLAME_ prefix
        builder = builder.add_source(
            config::Environment::with_prefix("JENKINS_BLAME")
                .separator("__")
                .try_parsing(true),
        );

        let config: AppConfig = builder
            .build()
            .map_err(|e| AppError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| AppError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.repositories()?;
        self.team_channel()?;
        if self.jenkins.job.trim().is_empty() {
            return Err(AppError::Config("jenkins.job must not be empty".to_string()));
        }
        if self.poll.interval_secs == 0 {
            return Err(AppError::Config("poll.interval_secs must be positive".to_string()));
        }
        if self.poll.call_timeout_secs == 0 {
            return Err(AppError::Config(
                "poll.call_timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn repositories(&self) -> Result<Vec<RepositoryRef>> {
        RepositoryRef::parse_list(&self.github.repositories)
    }

    /// Split `mattermost.team_channel` into `(team, channel)`.
    pub fn team_channel(&self) -> Result<(&str, &str)> {
        let raw = self.mattermost.team_channel.as_str();
        match raw.split_once(',') {
            Some((team, channel)) if !team.trim().is_empty() && !channel.trim().is_empty() => {
                Ok((team.trim(), channel.trim()))
            }
            _ => Err(AppError::Config(format!(
                "mattermost.team_channel must be `team,channel`, got: {raw}"
            ))),
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.poll.interval_secs)
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.poll.call_timeout_secs)
    }
}

/// Shared handle to the active configuration.
///
/// Readers get an immutable snapshot; reconfiguration swaps in a whole new one.
/// The watched job is fixed for the life of the process, since the persisted
/// marker is not keyed by job.
pub struct ConfigHandle {
    job: String,
    current: RwLock<Arc<AppConfig>>,
}

impl ConfigHandle {
    pub fn new(config: AppConfig) -> Self {
        Self {
            job: config.jenkins.job.clone(),
            current: RwLock::new(Arc::new(config)),
        }
    }

    pub async fn snapshot(&self) -> Arc<AppConfig> {
        Arc::clone(&*self.current.read().await)
    }

    /// Install a new configuration if it validates and watches the same job.
    /// The previous snapshot stays active on error, and readers holding it are
    /// unaffected either way.
    pub async fn replace(&self, config: AppConfig) -> Result<()> {
        config.validate()?;
        if config.jenkins.job != self.job {
            tracing::warn!(
                current = %self.job,
                requested = %config.jenkins.job,
                "Refusing to switch jenkins.job on reload"
            );
            return Err(AppError::Config(format!(
                "jenkins.job cannot change from '{}' to '{}' without a restart",
                self.job, config.jenkins.job
            )));
        }
        *self.current.write().await = Arc::new(config);
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> AppConfig {
    AppConfig {
        jenkins: JenkinsConfig {
            server_url: "http://jenkins.local".to_string(),
            username: "ci".to_string(),
            token: "secret".to_string(),
            job: "nightly".to_string(),
        },
        github: GitHubConfig {
            token: "gh-token".to_string(),
            repositories: "acme/server,acme/webapp".to_string(),
            api_base_url: None,
        },
        mattermost: MattermostConfig {
            server_url: "http://chat.local".to_string(),
            token: "mm-token".to_string(),
            team_channel: "eng,town-square".to_string(),
            bot_username: "jenkins-bot".to_string(),
            blame_username: default_blame_username(),
            blame_icon_url: default_blame_icon_url(),
        },
        poll: PollConfig::default(),
        store: StoreConfig::default(),
    }
}
