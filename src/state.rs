use std::sync::Arc;

use tokio::sync::Mutex;

use crate::chat::mattermost::MattermostClient;
use crate::chat::types::ChatContext;
use crate::chat::ChatTransport;
use crate::ci::jenkins::JenkinsClient;
use crate::ci::CiProvider;
use crate::config::{AppConfig, ConfigHandle};
use crate::scm::github::GitHubSource;
use crate::scm::SourceControl;
use crate::store::{FileMarkerStore, MarkerStore};

pub struct AppState {
    pub config: Arc<ConfigHandle>,
    pub context: ChatContext,
    pub ci: Arc<dyn CiProvider>,
    pub scm: Arc<dyn SourceControl>,
    pub chat: Arc<dyn ChatTransport>,
    pub store: Arc<dyn MarkerStore>,
    /// Held for the duration of a cycle.
    pub cycle_guard: Mutex<()>,
}

impl AppState {
    /// Build the provider clients and resolve the chat context.
    pub async fn new(config: AppConfig) -> crate::error::Result<Self> {
        let timeout = config.call_timeout();
        let ci = JenkinsClient::new(&config.jenkins, timeout)?;
        let scm = GitHubSource::new(&config.github)?;
        let chat = MattermostClient::new(&config.mattermost, timeout)?;
        let store = FileMarkerStore::new(config.store.path.clone());
        tracing::info!(path = %store.path().display(), "Using marker store");

        let context = chat.resolve_context(&config).await?;
        tracing::info!(
            team_id = %context.team_id,
            channel_id = %context.channel_id,
            bot_user_id = %context.bot_user_id,
            "Resolved chat context"
        );

        Ok(Self::from_parts(
            Arc::new(ConfigHandle::new(config)),
            context,
            Arc::new(ci),
            Arc::new(scm),
            Arc::new(chat),
            Arc::new(store),
        ))
    }

    pub fn from_parts(
        config: Arc<ConfigHandle>,
        context: ChatContext,
        ci: Arc<dyn CiProvider>,
        scm: Arc<dyn SourceControl>,
        chat: Arc<dyn ChatTransport>,
        store: Arc<dyn MarkerStore>,
    ) -> Self {
        Self {
            config,
            context,
            ci,
            scm,
            chat,
            store,
            cycle_guard: Mutex::new(()),
        }
    }
}
