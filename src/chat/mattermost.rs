use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};

use crate::chat::types::*;
use crate::chat::ChatTransport;
use crate::config::{AppConfig, MattermostConfig};
use crate::error::{AppError, Result};

pub struct MattermostClient {
    client: Client,
    server_url: String,
    token: String,
}

// --- Request / response types ---

#[derive(Debug, Deserialize)]
struct Entity {
    id: String,
}

#[derive(Debug, Serialize)]
struct CreateChannelRequest<'a> {
    team_id: &'a str,
    name: &'a str,
    display_name: &'a str,
    #[serde(rename = "type")]
    channel_type: &'a str,
}

#[derive(Debug, Serialize)]
struct CreatePostRequest<'a> {
    channel_id: &'a str,
    user_id: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    props: Option<PostProps<'a>>,
}

#[derive(Debug, Serialize)]
struct PostProps<'a> {
    override_username: &'a str,
    override_icon_url: &'a str,
    from_webhook: &'a str,
}

impl MattermostClient {
    pub fn new(config: &MattermostConfig, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            server_url: config.server_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    fn api(&self, path: &str) -> String {
        format!("{}/api/v4{path}", self.server_url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        Ok(request.bearer_auth(&self.token).send().await?)
    }

    async fn expect_entity(response: Response, what: &str) -> Result<Entity> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Chat(format!("{what} returned {status}: {body}")));
        }
        Ok(response.json::<Entity>().await?)
    }

    async fn team_id(&self, team: &str) -> Result<String> {
        let url = self.api(&format!("/teams/name/{}", urlencoding::encode(team)));
        let response = self.send(self.client.get(&url)).await?;
        Ok(Self::expect_entity(response, &format!("Team lookup `{team}`")).await?.id)
    }

    async fn user_id(&self, username: &str) -> Result<String> {
        let url = self.api(&format!("/users/username/{}", urlencoding::encode(username)));
        let response = self.send(self.client.get(&url)).await?;
        Ok(Self::expect_entity(response, &format!("User lookup `{username}`")).await?.id)
    }

    /// Look up a channel by name, creating it as an open channel when it does not exist.
    async fn channel_id(&self, team_id: &str, channel: &str) -> Result<String> {
        let url = self.api(&format!(
            "/teams/{team_id}/channels/name/{}",
            urlencoding::encode(channel)
        ));
        let response = self.send(self.client.get(&url)).await?;

        if response.status() != StatusCode::NOT_FOUND {
            return Ok(Self::expect_entity(response, &format!("Channel lookup `{channel}`"))
                .await?
                .id);
        }

        tracing::info!(channel = channel, "Channel not found, creating it");
        let request = CreateChannelRequest {
            team_id,
            name: channel,
            display_name: channel,
            channel_type: "O",
        };
        let response = self
            .send(self.client.post(self.api("/channels")).json(&request))
            .await?;
        Ok(Self::expect_entity(response, &format!("Channel creation `{channel}`"))
            .await?
            .id)
    }

    /// Resolve the team, bot user and channel the alerts are posted with.
    pub async fn resolve_context(&self, config: &AppConfig) -> Result<ChatContext> {
        let (team, channel) = config.team_channel()?;

        let team_id = self.team_id(team).await?;
        let bot_user_id = self.user_id(&config.mattermost.bot_username).await.map_err(|e| {
            AppError::Config(format!(
                "Unable to find user with configured username {}: {e}",
                config.mattermost.bot_username
            ))
        })?;
        let channel_id = self.channel_id(&team_id, channel).await?;

        Ok(ChatContext {
            team_id,
            channel_id,
            bot_user_id,
        })
    }
}

#[async_trait]
impl ChatTransport for MattermostClient {
    async fn create_post(&self, post: &Post) -> Result<()> {
        let props = post.identity.as_ref().map(|identity| PostProps {
            override_username: &identity.username,
            override_icon_url: &identity.icon_url,
            from_webhook: "true",
        });
        let request = CreatePostRequest {
            channel_id: &post.channel_id,
            user_id: &post.user_id,
            message: &post.message,
            props,
        };

        let response = self
            .send(self.client.post(self.api("/posts")).json(&request))
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Chat(format!("Create post returned {status}: {body}")));
        }
        Ok(())
    }
}
