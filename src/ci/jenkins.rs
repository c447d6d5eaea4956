use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::ci::types::*;
use crate::ci::CiProvider;
use crate::config::JenkinsConfig;
use crate::error::{AppError, Result};

const RESULT_SUCCESS: &str = "SUCCESS";

pub struct JenkinsClient {
    client: Client,
    server_url: String,
    username: String,
    token: String,
}

// --- Response types ---

#[derive(Debug, Deserialize)]
struct JobBuilds {
    #[serde(rename = "allBuilds", default)]
    all_builds: Vec<BuildId>,
}

#[derive(Debug, Deserialize)]
struct JenkinsBuild {
    number: u64,
    /// `null` while the build is still running.
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    building: bool,
    #[serde(default)]
    url: String,
}

impl From<JenkinsBuild> for BuildRecord {
    fn from(build: JenkinsBuild) -> Self {
        let is_good = !build.building && build.result.as_deref() == Some(RESULT_SUCCESS);
        BuildRecord {
            number: build.number,
            is_good,
            is_running: build.building,
            url: build.url,
            test_result: None,
        }
    }
}

impl JenkinsClient {
    pub fn new(config: &JenkinsConfig, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            server_url: config.server_url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            token: config.token.clone(),
        })
    }

    /// URL of a job; each `/`-separated folder becomes its own `/job/<name>` segment.
    fn job_url(&self, job: &str) -> String {
        let path: String = job
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| format!("/job/{}", urlencoding::encode(segment)))
            .collect();
        format!("{}{path}", self.server_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .basic_auth(&self.username, Some(&self.token))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Jenkins(format!("GET {url} returned {status}: {body}")));
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl CiProvider for JenkinsClient {
    async fn list_build_ids(&self, job: &str) -> Result<Vec<BuildId>> {
        let url = format!("{}/api/json?tree=allBuilds[number]", self.job_url(job));
        let builds: JobBuilds = self.get_json(&url).await?;
        Ok(builds.all_builds)
    }

    async fn get_build(&self, job: &str, number: u64) -> Result<BuildRecord> {
        let url = format!("{}/{number}/api/json", self.job_url(job));
        let build: JenkinsBuild = self.get_json(&url).await?;
        Ok(build.into())
    }

    async fn get_latest_build(&self, job: &str) -> Result<BuildRecord> {
        let url = format!("{}/lastBuild/api/json", self.job_url(job));
        let build: JenkinsBuild = self.get_json(&url).await?;
        Ok(build.into())
    }

    async fn get_test_result(&self, job: &str, build: &BuildRecord) -> Result<TestResult> {
        let url = format!("{}/{}/testReport/api/json", self.job_url(job), build.number);
        self.get_json(&url).await
    }
}
