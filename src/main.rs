use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use jenkins_blame::config::AppConfig;
use jenkins_blame::scheduler::run_scheduler;
use jenkins_blame::shutdown::{reload_on_hangup, wait_for_shutdown};
use jenkins_blame::state::AppState;

#[derive(Parser)]
#[command(
    name = "jenkins-blame",
    about = "Posts an alert to Mattermost when a Jenkins job keeps failing"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    let config = AppConfig::load(cli.config.as_deref())?;

    tracing::info!(
        jenkins = %config.jenkins.server_url,
        job = %config.jenkins.job,
        repositories = %config.github.repositories,
        "Starting jenkins-blame"
    );

    let state = Arc::new(AppState::new(config).await?);
    let cancel = CancellationToken::new();

    tokio::spawn(reload_on_hangup(Arc::clone(&state.config), cli.config.clone()));

    let scheduler = tokio::spawn(run_scheduler(Arc::clone(&state), cancel.clone()));

    wait_for_shutdown().await;
    cancel.cancel();
    scheduler.await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
