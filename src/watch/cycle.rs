use crate::chat::types::IdentityOverride;
use crate::state::AppState;
use crate::watch::tracker::{BuildStatusTracker, CycleOutcome, SkipReason};
use crate::watch::{bounded, commits, compose, test_report};

/// How one evaluation cycle ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleReport {
    Skipped(SkipReason),
    /// A provider or store call failed; nothing was posted.
    Aborted(String),
    /// Builds were evaluated and at least one sampled build is good.
    Clear,
    Notified,
    DeliveryFailed(String),
}

/// Run one evaluation cycle. Returns `Skipped(CycleInFlight)` without touching
/// any provider if another cycle is still running.
pub async fn run_cycle(state: &AppState) -> CycleReport {
    let Ok(_guard) = state.cycle_guard.try_lock() else {
        tracing::warn!("Previous cycle still running, skipping this one");
        return CycleReport::Skipped(SkipReason::CycleInFlight);
    };

    let config = state.config.snapshot().await;
    let job = config.jenkins.job.as_str();
    let timeout = config.call_timeout();

    let tracker = BuildStatusTracker::new(state.ci.as_ref(), state.store.as_ref(), job, timeout);
    let outcome = match tracker.evaluate().await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!(job = job, error = %e, "Cycle aborted");
            return CycleReport::Aborted(e.to_string());
        }
    };

    let post = match outcome {
        CycleOutcome::Skip(reason) => {
            tracing::debug!(job = job, reason = ?reason, "Nothing new to evaluate");
            return CycleReport::Skipped(reason);
        }
        CycleOutcome::Bootstrap(decision) => {
            if !decision.blame {
                tracing::info!(job = job, "Initial evaluation found a good build");
                return CycleReport::Clear;
            }
            compose::compose_bootstrap(&state.context)
        }
        CycleOutcome::Evaluate { decision, latest } => {
            if !decision.blame {
                tracing::info!(job = job, build = latest.number, "Recent builds include a good one");
                return CycleReport::Clear;
            }

            tracing::info!(
                job = job,
                build = latest.number,
                sampled = decision.sampled_builds.len(),
                "No good build among recent builds, composing blame"
            );

            let test_lines = test_report::extract(state.ci.as_ref(), job, &latest, timeout).await;
            let commit_blame = match config.repositories() {
                Ok(repositories) => {
                    commits::resolve(state.scm.as_ref(), &repositories, timeout).await
                }
                Err(e) => {
                    tracing::error!(error = %e, "Repository list is invalid");
                    commits::CommitBlame::failed()
                }
            };
            let identity = IdentityOverride {
                username: config.mattermost.blame_username.clone(),
                icon_url: config.mattermost.blame_icon_url.clone(),
            };

            compose::compose_blame(&state.context, identity, &test_lines, &commit_blame)
        }
    };

    match bounded(timeout, state.chat.create_post(&post)).await {
        Ok(()) => {
            tracing::info!(job = job, channel = %post.channel_id, "Blame notification posted");
            CycleReport::Notified
        }
        Err(e) => {
            tracing::error!(job = job, error = %e, "Error creating the post");
            CycleReport::DeliveryFailed(e.to_string())
        }
    }
}
