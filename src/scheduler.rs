use std::sync::Arc;

use tokio::time::{interval, interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::state::AppState;
use crate::watch::{run_cycle, CycleReport};

/// Fire an evaluation cycle on every tick until cancelled.
///
/// Each cycle is awaited before the next tick is taken, and ticks missed while
/// a cycle ran are dropped rather than replayed, so at most one cycle is ever
/// in flight. The interval is read once at start.
pub async fn run_scheduler(state: Arc<AppState>, cancel: CancellationToken) {
    let config = state.config.snapshot().await;
    let period = config.interval();

    let mut ticker = if config.poll.run_on_start {
        interval(period)
    } else {
        interval_at(Instant::now() + period, period)
    };
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    tracing::info!(
        job = %config.jenkins.job,
        interval_secs = period.as_secs(),
        "Scheduler started"
    );

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::warn!("Shutdown requested, abandoning in-flight cycle");
                break;
            }
            report = run_cycle(&state) => log_report(&report),
        }
    }

    tracing::info!("Scheduler stopped");
}

fn log_report(report: &CycleReport) {
    match report {
        CycleReport::Skipped(reason) => tracing::debug!(reason = ?reason, "Cycle skipped"),
        CycleReport::Aborted(error) => tracing::warn!(error = %error, "Cycle aborted, will retry next tick"),
        CycleReport::Clear => tracing::info!("Cycle complete, no blame"),
        CycleReport::Notified => tracing::info!("Cycle complete, blame posted"),
        CycleReport::DeliveryFailed(error) => {
            tracing::warn!(error = %error, "Cycle complete, blame not delivered")
        }
    }
}
