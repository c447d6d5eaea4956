use std::time::Duration;

use crate::ci::types::BuildRecord;
use crate::ci::CiProvider;
use crate::error::{AppError, Result};
use crate::store::marker::{load_marker, save_marker};
use crate::store::MarkerStore;
use crate::watch::aggregate::{BlameDecision, SAMPLE_SIZE};
use crate::watch::bounded;

/// Why a cycle stopped before making a blame decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The latest build is the one already evaluated.
    Unchanged { build: u64 },
    /// The latest build has not finished yet.
    LatestRunning { build: u64 },
    /// The newest build in the history listing has not finished yet.
    NewestRunning { build: u64 },
    /// The history listing is empty.
    NoBuilds,
    /// The newest listed build is not newer than the marker.
    StaleHistory { newest: u64, marker: u64 },
    /// Another cycle is still in flight.
    CycleInFlight,
}

/// What the tracker decided for this cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    Skip(SkipReason),
    /// First-ever evaluation; no enrichment is done on this path.
    Bootstrap(BlameDecision),
    /// A newer finished build was evaluated.
    Evaluate {
        decision: BlameDecision,
        latest: BuildRecord,
    },
}

/// Decides per cycle whether there is anything new to evaluate, and keeps the
/// persisted marker in step.
pub struct BuildStatusTracker<'a> {
    ci: &'a dyn CiProvider,
    store: &'a dyn MarkerStore,
    job: &'a str,
    timeout: Duration,
}

impl<'a> BuildStatusTracker<'a> {
    pub fn new(
        ci: &'a dyn CiProvider,
        store: &'a dyn MarkerStore,
        job: &'a str,
        timeout: Duration,
    ) -> Self {
        Self {
            ci,
            store,
            job,
            timeout,
        }
    }

    pub async fn evaluate(&self) -> Result<CycleOutcome> {
        match load_marker(self.store).await? {
            None => self.bootstrap().await,
            Some(marker) => self.steady_state(marker).await,
        }
    }

    /// No marker yet: persist the newest build number up front, then judge
    /// the most recent builds.
    async fn bootstrap(&self) -> Result<CycleOutcome> {
        let ids = bounded(self.timeout, self.ci.list_build_ids(self.job))
            .await
            .map_err(|e| AppError::BootstrapListFetch(e.to_string()))?;

        if let Some(newest) = ids.first() {
            save_marker(self.store, newest.number).await?;
            tracing::info!(job = self.job, marker = newest.number, "Marker initialised");
        }

        let mut sampled = Vec::with_capacity(SAMPLE_SIZE);
        for id in ids.iter().take(SAMPLE_SIZE) {
            sampled.push(self.fetch_build(id.number).await?);
        }

        Ok(CycleOutcome::Bootstrap(BlameDecision::from_samples(sampled)))
    }

    async fn steady_state(&self, marker: u64) -> Result<CycleOutcome> {
        let latest = bounded(self.timeout, self.ci.get_latest_build(self.job)).await?;
        if latest.number == marker {
            return Ok(CycleOutcome::Skip(SkipReason::Unchanged { build: marker }));
        }
        if latest.is_running {
            return Ok(CycleOutcome::Skip(SkipReason::LatestRunning {
                build: latest.number,
            }));
        }

        let ids = bounded(self.timeout, self.ci.list_build_ids(self.job)).await?;
        let Some(newest_id) = ids.first() else {
            return Ok(CycleOutcome::Skip(SkipReason::NoBuilds));
        };

        let newest = self.fetch_build(newest_id.number).await?;
        if newest.is_running {
            tracing::info!(
                job = self.job,
                build = newest.number,
                "Jenkins job running, will check later"
            );
            return Ok(CycleOutcome::Skip(SkipReason::NewestRunning {
                build: newest.number,
            }));
        }
        if newest.number <= marker {
            tracing::warn!(
                job = self.job,
                newest = newest.number,
                marker = marker,
                "Newest listed build is not newer than the marker"
            );
            return Ok(CycleOutcome::Skip(SkipReason::StaleHistory {
                newest: newest.number,
                marker,
            }));
        }

        let mut sampled = Vec::with_capacity(SAMPLE_SIZE);
        sampled.push(newest.clone());
        for id in ids.iter().skip(1).take(SAMPLE_SIZE - 1) {
            sampled.push(self.fetch_build(id.number).await?);
        }

        // Only advance once every sampled outcome is in hand, so a failed
        // fetch leaves the marker where the next cycle can retry from.
        save_marker(self.store, newest.number).await?;
        tracing::info!(job = self.job, marker = newest.number, previous = marker, "Marker advanced");

        Ok(CycleOutcome::Evaluate {
            decision: BlameDecision::from_samples(sampled),
            latest: newest,
        })
    }

    async fn fetch_build(&self, number: u64) -> Result<BuildRecord> {
        bounded(self.timeout, self.ci.get_build(self.job, number)).await
    }
}
