use crate::ci::types::BuildRecord;

/// How many of the most recent builds feed one blame decision.
pub const SAMPLE_SIZE: usize = 3;

/// Whether to raise an alert for the sampled builds, and the builds it was made from.
#[derive(Debug, Clone, PartialEq)]
pub struct BlameDecision {
    pub blame: bool,
    /// Newest first, at most [`SAMPLE_SIZE`] entries.
    pub sampled_builds: Vec<BuildRecord>,
}

impl BlameDecision {
    pub fn from_samples(sampled_builds: Vec<BuildRecord>) -> Self {
        Self {
            blame: decide(&sampled_builds),
            sampled_builds,
        }
    }
}

/// Blame unless at least one sampled build is good.
///
/// There is no minimum sample size: a job with fewer than three builds is judged
/// on what exists, and an empty history yields `true`.
pub fn decide(sampled_builds: &[BuildRecord]) -> bool {
    !sampled_builds.iter().any(|build| build.is_good)
}
