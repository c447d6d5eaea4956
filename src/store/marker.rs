//! The last-evaluated build number, persisted as a decimal string.

use crate::error::{AppError, Result};
use crate::store::MarkerStore;

pub const MARKER_KEY: &str = "_JenkinsLastBuild";

/// Load the marker; `None` means no build has ever been evaluated.
pub async fn load_marker(store: &dyn MarkerStore) -> Result<Option<u64>> {
    let Some(raw) = store.get(MARKER_KEY).await? else {
        return Ok(None);
    };
    decode(&raw).map(Some)
}

pub async fn save_marker(store: &dyn MarkerStore, build_number: u64) -> Result<()> {
    store.set(MARKER_KEY, &encode(build_number)).await
}

pub fn encode(build_number: u64) -> Vec<u8> {
    build_number.to_string().into_bytes()
}

pub fn decode(raw: &[u8]) -> Result<u64> {
    std::str::from_utf8(raw)
        .ok()
        .and_then(|s| s.trim().parse::<u64>().ok())
        .ok_or_else(|| {
            AppError::Store(format!(
                "Marker value is not a build number: {:?}",
                String::from_utf8_lossy(raw)
            ))
        })
}
