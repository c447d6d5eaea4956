//! Build watching: decide whether there is something new to evaluate, whether
//! to blame, and what to say about it.

pub mod aggregate;
pub mod commits;
pub mod compose;
pub mod cycle;
pub mod test_report;
pub mod tracker;

#[cfg(test)]
pub(crate) mod fakes;

use std::future::Future;
use std::time::Duration;

use crate::error::{AppError, Result};

pub use cycle::{run_cycle, CycleReport};

/// Run a provider call with a deadline. Running out of time counts as a
/// failed call.
pub async fn bounded<T, F>(timeout: Duration, call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::time::timeout(timeout, call)
        .await
        .map_err(|_| AppError::Timeout(timeout))?
}
