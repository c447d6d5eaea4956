use std::time::Duration;

use crate::ci::types::{BuildRecord, TestResult};
use crate::ci::CiProvider;
use crate::watch::bounded;

/// Render the failing cases of `build` as message lines.
///
/// Returns nothing when the report cannot be fetched or has no failures; the
/// rest of the alert goes out regardless.
pub async fn extract(
    ci: &dyn CiProvider,
    job: &str,
    build: &BuildRecord,
    timeout: Duration,
) -> Vec<String> {
    let result = match &build.test_result {
        Some(result) => result.clone(),
        None => match bounded(timeout, ci.get_test_result(job, build)).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(
                    job = job,
                    build = build.number,
                    error = %e,
                    "Error getting the test results"
                );
                return Vec::new();
            }
        },
    };

    format_lines(build, &result)
}

pub fn format_lines(build: &BuildRecord, result: &TestResult) -> Vec<String> {
    if result.fail_count == 0 {
        return Vec::new();
    }

    let mut lines = vec![
        format!(
            "Will show the test result from the last build [#{}]({})",
            build.number, build.url
        ),
        format!(
            "**FailCount:** `{}` **PassCount:** `{}`",
            result.fail_count, result.pass_count
        ),
    ];

    lines.extend(
        result
            .suites
            .iter()
            .flat_map(|suite| &suite.cases)
            .filter(|case| case.status.is_failure())
            .map(|case| format!("**Test Name:** `{}` **Status:** `{}` ", case.name, case.status)),
    );

    lines
}
