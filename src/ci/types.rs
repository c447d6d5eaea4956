use std::fmt;

use serde::Deserialize;

/// Identifier of one build in the job's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct BuildId {
    pub number: u64,
}

/// Outcome of one build, as seen at fetch time.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildRecord {
    pub number: u64,
    pub is_good: bool,
    pub is_running: bool,
    pub url: String,
    pub test_result: Option<TestResult>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    #[serde(default)]
    pub fail_count: u64,
    #[serde(default)]
    pub pass_count: u64,
    #[serde(default)]
    pub suites: Vec<TestSuite>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TestSuite {
    #[serde(default)]
    pub cases: Vec<TestCase>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TestCase {
    pub name: String,
    pub status: CaseStatus,
}

/// Status of a test case as reported by Jenkins. Matching is case-sensitive;
/// anything unrecognised is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum CaseStatus {
    Passed,
    Skipped,
    Failed,
    Fixed,
    Regression,
    Fail,
    Other(String),
}

impl CaseStatus {
    /// Whether the case should be listed in a failure report.
    pub fn is_failure(&self) -> bool {
        matches!(self, CaseStatus::Failed | CaseStatus::Regression | CaseStatus::Fail)
    }

    pub fn as_str(&self) -> &str {
        match self {
            CaseStatus::Passed => "PASSED",
            CaseStatus::Skipped => "SKIPPED",
            CaseStatus::Failed => "FAILED",
            CaseStatus::Fixed => "FIXED",
            CaseStatus::Regression => "REGRESSION",
            CaseStatus::Fail => "FAIL",
            CaseStatus::Other(s) => s,
        }
    }
}

impl From<String> for CaseStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "PASSED" => CaseStatus::Passed,
            "SKIPPED" => CaseStatus::Skipped,
            "FAILED" => CaseStatus::Failed,
            "FIXED" => CaseStatus::Fixed,
            "REGRESSION" => CaseStatus::Regression,
            "FAIL" => CaseStatus::Fail,
            _ => CaseStatus::Other(s),
        }
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
