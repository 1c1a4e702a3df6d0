use crate::{AccessPolicy, EndpointRef};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Stable schema identifier for authguard reports.
pub const SCHEMA_REPORT_V1: &str = "authguard.report.v1";

/// Run outcome. There is no warn level: an endpoint either exposes its policy or it does not.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReportSummary {
    pub total: u32,
    pub passed: u32,
    pub failed: u32,
}

/// Compliance verdict for one endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EndpointResult {
    pub endpoint: EndpointRef,
    pub expected: AccessPolicy,
    /// Annotations the verdict was decided on (member set, group fallback, or `Public`).
    #[serde(default)]
    pub actual: Vec<AccessPolicy>,
    pub compliant: bool,
    pub check_id: String,
    pub code: String,
    pub message: String,
    /// Stable identifier intended for dedup and trending across runs.
    pub fingerprint: String,
}

/// Authguard-specific summary payload for the report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AuthguardData {
    /// Label of the endpoint scope under test (service or assembly name).
    pub scope: String,
    pub default_policy: AccessPolicy,
    pub group_rules: u32,
    pub member_rules: u32,
    pub endpoints_discovered: u32,
    pub endpoints_excluded: u32,
}

/// The emitted report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AuthguardReport {
    /// Versioned schema identifier.
    pub schema: String,
    pub tool: ToolMeta,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    pub verdict: Verdict,
    pub summary: ReportSummary,
    /// Ordered by message for stable diffs.
    pub results: Vec<EndpointResult>,
    /// Present when the run aborted before producing verdicts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RuntimeError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<AuthguardData>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RuntimeError {
    pub check_id: String,
    pub code: String,
    pub message: String,
}

impl AuthguardReport {
    pub fn failures(&self) -> impl Iterator<Item = &EndpointResult> {
        self.results.iter().filter(|r| !r.compliant)
    }
}
