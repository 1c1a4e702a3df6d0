use anyhow::Context;
use authguard_domain::error::default_policy_name_display;
use authguard_render::{
    RenderableReport, RenderableResult, RenderableSummary, RenderableVerdictStatus,
};
use authguard_types::{
    AuthguardReport, EndpointResult, ReportSummary, RuntimeError, SCHEMA_REPORT_V1, ToolMeta,
    Verdict, ids,
};
use time::OffsetDateTime;

pub fn parse_report_json(text: &str) -> anyhow::Result<AuthguardReport> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    if schema != SCHEMA_REPORT_V1 {
        anyhow::bail!("unknown report schema: {schema}");
    }

    let report: AuthguardReport =
        serde_json::from_value(value).context("parse authguard report")?;
    Ok(report)
}

pub fn serialize_report(report: &AuthguardReport) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).context("serialize report")
}

/// Report for a run that aborted before producing verdicts.
pub fn runtime_error_report(message: &str) -> AuthguardReport {
    let now = OffsetDateTime::now_utc();
    AuthguardReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: "authguard".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at: now,
        finished_at: now,
        verdict: Verdict::Fail,
        summary: ReportSummary::default(),
        results: Vec::new(),
        error: Some(RuntimeError {
            check_id: ids::CHECK_TOOL_RUNTIME.to_string(),
            code: ids::CODE_RUNTIME_ERROR.to_string(),
            message: message.to_string(),
        }),
        data: None,
    }
}

pub fn to_renderable(report: &AuthguardReport) -> RenderableReport {
    let verdict = match (&report.error, report.verdict) {
        (Some(_), _) => RenderableVerdictStatus::Error,
        (None, Verdict::Pass) => RenderableVerdictStatus::Pass,
        (None, Verdict::Fail) => RenderableVerdictStatus::Fail,
    };

    let (scope, default_policy, default_policy_name) = match &report.data {
        Some(data) => (
            data.scope.clone(),
            data.default_policy.kind_label().to_string(),
            default_policy_name_display(&data.default_policy).to_string(),
        ),
        None => (
            "unknown".to_string(),
            "not set".to_string(),
            "not set".to_string(),
        ),
    };

    RenderableReport {
        verdict,
        scope,
        default_policy,
        default_policy_name,
        summary: RenderableSummary {
            total: report.summary.total,
            passed: report.summary.passed,
            failed: report.summary.failed,
        },
        results: report.results.iter().map(renderable_result).collect(),
        error: report.error.as_ref().map(|e| e.message.clone()),
    }
}

fn renderable_result(result: &EndpointResult) -> RenderableResult {
    RenderableResult {
        compliant: result.compliant,
        check_id: result.check_id.clone(),
        code: result.code.clone(),
        message: result.message.clone(),
        path: result
            .endpoint
            .source
            .as_ref()
            .map(|p| p.as_str().to_string()),
    }
}
