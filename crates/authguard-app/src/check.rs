//! The `check` use case: resolve rules, validate every endpoint, and produce a report.

use anyhow::Context;
use authguard_domain::{FailureReport, Validator};
use authguard_domain::check::Verdict as EndpointVerdict;
use authguard_domain::discover::discover;
use authguard_settings::{Overrides, ResolvedConfig};
use authguard_types::{
    AuthguardData, AuthguardReport, EndpointResult, SCHEMA_REPORT_V1, ToolMeta, Verdict, ids,
};
use camino::Utf8Path;
use time::OffsetDateTime;

/// Input for the check use case.
#[derive(Clone, Debug)]
pub struct CheckInput<'a> {
    /// Root the catalog globs are relative to.
    pub root: &'a Utf8Path,
    /// Contents of `authguard.toml`.
    pub config_text: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
}

/// Output from the check use case.
#[derive(Clone, Debug)]
pub struct CheckOutput {
    pub report: AuthguardReport,
    pub resolved_config: ResolvedConfig,
    /// Human-readable listing of every verdict.
    pub listing: String,
    /// Numbered list of every violation; present only when the verdict is `Fail`.
    pub failure_report: Option<FailureReport>,
}

/// Run the check use case: parse config, load the catalog, resolve rules, validate.
///
/// Non-compliance is not an error here; it is reported through the verdict.
pub fn run_check(input: CheckInput<'_>) -> anyhow::Result<CheckOutput> {
    let started_at = OffsetDateTime::now_utc();

    let cfg = authguard_settings::parse_config_toml(input.config_text).context("parse config")?;
    let resolved =
        authguard_settings::resolve_config(cfg, input.overrides.clone()).context("resolve config")?;

    let catalog = authguard_repo::build_catalog(input.root, &resolved.scope, &resolved.catalog)
        .context("build endpoint catalog")?;
    let endpoints = discover(&catalog)?;
    let discovered = endpoints.len();

    let rules = resolved.rule_set(&endpoints).context("assemble rules")?;
    let group_rules = rules.group_rules().count();
    let member_rules = rules.member_rules().count();

    let mut validator = Validator::new(resolved.scope.clone(), endpoints, rules, &catalog)?;
    for exclusion in &resolved.exclusions {
        let removed = validator.exclude(exclusion)?;
        tracing::debug!(?exclusion, removed, "applied exclusion");
    }

    let results = validator.results()?;
    let summary = results.summary();
    let endpoint_results: Vec<EndpointResult> = results.all().iter().map(to_result).collect();

    let mut listing = Vec::new();
    validator
        .print_results(&mut listing)
        .context("render results listing")?;
    let listing = String::from_utf8(listing).context("results listing is not utf-8")?;

    let failure_report = match validator.validate() {
        Ok(_) => None,
        Err(authguard_domain::Error::ComplianceFailed(report)) => Some(report),
        Err(err) => return Err(err.into()),
    };
    let verdict = if failure_report.is_none() {
        Verdict::Pass
    } else {
        Verdict::Fail
    };
    tracing::info!(
        scope = %resolved.scope,
        total = summary.total,
        passed = summary.passed,
        failed = summary.failed,
        "authguard check finished"
    );

    let data = AuthguardData {
        scope: resolved.scope.clone(),
        default_policy: validator.default_policy().clone(),
        group_rules: group_rules as u32,
        member_rules: member_rules as u32,
        endpoints_discovered: discovered as u32,
        endpoints_excluded: validator.excluded() as u32,
    };

    let report = AuthguardReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: "authguard".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at,
        finished_at: OffsetDateTime::now_utc(),
        verdict,
        summary,
        results: endpoint_results,
        error: None,
        data: Some(data),
    };

    Ok(CheckOutput {
        report,
        resolved_config: resolved,
        listing,
        failure_report,
    })
}

fn to_result(verdict: &EndpointVerdict) -> EndpointResult {
    EndpointResult {
        endpoint: verdict.endpoint().to_ref(),
        expected: verdict.expected().clone(),
        actual: verdict.actual.clone(),
        compliant: verdict.compliant,
        check_id: ids::CHECK_ENDPOINT_POLICY.to_string(),
        code: verdict.code.to_string(),
        message: verdict.message.clone(),
        fingerprint: verdict.fingerprint.clone(),
    }
}

/// Map verdict to exit code: 0 = pass, 2 = fail.
pub fn verdict_exit_code(verdict: Verdict) -> i32 {
    match verdict {
        Verdict::Pass => 0,
        Verdict::Fail => 2,
    }
}
