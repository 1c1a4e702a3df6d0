use crate::{RenderableReport, RenderableResult, RenderableSummary, RenderableVerdictStatus};

pub fn failing_report() -> RenderableReport {
    RenderableReport {
        verdict: RenderableVerdictStatus::Fail,
        scope: "WebApi".to_string(),
        default_policy: "RequireAuthenticated".to_string(),
        default_policy_name: "Admin".to_string(),
        summary: RenderableSummary {
            total: 2,
            passed: 1,
            failed: 1,
        },
        results: vec![
            RenderableResult {
                compliant: false,
                check_id: "auth.endpoint_policy".to_string(),
                code: "policy_mismatch".to_string(),
                message: "Accounts.Delete(int id)\n  actual: [RequireAuthenticated (policy = Admin)]\n  required: [RequireAuthenticated (policy = DeletePolicy)]".to_string(),
                path: Some("endpoints/accounts.toml".to_string()),
            },
            RenderableResult {
                compliant: true,
                check_id: "auth.endpoint_policy".to_string(),
                code: "compliant".to_string(),
                message: "Accounts.Get()\n  required: [RequireAuthenticated (policy = Admin)]"
                    .to_string(),
                path: Some("endpoints/accounts.toml".to_string()),
            },
        ],
        error: None,
    }
}

pub fn passing_report() -> RenderableReport {
    let mut report = failing_report();
    report.verdict = RenderableVerdictStatus::Pass;
    report.results.retain(|r| r.compliant);
    report.summary = RenderableSummary {
        total: 1,
        passed: 1,
        failed: 0,
    };
    report
}

pub fn error_report() -> RenderableReport {
    RenderableReport {
        verdict: RenderableVerdictStatus::Error,
        scope: "WebApi".to_string(),
        default_policy: "Public".to_string(),
        default_policy_name: "not set".to_string(),
        summary: RenderableSummary::default(),
        results: Vec::new(),
        error: Some("configuration error: no default policy was set".to_string()),
    }
}
