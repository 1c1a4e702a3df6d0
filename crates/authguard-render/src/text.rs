use crate::{RenderableReport, RenderableVerdictStatus};

/// Plain-text listing of every verdict with the configured defaults as a header.
pub fn render_text(report: &RenderableReport) -> String {
    let mut out = String::new();

    if report.verdict == RenderableVerdictStatus::Error {
        out.push_str(&format!(
            "authguard error: {}\n",
            report.error.as_deref().unwrap_or("unknown error")
        ));
        return out;
    }

    out.push_str(&format!(
        "There are {} endpoints validated; of which {} passed, and {} failed.\n\n",
        report.summary.total, report.summary.passed, report.summary.failed
    ));
    out.push_str(&format!("Scope under test: {}\n", report.scope));
    out.push_str("Configured defaults:\n");
    out.push_str(&format!(" - Default policy: {}\n", report.default_policy));
    out.push_str(&format!(
        " - Default policy name: {}\n\n",
        report.default_policy_name
    ));

    for r in &report.results {
        let status = if r.compliant { "Passed" } else { "Failed" };
        out.push_str(&format!("{} : {}\n", status, r.message));
    }
    out.push_str("- the End - \n");

    out
}
