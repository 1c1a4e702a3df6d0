use crate::{RenderableReport, RenderableVerdictStatus};

pub fn render_markdown(report: &RenderableReport) -> String {
    let mut out = String::new();

    out.push_str("# Authguard report\n\n");
    let verdict = match report.verdict {
        RenderableVerdictStatus::Pass => "PASS",
        RenderableVerdictStatus::Fail => "FAIL",
        RenderableVerdictStatus::Error => "ERROR",
    };
    out.push_str(&format!(
        "- Verdict: **{}**\n- Scope: `{}`\n",
        verdict, report.scope
    ));
    out.push_str(&format!(
        "- Endpoints: {} validated, {} passed, {} failed\n",
        report.summary.total, report.summary.passed, report.summary.failed
    ));
    out.push_str(&format!(
        "- Default policy: {} (policy name: {})\n\n",
        report.default_policy, report.default_policy_name
    ));

    if let Some(err) = &report.error {
        out.push_str(&format!("> Error: {}\n", err));
        return out;
    }

    let failures: Vec<_> = report.failures().collect();
    if failures.is_empty() {
        out.push_str("All endpoints expose their required access policy.\n\n");
    } else {
        out.push_str("## Failures\n\n");
        for (index, f) in failures.iter().enumerate() {
            out.push_str(&format!("{}. `{}` / `{}`", index + 1, f.check_id, f.code));
            if let Some(path) = &f.path {
                out.push_str(&format!(" (`{}`)", path));
            }
            out.push_str("\n\n   ```text\n");
            for line in f.message.lines() {
                out.push_str(&format!("   {}\n", line));
            }
            out.push_str("   ```\n\n");
        }
    }

    let passes: Vec<_> = report.passes().collect();
    if !passes.is_empty() {
        out.push_str(&format!(
            "<details>\n<summary>Passed ({})</summary>\n\n",
            passes.len()
        ));
        for p in passes {
            out.push_str(&format!("- {}\n", p.headline()));
        }
        out.push_str("\n</details>\n");
    }

    out
}
