use crate::RenderableReport;

/// Render failures as GitHub Actions workflow command annotations.
///
/// Format:
/// `::error file={path}::[{check_id}:{code}] {message}`
pub fn render_github_annotations(report: &RenderableReport) -> Vec<String> {
    let mut out = Vec::new();

    if let Some(err) = &report.error {
        out.push(format!("::error::{}", escape(&format!("authguard error: {err}"))));
        return out;
    }

    for f in report.failures() {
        let message = escape(&format!("[{}:{}] {}", f.check_id, f.code, f.message));
        match &f.path {
            Some(path) => out.push(format!("::error file={}::{}", path, message)),
            None => out.push(format!("::error::{}", message)),
        }
    }

    out
}

fn escape(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
