//! Render use cases: markdown, GitHub annotations, and text listings from reports.

use crate::report::to_renderable;
use authguard_types::AuthguardReport;

pub fn render_markdown(report: &AuthguardReport) -> String {
    authguard_render::render_markdown(&to_renderable(report))
}

pub fn render_annotations(report: &AuthguardReport, max: usize) -> Vec<String> {
    authguard_render::render_github_annotations(&to_renderable(report))
        .into_iter()
        .take(max)
        .collect()
}

pub fn render_text(report: &AuthguardReport) -> String {
    authguard_render::render_text(&to_renderable(report))
}
