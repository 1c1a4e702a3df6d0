//! Rendering utilities for CI surfaces (Markdown, GitHub annotations, text listing).

#![forbid(unsafe_code)]

mod gha;
mod markdown;
mod model;
mod text;

pub use gha::render_github_annotations;
pub use markdown::render_markdown;
pub use model::{RenderableReport, RenderableResult, RenderableSummary, RenderableVerdictStatus};
pub use text::render_text;

#[cfg(test)]
mod test_support;
