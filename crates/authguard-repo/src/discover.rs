use anyhow::Context;
use authguard_types::RepoPath;
use camino::{Utf8Path, Utf8PathBuf};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::PathBuf;
use walkdir::WalkDir;

/// Discover endpoint catalog files under `root` matching any of `patterns`.
///
/// Patterns are root-relative globs. Hidden directories and `target/` are skipped.
/// The result is sorted and deduplicated.
pub fn discover_catalog_files(root: &Utf8Path, patterns: &[String]) -> anyhow::Result<Vec<RepoPath>> {
    let set = build_globset(patterns).context("compile catalog globset")?;

    let mut out: Vec<RepoPath> = Vec::new();
    for abs in WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_skipped_dir(e))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| pathbuf_to_utf8(e.path().to_path_buf()))
    {
        let rel = RepoPath::relative_to(root, &abs);
        if set.is_match(rel.as_str()) {
            out.push(rel);
        }
    }

    // Stable order.
    out.sort();
    out.dedup();

    Ok(out)
}

fn is_skipped_dir(entry: &walkdir::DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || name == "target"
}

fn build_globset(patterns: &[String]) -> anyhow::Result<GlobSet> {
    let mut b = GlobSetBuilder::new();
    for p in patterns {
        b.add(Glob::new(p).with_context(|| format!("invalid glob: {p}"))?);
    }
    Ok(b.build()?)
}

fn pathbuf_to_utf8(path: PathBuf) -> Option<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path).ok()
}
