//! Repository adapters: discover and parse endpoint catalog files.
//!
//! This crate is allowed to do filesystem IO. The resulting [`Catalog`] is the concrete
//! endpoint enumerator and annotation inspector handed to the engine.

#![forbid(unsafe_code)]

mod discover;
mod parse;

use anyhow::Context;
use authguard_domain::discover::EndpointEnumerator;
use authguard_domain::inspect::{AnnotationInspector, AnnotationTable, Annotations};
use authguard_domain::model::{Endpoint, EndpointId, SharedEndpoint};
use authguard_types::RepoPath;
use camino::Utf8Path;
use std::collections::BTreeSet;
use std::sync::Arc;

pub use discover::discover_catalog_files;
pub use parse::{ParsedGroup, ParsedMember, parse_catalog};

/// Every endpoint declared in a set of catalog files, in declaration order.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    scope: String,
    endpoints: Vec<SharedEndpoint>,
    annotations: AnnotationTable,
    groups: BTreeSet<String>,
    files: Vec<RepoPath>,
}

impl Catalog {
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            ..Self::default()
        }
    }

    /// Add the groups of one parsed catalog file.
    ///
    /// A group path may only be declared once, and endpoint identities must be unique.
    pub fn add_file(&mut self, path: RepoPath, groups: Vec<ParsedGroup>) -> anyhow::Result<()> {
        let mut seen_ids: BTreeSet<EndpointId> = self.endpoints.iter().map(|e| e.id()).collect();

        for parsed in groups {
            if !self.groups.insert(parsed.group.path.clone()) {
                anyhow::bail!("group {} is declared more than once", parsed.group.path);
            }
            self.annotations
                .set_group(parsed.group.path.clone(), parsed.annotations);

            for member in parsed.members {
                let id = member.endpoint.id();
                if !seen_ids.insert(id.clone()) {
                    anyhow::bail!("duplicate endpoint {}", member.endpoint);
                }
                self.annotations.set_member(id, member.annotations);
                self.endpoints.push(Arc::new(member.endpoint));
            }
        }
        self.files.push(path);
        Ok(())
    }

    pub fn files(&self) -> &[RepoPath] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

impl EndpointEnumerator for Catalog {
    fn scope(&self) -> &str {
        &self.scope
    }

    fn endpoints(&self) -> Vec<SharedEndpoint> {
        self.endpoints.clone()
    }
}

impl AnnotationInspector for Catalog {
    fn member_annotations(&self, endpoint: &Endpoint) -> Annotations {
        self.annotations.member_annotations(endpoint)
    }

    fn group_annotations(&self, endpoint: &Endpoint) -> Annotations {
        self.annotations.group_annotations(endpoint)
    }
}

/// Discover and parse every catalog file under `root` matching `patterns`.
pub fn build_catalog(
    root: &Utf8Path,
    scope: &str,
    patterns: &[String],
) -> anyhow::Result<Catalog> {
    let files = discover::discover_catalog_files(root, patterns).context("discover catalog files")?;

    let mut catalog = Catalog::new(scope);
    for file in files {
        let abs = root.join(file.as_str());
        let text = std::fs::read_to_string(&abs).with_context(|| format!("read {}", abs))?;
        let groups =
            parse::parse_catalog(&file, &text).with_context(|| format!("parse {}", file.as_str()))?;
        catalog
            .add_file(file.clone(), groups)
            .with_context(|| format!("load {}", file.as_str()))?;
    }
    Ok(catalog)
}
