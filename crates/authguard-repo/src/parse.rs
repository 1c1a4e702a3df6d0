use anyhow::Context;
use authguard_domain::inspect::Annotations;
use authguard_domain::model::{Endpoint, Group};
use authguard_types::{Parameter, RepoPath};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default)]
    groups: Vec<GroupDecl>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GroupDecl {
    name: String,
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    public: bool,
    #[serde(default)]
    authenticated: Vec<AuthenticatedDecl>,
    #[serde(default)]
    members: Vec<MemberDecl>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MemberDecl {
    name: String,
    #[serde(default)]
    params: Vec<Parameter>,
    #[serde(default)]
    public: bool,
    #[serde(default)]
    authenticated: Vec<AuthenticatedDecl>,
}

/// One authenticated annotation; `{}` means no policy name.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AuthenticatedDecl {
    #[serde(default)]
    policy: Option<String>,
}

/// A group as declared in one catalog file, with its members in declaration order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedGroup {
    pub group: Group,
    pub annotations: Annotations,
    pub members: Vec<ParsedMember>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedMember {
    pub endpoint: Endpoint,
    pub annotations: Annotations,
}

pub fn parse_catalog(path: &RepoPath, text: &str) -> anyhow::Result<Vec<ParsedGroup>> {
    let file: CatalogFile = toml::from_str(text).context("parse catalog toml")?;

    let mut out = Vec::with_capacity(file.groups.len());
    for decl in file.groups {
        if decl.name.is_empty() {
            anyhow::bail!("group name must not be empty");
        }
        let group_path = decl
            .path
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| decl.name.clone());
        let group = Group::new(decl.name, group_path);

        let members = decl
            .members
            .into_iter()
            .map(|m| {
                if m.name.is_empty() {
                    anyhow::bail!("member name must not be empty in group {}", group.path);
                }
                let endpoint = Endpoint::new(group.clone(), m.name, m.params)
                    .with_source(path.clone());
                Ok(ParsedMember {
                    endpoint,
                    annotations: annotations(m.public, &m.authenticated),
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        out.push(ParsedGroup {
            annotations: annotations(decl.public, &decl.authenticated),
            group,
            members,
        });
    }
    Ok(out)
}

fn annotations(public: bool, authenticated: &[AuthenticatedDecl]) -> Annotations {
    let mut out = authenticated
        .iter()
        .fold(Annotations::none(), |acc, a| acc.with_authenticated(a.policy.as_deref()));
    out.public = public;
    out
}
