use authguard_types::{EndpointRef, Parameter, RepoPath};
use std::fmt;
use std::sync::Arc;

/// The owning collection of related endpoints (a controller, a router, a service).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Group {
    /// Display name, not necessarily unique.
    pub name: String,
    /// Fully qualified path; this is the group identity.
    pub path: String,
}

impl Group {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// Identity of one endpoint: group path, member name, ordered parameter list.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EndpointId {
    pub group: String,
    pub member: String,
    pub parameters: Vec<Parameter>,
}

/// One routable operation. Immutable once discovered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    pub group: Group,
    pub member: String,
    pub parameters: Vec<Parameter>,
    /// Where the endpoint was declared, if the enumerator knows.
    pub source: Option<RepoPath>,
}

/// Endpoints are owned by the enumerator and shared with rules and results.
pub type SharedEndpoint = Arc<Endpoint>;

impl Endpoint {
    pub fn new(group: Group, member: impl Into<String>, parameters: Vec<Parameter>) -> Self {
        Self {
            group,
            member: member.into(),
            parameters,
            source: None,
        }
    }

    pub fn with_source(mut self, source: RepoPath) -> Self {
        self.source = Some(source);
        self
    }

    pub fn id(&self) -> EndpointId {
        EndpointId {
            group: self.group.path.clone(),
            member: self.member.clone(),
            parameters: self.parameters.clone(),
        }
    }

    pub fn belongs_to(&self, group_path: &str) -> bool {
        self.group.path == group_path
    }

    pub fn is(&self, group_path: &str, member: &str) -> bool {
        self.belongs_to(group_path) && self.member == member
    }

    pub fn to_ref(&self) -> EndpointRef {
        EndpointRef {
            group: self.group.path.clone(),
            group_name: self.group.name.clone(),
            member: self.member.clone(),
            parameters: self.parameters.clone(),
            source: self.source.clone(),
        }
    }
}

/// `Group.member(type name, ...)`
impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params = self
            .parameters
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{}.{}({})", self.group.name, self.member, params)
    }
}
