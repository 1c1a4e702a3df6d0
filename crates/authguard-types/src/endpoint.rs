use crate::RepoPath;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One formal parameter of an endpoint: name plus declared type name.
///
/// Type names are compared as opaque strings.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(deny_unknown_fields)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.type_name, self.name)
    }
}

/// Endpoint identity as emitted in reports.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EndpointRef {
    /// Fully qualified group path (the group identity).
    pub group: String,
    /// Display name of the group.
    pub group_name: String,
    pub member: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Catalog file the endpoint was declared in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<RepoPath>,
}
