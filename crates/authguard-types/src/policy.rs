use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// The access state an endpoint is required to declare.
///
/// The set of kinds is closed. Equality is structural: two `RequireAuthenticated` values are
/// equal iff their policy names are equal, including both being absent.
///
/// Serialized as an internally tagged table, e.g. `{ kind = "public" }` or
/// `{ kind = "authenticated", policy = "Admin" }`. An empty policy name reads as no name.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AccessPolicy {
    /// No authentication required.
    Public,
    /// Authentication required, optionally under a named policy.
    #[serde(rename = "authenticated")]
    RequireAuthenticated {
        #[serde(
            default,
            deserialize_with = "empty_as_none",
            skip_serializing_if = "Option::is_none"
        )]
        #[schemars(with = "Option<String>")]
        policy: Option<String>,
    },
}

impl AccessPolicy {
    /// `RequireAuthenticated` without a policy name.
    pub fn authenticated() -> Self {
        AccessPolicy::RequireAuthenticated { policy: None }
    }

    /// `RequireAuthenticated` under `policy`; an empty name is treated as absent.
    pub fn authenticated_with(policy: impl Into<String>) -> Self {
        AccessPolicy::RequireAuthenticated {
            policy: normalize_policy_name(Some(policy.into())),
        }
    }

    pub fn is_public(&self) -> bool {
        matches!(self, AccessPolicy::Public)
    }

    pub fn policy_name(&self) -> Option<&str> {
        match self {
            AccessPolicy::Public => None,
            AccessPolicy::RequireAuthenticated { policy } => policy.as_deref(),
        }
    }

    /// Short kind label used in report headers.
    pub fn kind_label(&self) -> &'static str {
        match self {
            AccessPolicy::Public => "Public",
            AccessPolicy::RequireAuthenticated { .. } => "RequireAuthenticated",
        }
    }
}

impl fmt::Display for AccessPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessPolicy::Public => f.write_str("[Public]"),
            AccessPolicy::RequireAuthenticated { policy: None } => {
                f.write_str("[RequireAuthenticated]")
            }
            AccessPolicy::RequireAuthenticated {
                policy: Some(policy),
            } => write!(f, "[RequireAuthenticated (policy = {policy})]"),
        }
    }
}

/// Treat `Some("")` as `None`.
pub fn normalize_policy_name(policy: Option<String>) -> Option<String> {
    policy.filter(|p| !p.is_empty())
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(normalize_policy_name(raw))
}
