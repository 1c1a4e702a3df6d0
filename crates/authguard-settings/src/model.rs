use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Stable schema identifier for `authguard.toml`.
pub const SCHEMA_CONFIG_V1: &str = "authguard.config.v1";

/// `authguard.toml` schema v1.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct AuthguardConfigV1 {
    /// Optional schema string for tooling (`authguard.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Label of the endpoint scope under test, used in reports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// Globs (relative to the root) selecting endpoint catalog files.
    #[serde(default)]
    pub catalog: Vec<String>,

    /// Group path substrings; matching groups are dropped before resolution.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Policy every endpoint is expected to expose unless overridden.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<PolicyConfig>,

    #[serde(default)]
    pub groups: Vec<GroupRuleConfig>,

    #[serde(default)]
    pub members: Vec<MemberRuleConfig>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    Public,
    Authenticated,
}

/// `{ kind = "public" }` or `{ kind = "authenticated", policy = "Name" }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    pub kind: PolicyKind,
    /// Named authorization policy; only valid with `kind = "authenticated"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<String>,
}

/// Override for every endpoint of one group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct GroupRuleConfig {
    /// Fully qualified group path.
    pub group: String,
    pub policy: PolicyConfig,
}

/// Override for one endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct MemberRuleConfig {
    pub group: String,
    pub member: String,
    /// Full parameter list; selects one overload. Without it the first declared member wins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Vec<ParameterConfig>>,
    pub policy: PolicyConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ParameterConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}
