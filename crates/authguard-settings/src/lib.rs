//! Config parsing and rule-set assembly.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod model;
mod resolve;

pub use model::{
    AuthguardConfigV1, GroupRuleConfig, MemberRuleConfig, ParameterConfig, PolicyConfig,
    PolicyKind, SCHEMA_CONFIG_V1,
};
pub use resolve::{MemberRuleSpec, Overrides, ResolvedConfig};

/// Parse `authguard.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<AuthguardConfigV1> {
    let cfg: AuthguardConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the effective config (CLI overrides, defaults, validated globs and policies).
pub fn resolve_config(
    cfg: AuthguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}
