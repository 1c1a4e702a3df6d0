use crate::model::{AuthguardConfigV1, PolicyConfig, PolicyKind, SCHEMA_CONFIG_V1};
use anyhow::Context;
use authguard_domain::discover::Exclusion;
use authguard_domain::model::SharedEndpoint;
use authguard_domain::rules::{RuleSet, RuleSetBuilder};
use authguard_types::{AccessPolicy, Parameter};
use globset::Glob;

const DEFAULT_SCOPE: &str = "workspace";
const DEFAULT_CATALOG_GLOB: &str = "endpoints/**/*.toml";

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub scope: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberRuleSpec {
    pub group: String,
    pub member: String,
    pub params: Option<Vec<Parameter>>,
    pub policy: AccessPolicy,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub scope: String,
    pub catalog: Vec<String>,
    pub exclusions: Vec<Exclusion>,
    /// `None` is kept so that rule-set assembly reports the missing default.
    pub default: Option<AccessPolicy>,
    pub groups: Vec<(String, AccessPolicy)>,
    pub members: Vec<MemberRuleSpec>,
}

impl ResolvedConfig {
    /// Bind the configured rules against the discovered catalog.
    ///
    /// Group rules are added before member rules; order within each kind follows the config.
    pub fn rule_set(&self, catalog: &[SharedEndpoint]) -> anyhow::Result<RuleSet> {
        let mut builder = RuleSetBuilder::new(catalog);
        if let Some(default) = &self.default {
            builder.set_default(default.clone());
        }
        for (group, policy) in &self.groups {
            builder
                .add_group_rule(group, policy.clone())
                .with_context(|| format!("invalid group rule for {group}"))?;
        }
        for rule in &self.members {
            let added = match &rule.params {
                None => builder.add_member_rule(&rule.group, &rule.member, rule.policy.clone()),
                Some(params) => builder.add_member_rule_with_params(
                    &rule.group,
                    &rule.member,
                    params.clone(),
                    rule.policy.clone(),
                ),
            };
            added.with_context(|| {
                format!("invalid member rule for {}.{}", rule.group, rule.member)
            })?;
        }
        Ok(builder.build()?)
    }
}

pub fn resolve_config(
    cfg: AuthguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    if let Some(schema) = cfg.schema.as_deref()
        && schema != SCHEMA_CONFIG_V1
    {
        anyhow::bail!("unsupported config schema: {schema} (expected {SCHEMA_CONFIG_V1})");
    }

    let scope = overrides
        .scope
        .or(cfg.scope)
        .unwrap_or_else(|| DEFAULT_SCOPE.to_string());

    let catalog = if cfg.catalog.is_empty() {
        vec![DEFAULT_CATALOG_GLOB.to_string()]
    } else {
        cfg.catalog
    };
    validate_globs(&catalog)?;

    let exclusions = cfg
        .exclude
        .into_iter()
        .map(|needle| {
            if needle.is_empty() {
                anyhow::bail!("exclude entries must not be empty");
            }
            Ok(Exclusion::GroupPathContains(needle))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let default = cfg
        .default
        .map(|p| to_access_policy(&p).context("invalid default policy"))
        .transpose()?;

    let groups = cfg
        .groups
        .into_iter()
        .map(|rule| {
            let policy = to_access_policy(&rule.policy)
                .with_context(|| format!("invalid policy for group {}", rule.group))?;
            Ok((rule.group, policy))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let members = cfg
        .members
        .into_iter()
        .map(|rule| {
            let policy = to_access_policy(&rule.policy).with_context(|| {
                format!("invalid policy for member {}.{}", rule.group, rule.member)
            })?;
            let params = rule.params.map(|params| {
                params
                    .into_iter()
                    .map(|p| Parameter::new(p.name, p.type_name))
                    .collect()
            });
            Ok(MemberRuleSpec {
                group: rule.group,
                member: rule.member,
                params,
                policy,
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(ResolvedConfig {
        scope,
        catalog,
        exclusions,
        default,
        groups,
        members,
    })
}

fn validate_globs(patterns: &[String]) -> anyhow::Result<()> {
    for pattern in patterns {
        Glob::new(pattern).with_context(|| format!("invalid catalog glob: {pattern}"))?;
    }
    Ok(())
}

fn to_access_policy(cfg: &PolicyConfig) -> anyhow::Result<AccessPolicy> {
    match (cfg.kind, cfg.policy.as_deref()) {
        (PolicyKind::Public, None | Some("")) => Ok(AccessPolicy::Public),
        (PolicyKind::Public, Some(name)) => {
            anyhow::bail!("public policy cannot name an authorization policy (got {name})")
        }
        (PolicyKind::Authenticated, None) => Ok(AccessPolicy::authenticated()),
        (PolicyKind::Authenticated, Some(name)) => Ok(AccessPolicy::authenticated_with(name)),
    }
}
