//! User-declared overrides and the builder that binds them to endpoints.

use crate::Error;
use crate::model::SharedEndpoint;
use authguard_types::{AccessPolicy, Parameter};

/// Applies to every endpoint of one group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupRule {
    /// Group path.
    pub group: String,
    pub policy: AccessPolicy,
}

/// Applies to exactly one endpoint, bound when the rule is added.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberRule {
    pub endpoint: SharedEndpoint,
    pub policy: AccessPolicy,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PolicyRule {
    Group(GroupRule),
    Member(MemberRule),
}

impl PolicyRule {
    pub fn policy(&self) -> &AccessPolicy {
        match self {
            PolicyRule::Group(rule) => &rule.policy,
            PolicyRule::Member(rule) => &rule.policy,
        }
    }
}

/// Default policy plus overrides, in the order they were added. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleSet {
    default: AccessPolicy,
    rules: Vec<PolicyRule>,
}

impl RuleSet {
    pub fn default_policy(&self) -> &AccessPolicy {
        &self.default
    }

    pub fn rules(&self) -> &[PolicyRule] {
        &self.rules
    }

    pub fn group_rules(&self) -> impl Iterator<Item = &GroupRule> {
        self.rules.iter().filter_map(|rule| match rule {
            PolicyRule::Group(group) => Some(group),
            PolicyRule::Member(_) => None,
        })
    }

    pub fn member_rules(&self) -> impl Iterator<Item = &MemberRule> {
        self.rules.iter().filter_map(|rule| match rule {
            PolicyRule::Member(member) => Some(member),
            PolicyRule::Group(_) => None,
        })
    }
}

/// Collects the default and the overrides, binding member rules against `catalog`.
///
/// `catalog` is every discovered endpoint in declaration order, before exclusions.
#[derive(Debug)]
pub struct RuleSetBuilder<'a> {
    catalog: &'a [SharedEndpoint],
    default: Option<AccessPolicy>,
    rules: Vec<PolicyRule>,
}

impl<'a> RuleSetBuilder<'a> {
    pub fn new(catalog: &'a [SharedEndpoint]) -> Self {
        Self {
            catalog,
            default: None,
            rules: Vec::new(),
        }
    }

    pub fn set_default(&mut self, policy: AccessPolicy) -> &mut Self {
        self.default = Some(policy);
        self
    }

    pub fn add_group_rule(
        &mut self,
        group: &str,
        policy: AccessPolicy,
    ) -> Result<&mut Self, Error> {
        if !self.catalog.iter().any(|e| e.belongs_to(group)) {
            return Err(Error::UnknownGroup {
                group: group.to_string(),
            });
        }
        self.rules.push(PolicyRule::Group(GroupRule {
            group: group.to_string(),
            policy,
        }));
        Ok(self)
    }

    /// Binds to the first endpoint, in declaration order, with this group and member name.
    pub fn add_member_rule(
        &mut self,
        group: &str,
        member: &str,
        policy: AccessPolicy,
    ) -> Result<&mut Self, Error> {
        let endpoint = self
            .catalog
            .iter()
            .find(|e| e.is(group, member))
            .ok_or_else(|| Error::AmbiguousOrMissingEndpoint {
                group: group.to_string(),
                member: member.to_string(),
                parameters: Vec::new(),
            })?;
        self.rules.push(PolicyRule::Member(MemberRule {
            endpoint: endpoint.clone(),
            policy,
        }));
        Ok(self)
    }

    /// Binds to the single endpoint whose full parameter list equals `parameters`.
    pub fn add_member_rule_with_params(
        &mut self,
        group: &str,
        member: &str,
        parameters: Vec<Parameter>,
        policy: AccessPolicy,
    ) -> Result<&mut Self, Error> {
        let mut matches = self
            .catalog
            .iter()
            .filter(|e| e.is(group, member) && e.parameters == parameters);
        let endpoint = match (matches.next(), matches.next()) {
            (Some(endpoint), None) => endpoint.clone(),
            _ => {
                return Err(Error::AmbiguousOrMissingEndpoint {
                    group: group.to_string(),
                    member: member.to_string(),
                    parameters,
                });
            }
        };
        self.rules
            .push(PolicyRule::Member(MemberRule { endpoint, policy }));
        Ok(self)
    }

    pub fn build(&self) -> Result<RuleSet, Error> {
        let default = self.default.clone().ok_or(Error::MissingDefaultPolicy)?;
        if self.rules.is_empty() {
            return Err(Error::NoRulesConfigured);
        }
        Ok(RuleSet {
            default,
            rules: self.rules.clone(),
        })
    }
}
