//! Default, group and member passes producing one expected policy per endpoint.

use crate::Error;
use crate::model::{EndpointId, SharedEndpoint};
use crate::rules::RuleSet;
use authguard_types::AccessPolicy;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// The expected policy of one endpoint in the working set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedRule {
    pub endpoint: SharedEndpoint,
    pub expected: AccessPolicy,
}

/// Arena of resolved rules indexed by endpoint identity.
///
/// Overrides update the arena slot in place; rules are never removed or re-appended, so the
/// arena keeps working-set order.
#[derive(Debug)]
pub struct ResolutionEngine {
    working: Vec<SharedEndpoint>,
    arena: Vec<ResolvedRule>,
    index: BTreeMap<EndpointId, usize>,
    populated: bool,
}

impl ResolutionEngine {
    pub fn new(working: Vec<SharedEndpoint>) -> Self {
        Self {
            working,
            arena: Vec::new(),
            index: BTreeMap::new(),
            populated: false,
        }
    }

    /// One resolved rule per working-set endpoint carrying `default`. No-op once populated.
    pub fn populate_defaults(&mut self, default: &AccessPolicy) {
        if self.populated {
            return;
        }
        for endpoint in &self.working {
            if let Entry::Vacant(slot) = self.index.entry(endpoint.id()) {
                slot.insert(self.arena.len());
                self.arena.push(ResolvedRule {
                    endpoint: endpoint.clone(),
                    expected: default.clone(),
                });
            }
        }
        self.populated = true;
        tracing::debug!(
            resolved = self.arena.len(),
            default = %default,
            "populated default rules"
        );
    }

    /// Apply every group rule, then every member rule.
    pub fn merge(&mut self, rules: &RuleSet) -> Result<(), Error> {
        if !self.populated {
            return Err(Error::InvalidOperation(
                "default rules must be populated before merging configured rules",
            ));
        }

        let mut group_overrides = 0usize;
        for rule in rules.group_rules() {
            let mut matched = 0usize;
            for resolved in self
                .arena
                .iter_mut()
                .filter(|r| r.endpoint.belongs_to(&rule.group))
            {
                resolved.expected = rule.policy.clone();
                matched += 1;
            }
            if matched == 0 {
                tracing::warn!(group = %rule.group, "group rule matches no endpoint in the working set");
            }
            group_overrides += matched;
        }

        let mut member_overrides = 0usize;
        for rule in rules.member_rules() {
            match self.index.get(&rule.endpoint.id()) {
                Some(&slot) => {
                    self.arena[slot].expected = rule.policy.clone();
                    member_overrides += 1;
                }
                None => {
                    tracing::debug!(endpoint = %rule.endpoint, "member rule targets an excluded endpoint");
                }
            }
        }

        tracing::debug!(group_overrides, member_overrides, "merged configured rules");
        Ok(())
    }

    pub fn resolved(&self) -> &[ResolvedRule] {
        &self.arena
    }

    pub fn expected_for(&self, id: &EndpointId) -> Option<&AccessPolicy> {
        self.index.get(id).map(|&slot| &self.arena[slot].expected)
    }

    pub fn into_resolved(self) -> Vec<ResolvedRule> {
        self.arena
    }
}
