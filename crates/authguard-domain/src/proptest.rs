//! Property-based tests for rule resolution.
//!
//! Invariants covered:
//! - Endpoints without overrides keep the default
//! - Member rules win over group rules regardless of insertion order
//! - Populating twice never changes the resolved rules
//! - Verdict ordering does not depend on input order

use crate::check::ComplianceChecker;
use crate::inspect::AnnotationTable;
use crate::model::SharedEndpoint;
use crate::resolve::{ResolutionEngine, ResolvedRule};
use crate::results::ValidatedResults;
use crate::rules::RuleSetBuilder;
use crate::test_support::endpoint;
use authguard_types::AccessPolicy;
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn arb_policy() -> impl Strategy<Value = AccessPolicy> {
    prop_oneof![
        Just(AccessPolicy::Public),
        Just(AccessPolicy::authenticated()),
        "[A-Z][a-z]{0,8}".prop_map(AccessPolicy::authenticated_with),
    ]
}

/// Up to four groups with up to four distinct members each.
fn arb_catalog() -> impl Strategy<Value = Vec<SharedEndpoint>> {
    prop::collection::btree_set((0u8..4, 0u8..4), 1..12).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(g, m)| endpoint(&format!("Api.Group{g}"), &format!("Member{m}")))
            .collect()
    })
}

fn resolve(
    catalog: &[SharedEndpoint],
    builder: &RuleSetBuilder<'_>,
) -> ResolutionEngine {
    let rules = builder.build().expect("rules");
    let mut engine = ResolutionEngine::new(catalog.to_vec());
    engine.populate_defaults(rules.default_policy());
    engine.merge(&rules).expect("merge");
    engine
}

proptest! {
    #[test]
    fn untouched_endpoints_keep_default(
        catalog in arb_catalog(),
        default in arb_policy(),
        override_policy in arb_policy(),
    ) {
        let target = catalog[0].clone();
        let mut builder = RuleSetBuilder::new(&catalog);
        builder
            .set_default(default.clone())
            .add_member_rule(&target.group.path, &target.member, override_policy.clone())
            .expect("member rule");
        let engine = resolve(&catalog, &builder);

        prop_assert_eq!(engine.resolved().len(), catalog.len());
        for rule in engine.resolved() {
            if rule.endpoint.id() == target.id() {
                prop_assert_eq!(&rule.expected, &override_policy);
            } else {
                prop_assert_eq!(&rule.expected, &default);
            }
        }
    }

    #[test]
    fn member_rule_beats_group_rule_in_any_order(
        catalog in arb_catalog(),
        group_policy in arb_policy(),
        member_policy in arb_policy(),
        member_first in any::<bool>(),
    ) {
        let target = catalog[catalog.len() - 1].clone();
        let group = target.group.path.clone();
        let mut builder = RuleSetBuilder::new(&catalog);
        builder.set_default(AccessPolicy::authenticated());
        if member_first {
            builder
                .add_member_rule(&group, &target.member, member_policy.clone())
                .expect("member")
                .add_group_rule(&group, group_policy.clone())
                .expect("group");
        } else {
            builder
                .add_group_rule(&group, group_policy.clone())
                .expect("group")
                .add_member_rule(&group, &target.member, member_policy.clone())
                .expect("member");
        }
        let engine = resolve(&catalog, &builder);

        prop_assert_eq!(engine.expected_for(&target.id()), Some(&member_policy));
        for rule in engine.resolved() {
            if rule.endpoint.belongs_to(&group) && rule.endpoint.id() != target.id() {
                prop_assert_eq!(&rule.expected, &group_policy);
            }
        }
    }

    #[test]
    fn populate_is_idempotent(
        catalog in arb_catalog(),
        first in arb_policy(),
        second in arb_policy(),
    ) {
        let mut engine = ResolutionEngine::new(catalog.clone());
        engine.populate_defaults(&first);
        let snapshot = engine.resolved().to_vec();
        engine.populate_defaults(&second);
        prop_assert_eq!(engine.resolved(), snapshot.as_slice());
    }

    #[test]
    fn verdict_order_is_independent_of_input_order(
        catalog in arb_catalog(),
        policy in arb_policy(),
    ) {
        let table = AnnotationTable::new();
        let checker = ComplianceChecker::new(&table);
        let rules: Vec<ResolvedRule> = catalog
            .iter()
            .map(|e| ResolvedRule { endpoint: e.clone(), expected: policy.clone() })
            .collect();

        let forward = ValidatedResults::new(rules.iter().cloned().map(|r| checker.check(r)).collect());
        let backward =
            ValidatedResults::new(rules.iter().rev().cloned().map(|r| checker.check(r)).collect());
        prop_assert_eq!(forward, backward);
    }
}
