//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - Pairwise symmetry and "no silent compatibility"
//! - Fold dominance of the transitive verdict
//! - Obligation idempotence under duplication and reordering
//! - Deterministic rule selection

use crate::compat::{pairwise, transitive};
use crate::engine::{Engine, EvaluationRequest};
use crate::obligations::aggregate;
use crate::policy::{Condition, DefaultDecision, Policy, Rule};
use crate::test_support::sample_registry;
use licguard_types::{Action, Category, Lineage, Verdict};
use proptest::prelude::*;
use std::sync::Arc;

// ============================================================================
// Strategies for generating arbitrary values
// ============================================================================

const SAMPLE_IDS: &[&str] = &[
    "MIT",
    "BSD-3-Clause",
    "Apache-2.0",
    "GPL-2.0",
    "GPL-3.0",
    "LGPL-2.1",
    "CC0-1.0",
];

/// A known license id, in random case.
fn arb_license_id() -> impl Strategy<Value = String> {
    (prop::sample::select(SAMPLE_IDS), any::<bool>()).prop_map(|(id, lower)| {
        if lower {
            id.to_ascii_lowercase()
        } else {
            id.to_string()
        }
    })
}

fn arb_context() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("static_linking".to_string()),
        Just("dynamic_linking".to_string()),
        Just("saas".to_string()),
    ]
}

/// Contexts with compatibility data in the sample registry.
fn arb_defined_context() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("static_linking".to_string()),
        Just("dynamic_linking".to_string()),
    ]
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![Just(Action::Allow), Just(Action::Warn), Just(Action::Deny)]
}

fn arb_category() -> impl Strategy<Value = Category> {
    prop::sample::select(Category::ALL.to_vec())
}

/// Leaf conditions that never fault against the sample registry.
fn arb_leaf_condition() -> impl Strategy<Value = Condition> {
    prop_oneof![
        arb_category().prop_map(Condition::LicenseCategory),
        prop::collection::btree_set(arb_category(), 0..3).prop_map(Condition::OnlyCategories),
        arb_license_id().prop_map(Condition::License),
        arb_defined_context().prop_map(Condition::Context),
        prop_oneof![
            Just(Verdict::Compatible),
            Just(Verdict::Conditional),
            Just(Verdict::Incompatible),
        ]
        .prop_map(Condition::Compatibility),
    ]
}

fn arb_condition() -> impl Strategy<Value = Condition> {
    arb_leaf_condition().prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Condition::All),
            prop::collection::vec(inner.clone(), 0..4).prop_map(Condition::Any),
            inner.prop_map(Condition::not),
        ]
    })
}

fn arb_policy(name: &'static str) -> impl Strategy<Value = Arc<Policy>> {
    prop::collection::vec((-3i32..3, arb_action(), arb_condition()), 0..5).prop_map(move |rules| {
        let rules = rules
            .into_iter()
            .enumerate()
            .map(|(i, (priority, action, condition))| {
                Rule::new(&format!("{name}-{i}"), action, condition).with_priority(priority)
            })
            .collect();
        Arc::new(Policy::new(name, "1", rules).expect("generated ids are unique"))
    })
}

// ============================================================================
// Compatibility
// ============================================================================

proptest! {
    #[test]
    fn pairwise_is_symmetric(a in arb_license_id(), b in arb_license_id(), ctx in arb_context()) {
        let registry = sample_registry();
        let ab = pairwise(&registry, &a, &b, &ctx).expect("known ids");
        let ba = pairwise(&registry, &b, &a, &ctx).expect("known ids");
        prop_assert_eq!(ab, ba);
    }

    #[test]
    fn compatible_always_has_an_explicit_source(
        a in arb_license_id(),
        b in arb_license_id(),
        ctx in arb_context(),
    ) {
        let registry = sample_registry();
        let v = pairwise(&registry, &a, &b, &ctx).expect("known ids");
        if matches!(v.lineage, Lineage::NoRule { .. }) {
            prop_assert_eq!(v.verdict, Verdict::Conditional);
        }
        if v.verdict == Verdict::Compatible {
            let same = a.eq_ignore_ascii_case(&b);
            prop_assert!(
                matches!(v.lineage, Lineage::PairOverride { .. } | Lineage::CategoryDefault { .. })
                    || (same && v.lineage == Lineage::Identity),
                "compatible without a declared source: {:?}",
                v
            );
        }
    }

    #[test]
    fn same_license_follows_its_category_default(
        id in arb_license_id(),
        ctx in arb_defined_context(),
    ) {
        let registry = sample_registry();
        let v = pairwise(&registry, &id, &id, &ctx).expect("known id");
        let category = registry.category_of(&id).expect("known id");
        let declared = [
            (Category::Permissive, "static_linking"),
            (Category::StrongCopyleft, "static_linking"),
            (Category::Permissive, "dynamic_linking"),
        ];
        if declared.contains(&(category, ctx.as_str())) {
            prop_assert!(matches!(v.lineage, Lineage::CategoryDefault { .. }), "{:?}", v);
        } else {
            prop_assert_eq!(v.verdict, Verdict::Compatible);
            prop_assert_eq!(v.lineage, Lineage::Identity);
        }
    }

    #[test]
    fn overall_is_the_least_compatible_pair(
        ids in prop::collection::vec(arb_license_id(), 0..6),
        ctx in arb_context(),
    ) {
        let registry = sample_registry();
        let report = transitive(&registry, &ids, &ctx).expect("known ids");
        let worst = report
            .pairs
            .iter()
            .map(|p| p.verdict)
            .fold(Verdict::Compatible, Verdict::fold);
        prop_assert_eq!(report.overall, worst);

        if let Lineage::Fold { pair: Some(pair) } = &report.lineage {
            let first = report.pairs.iter().find(|p| p.verdict == report.overall);
            prop_assert_eq!(first.map(|p| &p.licenses), Some(pair));
        } else {
            prop_assert!(report.pairs.is_empty());
        }
    }
}

// ============================================================================
// Obligations
// ============================================================================

proptest! {
    #[test]
    fn obligations_ignore_duplicates_and_order(
        ids in prop::collection::vec(arb_license_id(), 0..6),
        seed in any::<u64>(),
    ) {
        let registry = sample_registry();
        let base = aggregate(&registry, &ids).expect("known ids");

        let mut doubled = ids.clone();
        doubled.extend(ids.iter().cloned());
        let len = doubled.len().max(1);
        doubled.rotate_left((seed as usize) % len);

        prop_assert_eq!(aggregate(&registry, &doubled).expect("known ids"), base.clone());

        let mut keys: Vec<&str> = base.iter().map(|o| o.merge_key.as_str()).collect();
        let before = keys.len();
        keys.dedup();
        prop_assert_eq!(keys.len(), before);
    }
}

// ============================================================================
// Rule selection
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn selection_is_deterministic_and_respects_ordering(
        ids in prop::collection::vec(arb_license_id(), 1..4),
        ctx in arb_context(),
        first in arb_policy("first"),
        second in arb_policy("second"),
        deny_by_default in any::<bool>(),
    ) {
        let engine = Engine::new(Arc::new(sample_registry()));
        let default = if deny_by_default { DefaultDecision::Deny } else { DefaultDecision::Allow };
        let request = EvaluationRequest::new(ids.clone(), &ctx)
            .with_policies([first.clone(), second.clone()])
            .with_default_decision(default);

        let a = engine.evaluate(&request).expect("conditions never fault");
        let b = engine.evaluate(&request).expect("conditions never fault");
        prop_assert_eq!(&a, &b);

        // No matching rule may outrank the winner.
        if let Lineage::PolicyRule { priority, .. } = a.decision.lineage {
            for policy in [&first, &second] {
                for rule in &policy.rules {
                    let higher = rule.priority > priority
                        || (rule.priority == priority && rule.action.rank() > a.decision.action.rank());
                    if higher {
                        let registry = engine.registry();
                        let set = registry.resolve_set(&ids).expect("known ids");
                        let attrs = Default::default();
                        let facts = crate::matcher::Facts {
                            licenses: &set,
                            context: &ctx,
                            distribution: None,
                            attributes: &attrs,
                            compatibility: a.compatibility.overall,
                        };
                        let matched = crate::matcher::matches(registry, policy, rule, &facts)
                            .expect("conditions never fault");
                        prop_assert!(!matched, "rule {} outranks winner {}", rule.id, a.decision.rule_id);
                    }
                }
            }
        } else {
            prop_assert_eq!(a.decision.action, default.action());
        }
    }
}
