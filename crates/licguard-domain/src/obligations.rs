//! Obligation aggregation: one checklist entry per merge key.

use crate::error::EngineError;
use crate::model::{License, Obligation};
use crate::registry::Registry;
use licguard_types::{Lineage, ObligationResult};
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};

struct Group<'a> {
    first: &'a Obligation,
    required: bool,
    priority: Option<i32>,
    licenses: Vec<&'a str>,
    obligation_ids: BTreeSet<&'a str>,
}

impl<'a> Group<'a> {
    fn new(first: &'a Obligation) -> Self {
        Self {
            first,
            required: false,
            priority: None,
            licenses: Vec::new(),
            obligation_ids: BTreeSet::new(),
        }
    }

    fn absorb(&mut self, obligation: &'a Obligation, license: &'a License) -> Result<(), EngineError> {
        if obligation.text.trim() != self.first.text.trim() {
            return Err(EngineError::ConflictingObligation {
                merge_key: obligation.merge_key.clone(),
                first_id: self.first.id.clone(),
                first_text: self.first.text.clone(),
                second_id: obligation.id.clone(),
                second_text: obligation.text.clone(),
            });
        }
        self.required |= obligation.required;
        self.priority = match (self.priority, obligation.priority) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        if !self.licenses.contains(&license.id.as_str()) {
            self.licenses.push(&license.id);
        }
        self.obligation_ids.insert(&obligation.id);
        Ok(())
    }

    fn finish(self, merge_key: &str) -> ObligationResult {
        ObligationResult {
            merge_key: merge_key.to_string(),
            text: self.first.text.trim().to_string(),
            required: self.required,
            priority: self.priority,
            licenses: self.licenses.into_iter().map(str::to_string).collect(),
            lineage: Lineage::Obligation {
                obligation_ids: self.obligation_ids.into_iter().map(str::to_string).collect(),
            },
        }
    }
}

/// Merge the obligations of an already resolved, deduplicated, key-sorted license set.
pub(crate) fn aggregate_resolved(
    registry: &Registry,
    licenses: &[&License],
) -> Result<Vec<ObligationResult>, EngineError> {
    let mut groups: BTreeMap<&str, Group<'_>> = BTreeMap::new();
    for &license in licenses {
        for obligation in registry.applicable_obligations(license) {
            groups
                .entry(obligation.merge_key.as_str())
                .or_insert_with(|| Group::new(obligation))
                .absorb(obligation, license)?;
        }
    }

    let mut out: Vec<ObligationResult> = groups
        .into_iter()
        .map(|(key, group)| group.finish(key))
        .collect();
    // Priority descending with unprioritized groups last, then merge key.
    out.sort_by(|a, b| {
        (a.priority.is_none(), Reverse(a.priority), &a.merge_key).cmp(&(
            b.priority.is_none(),
            Reverse(b.priority),
            &b.merge_key,
        ))
    });
    Ok(out)
}

/// Deduplicated obligation checklist for a set of license ids.
pub fn aggregate<S: AsRef<str>>(
    registry: &Registry,
    ids: &[S],
) -> Result<Vec<ObligationResult>, EngineError> {
    let licenses = registry.resolve_set(ids)?;
    aggregate_resolved(registry, &licenses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{obligation, sample_input, sample_registry, INCLUDE_LICENSE_TEXT};
    use crate::model::ObligationRecord;

    fn keys(results: &[ObligationResult]) -> Vec<&str> {
        results.iter().map(|o| o.merge_key.as_str()).collect()
    }

    #[test]
    fn shared_merge_key_yields_one_entry_with_all_contributors() {
        let registry = sample_registry();
        let results = aggregate(&registry, &["MIT", "Apache-2.0", "BSD-3-Clause"]).expect("ok");
        let include: Vec<_> = results
            .iter()
            .filter(|o| o.merge_key == "include_license")
            .collect();
        assert_eq!(include.len(), 1);
        let include = include[0];
        assert_eq!(include.text, INCLUDE_LICENSE_TEXT);
        assert_eq!(include.licenses, vec!["Apache-2.0", "BSD-3-Clause", "MIT"]);
        // bsd-notice is optional but the others are required.
        assert!(include.required);
        assert_eq!(include.priority, Some(10));
        assert_eq!(
            include.lineage,
            Lineage::Obligation {
                obligation_ids: vec![
                    "apache-notice".to_string(),
                    "bsd-notice".to_string(),
                    "mit-notice".to_string(),
                ]
            }
        );
    }

    #[test]
    fn required_is_false_only_when_every_contributor_is_optional() {
        let registry = sample_registry();
        let results = aggregate(&registry, &["BSD-3-Clause"]).expect("ok");
        assert_eq!(keys(&results), vec!["include_license"]);
        assert!(!results[0].required);
    }

    #[test]
    fn ordering_is_priority_descending_then_merge_key() {
        let registry = sample_registry();
        let results = aggregate(&registry, &["GPL-3.0", "MIT", "Apache-2.0"]).expect("ok");
        assert_eq!(
            keys(&results),
            vec![
                "disclose_source",
                "include_license",
                "state_changes",
                "copyleft_notice",
            ]
        );
    }

    #[test]
    fn repeated_ids_do_not_change_the_checklist() {
        let registry = sample_registry();
        let once = aggregate(&registry, &["GPL-3.0", "MIT"]).expect("ok");
        let twice = aggregate(&registry, &["mit", "GPL-3.0", "MIT", "gpl-3.0"]).expect("ok");
        assert_eq!(once, twice);
    }

    #[test]
    fn differing_text_under_one_merge_key_is_an_error() {
        let mut input = sample_input();
        for record in &mut input.obligations {
            if record.id == "apache-notice" {
                *record = ObligationRecord {
                    text: "Ship a copy of the license.".to_string(),
                    ..record.clone()
                };
            }
        }
        let registry = Registry::build(input).expect("valid");
        let err = aggregate(&registry, &["MIT", "Apache-2.0"]).expect_err("conflict");
        assert_eq!(
            err,
            EngineError::ConflictingObligation {
                merge_key: "include_license".to_string(),
                first_id: "apache-notice".to_string(),
                first_text: "Ship a copy of the license.".to_string(),
                second_id: "mit-notice".to_string(),
                second_text: INCLUDE_LICENSE_TEXT.to_string(),
            }
        );
    }

    #[test]
    fn surrounding_whitespace_does_not_conflict() {
        let mut input = sample_input();
        input.obligations.push(obligation(
            "cc0-notice",
            "include_license",
            &format!("  {INCLUDE_LICENSE_TEXT}\n"),
        ));
        input.licenses.retain(|l| l.id != "CC0-1.0");
        input
            .licenses
            .push(crate::test_support::license("CC0-1.0", "public-domain", &["cc0-notice"]));
        let registry = Registry::build(input).expect("valid");
        let results = aggregate(&registry, &["CC0-1.0", "MIT"]).expect("whitespace only");
        assert_eq!(keys(&results), vec!["include_license"]);
        assert_eq!(results[0].text, INCLUDE_LICENSE_TEXT);
    }

    #[test]
    fn unknown_license_fails_the_call() {
        let registry = sample_registry();
        assert_eq!(
            aggregate(&registry, &["MIT", "nope"]).expect_err("unknown").code(),
            "not_found"
        );
    }

    #[test]
    fn empty_set_has_no_obligations() {
        let registry = sample_registry();
        let none: [&str; 0] = [];
        assert!(aggregate(&registry, &none).expect("ok").is_empty());
    }
}
