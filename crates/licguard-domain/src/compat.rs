//! Compatibility resolution.
//!
//! Lookup order for a pair in a context:
//! 1. identifier-pair override (unordered)
//! 2. category-pair default (unordered)
//! 3. a license with itself: `compatible` (identity)
//! 4. `conditional`, never `compatible`

use crate::error::{EngineError, LoadError};
use crate::model::{License, LicenseKey};
use crate::registry::Registry;
use licguard_types::{ids, Category, CompatibilityReport, Lineage, PairVerdict, Verdict};
use std::collections::{BTreeMap, HashMap};

#[derive(Clone, Debug)]
struct IndexEntry {
    verdict: Verdict,
    reason: String,
    lineage: Lineage,
}

#[derive(Clone, Debug, Default)]
struct ContextIndex {
    categories: HashMap<(Category, Category), IndexEntry>,
    pairs: HashMap<(LicenseKey, LicenseKey), IndexEntry>,
}

/// Two-level index: context -> unordered pair -> entry.
#[derive(Clone, Debug, Default)]
pub struct CompatibilityIndex {
    contexts: BTreeMap<String, ContextIndex>,
}

fn unordered<T: Ord>(a: T, b: T) -> (T, T) {
    if a <= b { (a, b) } else { (b, a) }
}

impl CompatibilityIndex {
    pub(crate) fn insert_categories(
        &mut self,
        context: &str,
        categories: [Category; 2],
        verdict: Verdict,
        reason: &str,
    ) -> Result<(), LoadError> {
        let [a, b] = categories;
        let entry = IndexEntry {
            verdict,
            reason: reason.to_string(),
            lineage: Lineage::CategoryDefault {
                context: context.to_string(),
                categories,
            },
        };
        let slot = self.contexts.entry(context.to_string()).or_default();
        insert_checked(
            &mut slot.categories,
            unordered(a, b),
            entry,
            context,
            || format!("categories ({a}, {b})"),
        )
    }

    pub(crate) fn insert_pair(
        &mut self,
        context: &str,
        a: &License,
        b: &License,
        verdict: Verdict,
        reason: &str,
    ) -> Result<(), LoadError> {
        let entry = IndexEntry {
            verdict,
            reason: reason.to_string(),
            lineage: Lineage::PairOverride {
                context: context.to_string(),
                licenses: [a.id.clone(), b.id.clone()],
            },
        };
        let slot = self.contexts.entry(context.to_string()).or_default();
        insert_checked(
            &mut slot.pairs,
            unordered(a.key.clone(), b.key.clone()),
            entry,
            context,
            || format!("licenses ({}, {})", a.id, b.id),
        )
    }

    pub fn contexts(&self) -> impl Iterator<Item = &str> {
        self.contexts.keys().map(|k| k.as_str())
    }

    pub fn defines(&self, context: &str) -> bool {
        self.contexts.contains_key(context)
    }

    fn lookup(&self, a: &License, b: &License, context: &str) -> Option<&IndexEntry> {
        let slot = self.contexts.get(context)?;
        slot.pairs
            .get(&unordered(a.key.clone(), b.key.clone()))
            .or_else(|| slot.categories.get(&unordered(a.category, b.category)))
    }
}

fn insert_checked<K: std::hash::Hash + Eq>(
    map: &mut HashMap<K, IndexEntry>,
    key: K,
    entry: IndexEntry,
    context: &str,
    subject: impl FnOnce() -> String,
) -> Result<(), LoadError> {
    match map.get(&key) {
        // Identical duplicates are accepted once; the first declaration keeps its lineage.
        Some(existing) if existing.verdict == entry.verdict => Ok(()),
        Some(existing) => Err(LoadError::ConflictingCompatibility {
            context: context.to_string(),
            subject: subject(),
            first: existing.verdict,
            second: entry.verdict,
        }),
        None => {
            map.insert(key, entry);
            Ok(())
        }
    }
}

/// Canonical pair ordering used in results: by lookup key.
fn sorted_ids(a: &License, b: &License) -> [String; 2] {
    if a.key <= b.key {
        [a.id.clone(), b.id.clone()]
    } else {
        [b.id.clone(), a.id.clone()]
    }
}

pub(crate) fn pairwise_resolved(
    index: &CompatibilityIndex,
    a: &License,
    b: &License,
    context: &str,
) -> PairVerdict {
    let licenses = sorted_ids(a, b);

    match index.lookup(a, b, context) {
        Some(entry) => PairVerdict {
            licenses,
            context: context.to_string(),
            verdict: entry.verdict,
            reason: entry.reason.clone(),
            lineage: entry.lineage.clone(),
        },
        // A license with itself falls back to identity only when nothing is declared for it.
        None if a.key == b.key => PairVerdict {
            licenses,
            context: context.to_string(),
            verdict: Verdict::Compatible,
            reason: ids::REASON_SAME_LICENSE.to_string(),
            lineage: Lineage::Identity,
        },
        None => PairVerdict {
            licenses,
            context: context.to_string(),
            verdict: Verdict::Conditional,
            reason: ids::REASON_NO_EXPLICIT_RULE.to_string(),
            lineage: Lineage::NoRule {
                context: context.to_string(),
            },
        },
    }
}

/// Fold pairwise verdicts over every unordered pair of a deduplicated, key-sorted set.
pub(crate) fn transitive_resolved(
    index: &CompatibilityIndex,
    licenses: &[&License],
    context: &str,
) -> CompatibilityReport {
    let mut pairs = Vec::new();
    for (i, a) in licenses.iter().enumerate() {
        for b in &licenses[i + 1..] {
            pairs.push(pairwise_resolved(index, a, b, context));
        }
    }

    let mut overall = Verdict::Compatible;
    let mut deciding: Option<[String; 2]> = None;
    for pair in &pairs {
        if deciding.is_none() || pair.verdict.rank() > overall.rank() {
            overall = overall.fold(pair.verdict);
            deciding = Some(pair.licenses.clone());
        }
    }

    CompatibilityReport {
        context: context.to_string(),
        overall,
        pairs,
        lineage: Lineage::Fold { pair: deciding },
    }
}

/// Pairwise verdict for two license ids in a context.
pub fn pairwise(
    registry: &Registry,
    a: &str,
    b: &str,
    context: &str,
) -> Result<PairVerdict, EngineError> {
    let a = registry.lookup(a)?;
    let b = registry.lookup(b)?;
    Ok(pairwise_resolved(registry.compatibility(), a, b, context))
}

/// Transitive verdict for a set of license ids. Duplicates are ignored.
pub fn transitive<S: AsRef<str>>(
    registry: &Registry,
    ids: &[S],
    context: &str,
) -> Result<CompatibilityReport, EngineError> {
    let licenses = registry.resolve_set(ids)?;
    Ok(transitive_resolved(registry.compatibility(), &licenses, context))
}
