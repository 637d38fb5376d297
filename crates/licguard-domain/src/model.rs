use licguard_types::{Category, Verdict};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Case-normalized license identifier used for every lookup.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LicenseKey(String);

impl LicenseKey {
    pub fn new<S: AsRef<str>>(id: S) -> Self {
        Self(id.as_ref().trim().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LicenseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Load interface: records as handed over by the external loader.
// Categories are still strings here; the registry validates them.
// ============================================================================

#[derive(Clone, Debug, Default)]
pub struct RegistryInput {
    pub licenses: Vec<LicenseRecord>,
    pub obligations: Vec<ObligationRecord>,
    pub compatibility: Vec<CompatibilityRecord>,
}

#[derive(Clone, Debug, Default)]
pub struct LicenseRecord {
    pub id: String,
    pub name: Option<String>,
    pub category: String,
    /// Obligation ids this license triggers.
    pub obligations: Vec<String>,
    /// context -> identifier-level overrides against other licenses.
    pub compatibility: BTreeMap<String, Vec<PairOverride>>,
}

/// Identifier-pair override attached to a license record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PairOverride {
    pub with: String,
    pub verdict: Verdict,
    pub reason: String,
}

#[derive(Clone, Debug, Default)]
pub struct ObligationRecord {
    pub id: String,
    pub text: String,
    pub merge_key: String,
    pub required: bool,
    pub priority: Option<i32>,
    /// Categories that trigger the obligation regardless of references.
    pub categories: Vec<String>,
    /// License ids that trigger the obligation regardless of references.
    pub licenses: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompatibilitySubject {
    /// Category-to-category default.
    Categories([String; 2]),
    /// Identifier-pair override.
    Licenses([String; 2]),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompatibilityRecord {
    pub context: String,
    pub subject: CompatibilitySubject,
    pub verdict: Verdict,
    pub reason: String,
}

// ============================================================================
// Loaded, validated model. Immutable once the registry is built.
// ============================================================================

#[derive(Clone, Debug)]
pub struct License {
    /// Display form as loaded (e.g. `Apache-2.0`).
    pub id: String,
    pub key: LicenseKey,
    pub name: Option<String>,
    pub category: Category,
    pub obligations: Vec<String>,
    pub overrides: BTreeMap<String, Vec<PairOverride>>,
}

#[derive(Clone, Debug)]
pub struct Obligation {
    pub id: String,
    pub text: String,
    pub merge_key: String,
    pub required: bool,
    pub priority: Option<i32>,
    pub categories: BTreeSet<Category>,
    pub licenses: BTreeSet<LicenseKey>,
}

impl Obligation {
    /// Whether the applicability predicate selects `license` (references are checked separately).
    pub fn applies_to(&self, license: &License) -> bool {
        self.categories.contains(&license.category) || self.licenses.contains(&license.key)
    }
}
