use crate::compat::CompatibilityIndex;
use crate::error::{EngineError, LoadError};
use crate::model::{
    CompatibilitySubject, License, LicenseKey, Obligation, ObligationRecord, RegistryInput,
};
use licguard_types::Category;
use std::collections::{BTreeMap, BTreeSet};

/// Immutable, validated license data. Shared read-only across concurrent evaluations.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    licenses: BTreeMap<LicenseKey, License>,
    obligations: BTreeMap<String, Obligation>,
    compat: CompatibilityIndex,
}

fn parse_category(raw: &str, owner: impl FnOnce() -> String) -> Result<Category, LoadError> {
    Category::parse(raw).ok_or_else(|| LoadError::UnknownCategory {
        owner: owner(),
        category: raw.to_string(),
    })
}

impl Registry {
    /// Validate the loaded records and build the lookup tables.
    ///
    /// Any integrity fault aborts the whole load; a partially built registry is never returned.
    pub fn build(input: RegistryInput) -> Result<Self, LoadError> {
        let RegistryInput {
            licenses: license_records,
            obligations: obligation_records,
            compatibility,
        } = input;

        let mut obligations = BTreeMap::new();
        for record in obligation_records {
            let obligation = build_obligation(record)?;
            if obligations.contains_key(&obligation.id) {
                return Err(LoadError::DuplicateId {
                    kind: "obligation",
                    id: obligation.id,
                });
            }
            obligations.insert(obligation.id.clone(), obligation);
        }

        let mut licenses = BTreeMap::new();
        for record in license_records {
            let category = parse_category(&record.category, || format!("license '{}'", record.id))?;
            for obligation in &record.obligations {
                if !obligations.contains_key(obligation) {
                    return Err(LoadError::UnknownObligation {
                        license: record.id.clone(),
                        obligation: obligation.clone(),
                    });
                }
            }
            let key = LicenseKey::new(&record.id);
            if licenses.contains_key(&key) {
                return Err(LoadError::DuplicateId {
                    kind: "license",
                    id: record.id,
                });
            }
            licenses.insert(
                key.clone(),
                License {
                    id: record.id.trim().to_string(),
                    key,
                    name: record.name,
                    category,
                    obligations: record.obligations,
                    overrides: record.compatibility,
                },
            );
        }

        let mut compat = CompatibilityIndex::default();
        for record in compatibility {
            match &record.subject {
                CompatibilitySubject::Categories([a, b]) => {
                    let owner = || format!("compatibility entry in context '{}'", record.context);
                    let a = parse_category(a, owner)?;
                    let b = parse_category(b, owner)?;
                    compat.insert_categories(&record.context, [a, b], record.verdict, &record.reason)?;
                }
                CompatibilitySubject::Licenses([a, b]) => {
                    let a = known(&licenses, a, &record.context)?;
                    let b = known(&licenses, b, &record.context)?;
                    compat.insert_pair(&record.context, a, b, record.verdict, &record.reason)?;
                }
            }
        }

        for owner in licenses.values() {
            for (context, overrides) in &owner.overrides {
                for o in overrides {
                    let other = known(&licenses, &o.with, context)?;
                    compat.insert_pair(context, owner, other, o.verdict, &o.reason)?;
                }
            }
        }

        tracing::debug!(
            licenses = licenses.len(),
            obligations = obligations.len(),
            contexts = compat.contexts().count(),
            "registry built"
        );

        Ok(Self {
            licenses,
            obligations,
            compat,
        })
    }

    /// Case-insensitive lookup. Unknown ids are an error, never a default category.
    pub fn lookup(&self, id: &str) -> Result<&License, EngineError> {
        self.licenses
            .get(&LicenseKey::new(id))
            .ok_or_else(|| EngineError::not_found(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.licenses.contains_key(&LicenseKey::new(id))
    }

    pub fn category_of(&self, id: &str) -> Result<Category, EngineError> {
        self.lookup(id).map(|l| l.category)
    }

    /// Resolve ids, drop duplicates, and order by normalized key.
    pub fn resolve_set<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<&License>, EngineError> {
        let mut seen = BTreeSet::new();
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            let license = self.lookup(id.as_ref())?;
            if seen.insert(&license.key) {
                out.push(license);
            }
        }
        out.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(out)
    }

    /// Obligations referenced by the license or selected by their applicability predicate.
    pub fn obligations_of(&self, id: &str) -> Result<Vec<&Obligation>, EngineError> {
        self.lookup(id).map(|license| self.applicable_obligations(license))
    }

    pub(crate) fn applicable_obligations(&self, license: &License) -> Vec<&Obligation> {
        let mut out: Vec<&Obligation> = license
            .obligations
            .iter()
            .filter_map(|id| self.obligations.get(id))
            .collect();
        for obligation in self.obligations.values() {
            if obligation.applies_to(license) && !out.iter().any(|o| o.id == obligation.id) {
                out.push(obligation);
            }
        }
        out
    }

    pub fn contexts(&self) -> impl Iterator<Item = &str> {
        self.compat.contexts()
    }

    /// Whether any compatibility entry is declared for `context`.
    pub fn defines_context(&self, context: &str) -> bool {
        self.compat.defines(context)
    }

    pub fn len(&self) -> usize {
        self.licenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.licenses.is_empty()
    }

    pub(crate) fn compatibility(&self) -> &CompatibilityIndex {
        &self.compat
    }
}

fn known<'a>(
    licenses: &'a BTreeMap<LicenseKey, License>,
    id: &str,
    context: &str,
) -> Result<&'a License, LoadError> {
    licenses
        .get(&LicenseKey::new(id))
        .ok_or_else(|| LoadError::UnknownLicense {
            context: context.to_string(),
            license: id.to_string(),
        })
}

fn build_obligation(record: ObligationRecord) -> Result<Obligation, LoadError> {
    let mut categories = BTreeSet::new();
    for raw in &record.categories {
        categories.insert(parse_category(raw, || {
            format!("obligation '{}'", record.id)
        })?);
    }
    let merge_key = if record.merge_key.trim().is_empty() {
        record.id.clone()
    } else {
        record.merge_key
    };
    Ok(Obligation {
        licenses: record.licenses.iter().map(LicenseKey::new).collect(),
        id: record.id,
        text: record.text,
        merge_key,
        required: record.required,
        priority: record.priority,
        categories,
    })
}
