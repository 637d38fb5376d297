//! On-disk record formats. TOML and JSON share the same shapes.

use anyhow::Context;
use licguard_domain::model::{
    CompatibilityRecord, CompatibilitySubject, LicenseRecord, ObligationRecord, PairOverride,
};
use licguard_types::Verdict;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `licenses/**/<id>.toml|json`: one license per file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LicenseFile {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// One of: permissive, weak-copyleft, strong-copyleft, proprietary, public-domain, unknown.
    pub category: String,

    /// Obligation ids from `obligations.toml`.
    #[serde(default)]
    pub obligations: Vec<String>,

    /// context -> identifier-pair overrides against other licenses.
    #[serde(default)]
    pub compatibility: BTreeMap<String, Vec<OverrideEntry>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OverrideEntry {
    pub with: String,
    pub verdict: String,
    #[serde(default)]
    pub reason: String,
}

/// `obligations.toml|json`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ObligationsFile {
    #[serde(default)]
    pub obligations: Vec<ObligationEntry>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ObligationEntry {
    pub id: String,
    pub text: String,

    /// Defaults to the obligation id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_key: Option<String>,

    #[serde(default = "default_required")]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,

    /// Categories that trigger this obligation without an explicit reference.
    #[serde(default)]
    pub categories: Vec<String>,

    /// License ids that trigger this obligation without an explicit reference.
    #[serde(default)]
    pub licenses: Vec<String>,
}

fn default_required() -> bool {
    true
}

/// `compatibility.toml|json`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CompatibilityFile {
    #[serde(default)]
    pub rules: Vec<CompatibilityEntry>,
}

/// Exactly one of `categories` or `licenses` must be set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CompatibilityEntry {
    pub context: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<[String; 2]>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub licenses: Option<[String; 2]>,

    pub verdict: String,

    #[serde(default)]
    pub reason: String,
}

pub(crate) fn parse_verdict(v: &str) -> anyhow::Result<Verdict> {
    Verdict::parse(v).with_context(|| {
        format!("unknown verdict: {v} (expected compatible|conditional|incompatible)")
    })
}

impl LicenseFile {
    pub fn into_record(self) -> anyhow::Result<LicenseRecord> {
        let mut compatibility = BTreeMap::new();
        for (context, entries) in self.compatibility {
            let mut overrides = Vec::with_capacity(entries.len());
            for entry in entries {
                overrides.push(PairOverride {
                    verdict: parse_verdict(&entry.verdict)
                        .with_context(|| format!("override against {}", entry.with))?,
                    with: entry.with,
                    reason: entry.reason,
                });
            }
            compatibility.insert(context, overrides);
        }
        Ok(LicenseRecord {
            id: self.id,
            name: self.name,
            category: self.category,
            obligations: self.obligations,
            compatibility,
        })
    }
}

impl ObligationEntry {
    pub fn into_record(self) -> ObligationRecord {
        ObligationRecord {
            merge_key: self.merge_key.unwrap_or_else(|| self.id.clone()),
            id: self.id,
            text: self.text,
            required: self.required,
            priority: self.priority,
            categories: self.categories,
            licenses: self.licenses,
        }
    }
}

impl CompatibilityEntry {
    pub fn into_record(self) -> anyhow::Result<CompatibilityRecord> {
        let subject = match (self.categories, self.licenses) {
            (Some(c), None) => CompatibilitySubject::Categories(c),
            (None, Some(l)) => CompatibilitySubject::Licenses(l),
            _ => anyhow::bail!(
                "compatibility rule in context '{}' needs exactly one of `categories` or `licenses`",
                self.context
            ),
        };
        Ok(CompatibilityRecord {
            verdict: parse_verdict(&self.verdict)?,
            context: self.context,
            subject,
            reason: self.reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn license_file_parses_from_toml() {
        let text = r#"
id = "LGPL-2.1"
name = "GNU Lesser General Public License v2.1"
category = "weak-copyleft"
obligations = ["lgpl-relink"]

[[compatibility.static_linking]]
with = "GPL-3.0"
verdict = "compatible"
reason = "may be relicensed under the GPL"
"#;
        let file: LicenseFile = toml::from_str(text).expect("parses");
        let record = file.into_record().expect("valid");
        assert_eq!(record.id, "LGPL-2.1");
        let overrides = &record.compatibility["static_linking"];
        assert_eq!(overrides.len(), 1);
        assert_eq!(overrides[0].verdict, Verdict::Compatible);
    }

    #[test]
    fn obligation_merge_key_defaults_to_id() {
        let file: ObligationsFile = toml::from_str(
            r#"
[[obligations]]
id = "disclose-source"
text = "Disclose source."
"#,
        )
        .expect("parses");
        let record = file.obligations[0].clone().into_record();
        assert_eq!(record.merge_key, "disclose-source");
        assert!(record.required);
    }

    #[test]
    fn compatibility_entry_needs_exactly_one_subject() {
        let both = CompatibilityEntry {
            context: "static_linking".to_string(),
            categories: Some(["permissive".to_string(), "permissive".to_string()]),
            licenses: Some(["MIT".to_string(), "BSD-3-Clause".to_string()]),
            verdict: "compatible".to_string(),
            reason: String::new(),
        };
        assert!(both.into_record().is_err());

        let bad_verdict = CompatibilityEntry {
            context: "static_linking".to_string(),
            categories: Some(["permissive".to_string(), "permissive".to_string()]),
            licenses: None,
            verdict: "maybe".to_string(),
            reason: String::new(),
        };
        assert!(bad_verdict.into_record().is_err());
    }
}
