//! Shared fixtures for unit tests: a small, realistic registry.

use crate::model::{
    CompatibilityRecord, CompatibilitySubject, LicenseRecord, ObligationRecord, PairOverride,
    RegistryInput,
};
use crate::policy::{Condition, Policy, Rule};
use crate::registry::Registry;
use licguard_types::{Action, Category, Verdict};
use std::collections::BTreeMap;
use std::sync::Arc;

pub const INCLUDE_LICENSE_TEXT: &str = "Include the full license text and copyright notice.";

pub fn license(id: &str, category: &str, obligations: &[&str]) -> LicenseRecord {
    LicenseRecord {
        id: id.to_string(),
        name: None,
        category: category.to_string(),
        obligations: obligations.iter().map(|s| s.to_string()).collect(),
        compatibility: BTreeMap::new(),
    }
}

pub fn obligation(id: &str, merge_key: &str, text: &str) -> ObligationRecord {
    ObligationRecord {
        id: id.to_string(),
        text: text.to_string(),
        merge_key: merge_key.to_string(),
        required: true,
        ..ObligationRecord::default()
    }
}

pub fn categories(context: &str, a: &str, b: &str, verdict: Verdict, reason: &str) -> CompatibilityRecord {
    CompatibilityRecord {
        context: context.to_string(),
        subject: CompatibilitySubject::Categories([a.to_string(), b.to_string()]),
        verdict,
        reason: reason.to_string(),
    }
}

pub fn pair(context: &str, a: &str, b: &str, verdict: Verdict, reason: &str) -> CompatibilityRecord {
    CompatibilityRecord {
        context: context.to_string(),
        subject: CompatibilitySubject::Licenses([a.to_string(), b.to_string()]),
        verdict,
        reason: reason.to_string(),
    }
}

pub fn sample_input() -> RegistryInput {
    let mut lgpl = license("LGPL-2.1", "weak-copyleft", &["lgpl-relink"]);
    lgpl.name = Some("GNU Lesser General Public License v2.1".to_string());
    lgpl.compatibility.insert(
        "static_linking".to_string(),
        vec![PairOverride {
            with: "GPL-3.0".to_string(),
            verdict: Verdict::Compatible,
            reason: "LGPL-2.1 code may be relicensed under the GPL".to_string(),
        }],
    );

    let bsd_notice = ObligationRecord {
        required: false,
        ..obligation("bsd-notice", "include_license", INCLUDE_LICENSE_TEXT)
    };
    let mit_notice = ObligationRecord {
        priority: Some(10),
        ..obligation("mit-notice", "include_license", INCLUDE_LICENSE_TEXT)
    };
    let apache_notice = obligation("apache-notice", "include_license", INCLUDE_LICENSE_TEXT);
    let state_changes = ObligationRecord {
        priority: Some(5),
        ..obligation(
            "apache-state-changes",
            "state_changes",
            "State significant changes made to the files.",
        )
    };
    let disclose = ObligationRecord {
        priority: Some(20),
        ..obligation(
            "disclose-source",
            "disclose_source",
            "Make the complete corresponding source code available.",
        )
    };
    let copyleft_notice = ObligationRecord {
        categories: vec!["strong-copyleft".to_string()],
        ..obligation(
            "copyleft-notice",
            "copyleft_notice",
            "Keep copyleft notices intact.",
        )
    };
    let relink = obligation(
        "lgpl-relink",
        "allow_relinking",
        "Allow users to relink against a modified version of the library.",
    );

    RegistryInput {
        licenses: vec![
            license("MIT", "permissive", &["mit-notice"]),
            license("BSD-3-Clause", "permissive", &["bsd-notice"]),
            license(
                "Apache-2.0",
                "permissive",
                &["apache-notice", "apache-state-changes"],
            ),
            license("GPL-2.0", "strong-copyleft", &["disclose-source"]),
            license("GPL-3.0", "strong-copyleft", &["disclose-source"]),
            lgpl,
            license("CC0-1.0", "public-domain", &[]),
        ],
        obligations: vec![
            mit_notice,
            bsd_notice,
            apache_notice,
            state_changes,
            disclose,
            copyleft_notice,
            relink,
        ],
        compatibility: vec![
            categories(
                "static_linking",
                "permissive",
                "permissive",
                Verdict::Compatible,
                "permissive licenses combine freely",
            ),
            categories(
                "static_linking",
                "strong-copyleft",
                "permissive",
                Verdict::Compatible,
                "permissive code may be included in a copyleft work",
            ),
            categories(
                "static_linking",
                "strong-copyleft",
                "strong-copyleft",
                Verdict::Conditional,
                "copyleft versions must agree",
            ),
            categories(
                "static_linking",
                "weak-copyleft",
                "permissive",
                Verdict::Compatible,
                "weak copyleft applies to the library only",
            ),
            categories(
                "static_linking",
                "public-domain",
                "permissive",
                Verdict::Compatible,
                "public domain imposes no terms",
            ),
            categories(
                "dynamic_linking",
                "permissive",
                "permissive",
                Verdict::Compatible,
                "permissive licenses combine freely",
            ),
            categories(
                "dynamic_linking",
                "weak-copyleft",
                "permissive",
                Verdict::Compatible,
                "dynamic linking keeps the library boundary",
            ),
            pair(
                "static_linking",
                "GPL-2.0",
                "Apache-2.0",
                Verdict::Incompatible,
                "Apache-2.0 patent terms are additional restrictions under GPL-2.0",
            ),
            pair(
                "static_linking",
                "GPL-2.0",
                "GPL-3.0",
                Verdict::Incompatible,
                "GPL-2.0-only code cannot be relicensed under GPL-3.0",
            ),
        ],
    }
}

pub fn sample_registry() -> Registry {
    Registry::build(sample_input()).expect("sample registry is valid")
}

/// `deny` strong copyleft when shipping to a given channel.
pub fn copyleft_channel_policy(channel: &str) -> Arc<Policy> {
    let rule = Rule::new(
        "no-strong-copyleft-on-channel",
        Action::Deny,
        Condition::all(vec![
            Condition::LicenseCategory(Category::StrongCopyleft),
            Condition::Distribution(channel.to_string()),
        ]),
    )
    .with_priority(10)
    .with_message("{licenses} cannot ship on {distribution}");
    Arc::new(Policy::new("distribution", "1", vec![rule]).expect("valid policy"))
}

/// Allow everything permissive; used to exercise tie-breaking.
pub fn permissive_allow_policy(name: &str, priority: i32) -> Arc<Policy> {
    let rule = Rule::new(
        "allow-permissive",
        Action::Allow,
        Condition::OnlyCategories([Category::Permissive].into_iter().collect()),
    )
    .with_priority(priority);
    Arc::new(Policy::new(name, "1", vec![rule]).expect("valid policy"))
}
