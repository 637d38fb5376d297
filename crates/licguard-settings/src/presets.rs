use crate::{parse_policy_toml, policy::resolve_policy};
use anyhow::Context;
use licguard_domain::policy::{DefaultDecision, Policy};
use std::sync::Arc;

pub const PROFILE_STRICT: &str = "strict";
pub const PROFILE_STANDARD: &str = "standard";
pub const PROFILE_OPEN: &str = "open";
pub const DEFAULT_PROFILE: &str = PROFILE_STANDARD;

pub const BASELINE_POLICY_NAME: &str = "licguard-baseline";

/// Built-in baseline rules, expressed in the same format users write.
const BASELINE_POLICY_TOML: &str = r#"
schema = "licguard.policy.v1"
name = "licguard-baseline"
version = "1"

[[rules]]
id = "deny-incompatible"
priority = 100
action = "deny"
message = "{licenses} are incompatible under {context}"
when = { compatibility = "incompatible" }

[[rules]]
id = "warn-conditional"
priority = 50
action = "warn"
message = "{licenses} need manual review under {context}"
when = { compatibility = "conditional" }

[[rules]]
id = "warn-unknown-category"
priority = 40
action = "warn"
message = "a license in {licenses} has an unknown category"
when = { license_category = "unknown" }
"#;

/// Preset profiles are opinionated defaults.
///
/// Keep these small and readable. Anything complex should go into a policy file.
#[derive(Clone, Debug)]
pub struct Preset {
    pub profile: String,
    pub default_decision: DefaultDecision,
    /// Composed ahead of any user policies.
    pub policies: Vec<Arc<Policy>>,
}

pub fn preset(profile: &str) -> anyhow::Result<Preset> {
    match profile {
        PROFILE_STRICT => Ok(Preset {
            profile: PROFILE_STRICT.to_string(),
            default_decision: DefaultDecision::Deny,
            policies: vec![Arc::new(baseline_policy()?)],
        }),
        PROFILE_STANDARD => Ok(Preset {
            profile: PROFILE_STANDARD.to_string(),
            default_decision: DefaultDecision::Allow,
            policies: vec![Arc::new(baseline_policy()?)],
        }),
        PROFILE_OPEN => Ok(Preset {
            profile: PROFILE_OPEN.to_string(),
            default_decision: DefaultDecision::Allow,
            policies: Vec::new(),
        }),
        other => anyhow::bail!("unknown profile: {other} (expected strict|standard|open)"),
    }
}

pub fn baseline_policy() -> anyhow::Result<Policy> {
    let file = parse_policy_toml(BASELINE_POLICY_TOML).context("parse baseline policy")?;
    resolve_policy(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use licguard_types::Action;

    #[test]
    fn baseline_has_expected_rules() {
        let policy = baseline_policy().expect("baseline is valid");
        assert_eq!(policy.name, BASELINE_POLICY_NAME);
        let rules: Vec<(&str, i32, Action)> = policy
            .rules
            .iter()
            .map(|r| (r.id.as_str(), r.priority, r.action))
            .collect();
        assert_eq!(
            rules,
            vec![
                ("deny-incompatible", 100, Action::Deny),
                ("warn-conditional", 50, Action::Warn),
                ("warn-unknown-category", 40, Action::Warn),
            ]
        );
    }

    #[test]
    fn profiles_differ_in_default_and_baseline() {
        let strict = preset("strict").expect("known");
        assert_eq!(strict.default_decision, DefaultDecision::Deny);
        assert_eq!(strict.policies.len(), 1);

        let standard = preset("standard").expect("known");
        assert_eq!(standard.default_decision, DefaultDecision::Allow);
        assert_eq!(standard.policies.len(), 1);

        let open = preset("open").expect("known");
        assert_eq!(open.default_decision, DefaultDecision::Allow);
        assert!(open.policies.is_empty());
    }

    #[test]
    fn unknown_profile_is_an_error() {
        assert!(preset("lenient").is_err());
    }
}
