use crate::{model::LicguardConfigV1, presets};
use licguard_domain::policy::{DefaultDecision, Policy};
use std::sync::Arc;

pub const CONFIG_SCHEMA_V1: &str = "licguard.config.v1";

/// Values supplied on the command line. They beat the config file, which beats the profile.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub default_decision: Option<String>,
    pub context: Option<String>,
    pub distribution: Option<String>,
    pub dataset: Option<String>,
    /// Appended after the config's policy paths.
    pub policies: Vec<String>,
    pub jobs: Option<usize>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub profile: String,
    pub default_decision: DefaultDecision,
    pub context: Option<String>,
    pub distribution: Option<String>,
    pub dataset: Option<String>,
    /// Built-in policies from the profile, composed first.
    pub builtin_policies: Vec<Arc<Policy>>,
    /// Policy files to load, composed after the built-ins in this order.
    pub policy_paths: Vec<String>,
    pub jobs: Option<usize>,
}

pub fn resolve_config(
    cfg: LicguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    if let Some(schema) = cfg.schema.as_deref()
        && schema != CONFIG_SCHEMA_V1
    {
        anyhow::bail!("unsupported config schema: {schema} (expected {CONFIG_SCHEMA_V1})");
    }

    let profile = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| presets::DEFAULT_PROFILE.to_string());

    let preset = presets::preset(&profile)?;
    let mut default_decision = preset.default_decision;

    if let Some(v) = overrides
        .default_decision
        .as_deref()
        .or(cfg.default_decision.as_deref())
    {
        default_decision = parse_default_decision(v)?;
    }

    if let Some(jobs) = overrides.jobs.or(cfg.jobs)
        && jobs == 0
    {
        anyhow::bail!("jobs must be at least 1");
    }

    let mut policy_paths = cfg.policies;
    policy_paths.extend(overrides.policies);

    Ok(ResolvedConfig {
        profile: preset.profile,
        default_decision,
        context: overrides.context.or(cfg.context),
        distribution: overrides.distribution.or(cfg.distribution),
        dataset: overrides.dataset.or(cfg.dataset),
        builtin_policies: preset.policies,
        policy_paths,
        jobs: overrides.jobs.or(cfg.jobs),
    })
}

pub fn parse_default_decision(v: &str) -> anyhow::Result<DefaultDecision> {
    match v {
        "allow" => Ok(DefaultDecision::Allow),
        "deny" => Ok(DefaultDecision::Deny),
        other => anyhow::bail!("unknown default_decision: {other} (expected 'allow' or 'deny')"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_config_toml;

    #[test]
    fn defaults_to_standard_profile() {
        let resolved = resolve_config(LicguardConfigV1::default(), Overrides::default())
            .expect("resolves");
        assert_eq!(resolved.profile, "standard");
        assert_eq!(resolved.default_decision, DefaultDecision::Allow);
        assert_eq!(resolved.builtin_policies.len(), 1);
        assert!(resolved.policy_paths.is_empty());
    }

    #[test]
    fn config_beats_profile_and_overrides_beat_config() {
        let cfg = parse_config_toml(
            r#"
profile = "strict"
default_decision = "allow"
context = "static_linking"
distribution = "desktop"
policies = ["policies/base.toml"]
jobs = 2
"#,
        )
        .expect("parses");

        let resolved = resolve_config(cfg.clone(), Overrides::default()).expect("resolves");
        assert_eq!(resolved.profile, "strict");
        // Config default beats the strict preset's deny.
        assert_eq!(resolved.default_decision, DefaultDecision::Allow);
        assert_eq!(resolved.context.as_deref(), Some("static_linking"));
        assert_eq!(resolved.jobs, Some(2));

        let overrides = Overrides {
            profile: Some("open".to_string()),
            default_decision: Some("deny".to_string()),
            distribution: Some("mobile".to_string()),
            policies: vec!["extra.toml".to_string()],
            ..Overrides::default()
        };
        let resolved = resolve_config(cfg, overrides).expect("resolves");
        assert_eq!(resolved.profile, "open");
        assert!(resolved.builtin_policies.is_empty());
        assert_eq!(resolved.default_decision, DefaultDecision::Deny);
        assert_eq!(resolved.distribution.as_deref(), Some("mobile"));
        assert_eq!(resolved.policy_paths, vec!["policies/base.toml", "extra.toml"]);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let bad_default = LicguardConfigV1 {
            default_decision: Some("maybe".to_string()),
            ..LicguardConfigV1::default()
        };
        assert!(resolve_config(bad_default, Overrides::default()).is_err());

        let zero_jobs = Overrides {
            jobs: Some(0),
            ..Overrides::default()
        };
        assert!(resolve_config(LicguardConfigV1::default(), zero_jobs).is_err());

        let bad_schema = LicguardConfigV1 {
            schema: Some("licguard.config.v0".to_string()),
            ..LicguardConfigV1::default()
        };
        assert!(resolve_config(bad_schema, Overrides::default()).is_err());
    }
}
