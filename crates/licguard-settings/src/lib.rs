//! Config parsing, policy files, and profile/preset resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod model;
mod policy;
mod presets;
mod resolve;
mod template;

pub use model::{
    BatchFileV1, BatchRequestV1, ConditionConfig, LicguardConfigV1, PolicyFileV1, RuleConfig,
};
pub use policy::{resolve_policy, POLICY_SCHEMA_V1};
pub use presets::{
    baseline_policy, preset, Preset, BASELINE_POLICY_NAME, DEFAULT_PROFILE, PROFILE_OPEN,
    PROFILE_STANDARD, PROFILE_STRICT,
};
pub use resolve::{parse_default_decision, Overrides, ResolvedConfig, CONFIG_SCHEMA_V1};
pub use template::{config_template, policy_template};

pub const BATCH_SCHEMA_V1: &str = "licguard.batch-input.v1";

use licguard_domain::policy::Policy;

/// Parse `licguard.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<LicguardConfigV1> {
    let cfg: LicguardConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Parse a policy file into its typed model.
pub fn parse_policy_toml(input: &str) -> anyhow::Result<PolicyFileV1> {
    let file: PolicyFileV1 = toml::from_str(input)?;
    Ok(file)
}

/// Parse a TOML batch file and check its schema string, if any.
pub fn parse_batch_toml(input: &str) -> anyhow::Result<BatchFileV1> {
    let file: BatchFileV1 = toml::from_str(input)?;
    check_batch_schema(&file)?;
    Ok(file)
}

/// Batch files may also arrive as JSON; the caller parses those and checks them here.
pub fn check_batch_schema(file: &BatchFileV1) -> anyhow::Result<()> {
    if let Some(schema) = file.schema.as_deref()
        && schema != BATCH_SCHEMA_V1
    {
        anyhow::bail!("unsupported batch schema: {schema} (expected {BATCH_SCHEMA_V1})");
    }
    Ok(())
}

/// Parse and validate a policy file in one step.
pub fn load_policy_toml(input: &str) -> anyhow::Result<Policy> {
    policy::resolve_policy(parse_policy_toml(input)?)
}

/// Resolve the effective config (profile + config file + overrides).
pub fn resolve_config(
    cfg: LicguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}

/// Fuzz-friendly API for testing parsing robustness.
/// These functions are designed to never panic on any input.
pub mod fuzz {
    use super::*;

    /// Parse and validate arbitrary text as a policy file, returning the rule count.
    ///
    /// **Never panics** on any input.
    pub fn parse_policy(text: &str) -> anyhow::Result<usize> {
        Ok(load_policy_toml(text)?.rules.len())
    }

    /// Parse arbitrary text as a config file and resolve it without overrides.
    ///
    /// **Never panics** on any input.
    pub fn parse_config(text: &str) -> anyhow::Result<()> {
        resolve_config(parse_config_toml(text)?, Overrides::default())?;
        Ok(())
    }
}
