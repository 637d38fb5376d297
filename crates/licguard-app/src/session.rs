//! Everything a use case needs before it can evaluate: resolved config, composed policies, and a
//! loaded registry.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use licguard_data::RegistryCache;
use licguard_domain::policy::Policy;
use licguard_domain::{Engine, EvaluationRequest};
use licguard_settings::{Overrides, ResolvedConfig};
use licguard_types::ids;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Input for opening a session.
#[derive(Clone, Debug)]
pub struct SessionInput<'a> {
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// Directory that relative `dataset` and `policies` paths are resolved against.
    pub base_dir: &'a Utf8Path,
    /// CLI overrides.
    pub overrides: Overrides,
}

/// A resolved run: the engine plus the policies every request is evaluated under.
#[derive(Clone, Debug)]
pub struct Session {
    pub engine: Engine,
    pub resolved: ResolvedConfig,
    /// Built-in policies first, then policy files in config order.
    pub policies: Vec<Arc<Policy>>,
    pub dataset: Utf8PathBuf,
}

impl Session {
    /// The request's context, else the configured one, else `static_linking`.
    pub fn context(&self, requested: Option<&str>) -> String {
        requested
            .or(self.resolved.context.as_deref())
            .unwrap_or(ids::CONTEXT_STATIC_LINKING)
            .to_string()
    }

    /// Build a request carrying this session's policies and default decision.
    pub fn request(
        &self,
        licenses: Vec<String>,
        context: Option<&str>,
        distribution: Option<&str>,
        attributes: BTreeMap<String, String>,
    ) -> EvaluationRequest {
        let mut request = EvaluationRequest::new(licenses, &self.context(context))
            .with_policies(self.policies.iter().cloned())
            .with_default_decision(self.resolved.default_decision);
        if let Some(dist) = distribution.or(self.resolved.distribution.as_deref()) {
            request = request.with_distribution(dist);
        }
        request.attributes = attributes;
        request
    }
}

/// Parse config, resolve overrides, load the dataset (through `cache`) and every policy file.
pub fn open_session(input: SessionInput<'_>, cache: &mut RegistryCache) -> anyhow::Result<Session> {
    // Empty is allowed; defaults apply.
    let cfg = if input.config_text.trim().is_empty() {
        licguard_settings::LicguardConfigV1::default()
    } else {
        licguard_settings::parse_config_toml(input.config_text).context("parse config")?
    };

    let resolved =
        licguard_settings::resolve_config(cfg, input.overrides).context("resolve config")?;

    let dataset = resolved
        .dataset
        .as_deref()
        .map(|d| input.base_dir.join(d))
        .context("no dataset configured (pass --dataset or set `dataset` in licguard.toml)")?;

    let registry = cache
        .get_or_load(&dataset)
        .with_context(|| format!("load dataset {dataset}"))?;

    let mut policies = resolved.builtin_policies.clone();
    for path in &resolved.policy_paths {
        let path = input.base_dir.join(path);
        policies.push(Arc::new(load_policy_file(&path)?));
    }

    tracing::info!(
        profile = %resolved.profile,
        dataset = %dataset,
        licenses = registry.len(),
        policies = policies.len(),
        "session ready"
    );

    Ok(Session {
        engine: Engine::new(registry),
        resolved,
        policies,
        dataset,
    })
}

fn load_policy_file(path: &Utf8Path) -> anyhow::Result<Policy> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read policy {path}"))?;
    licguard_settings::load_policy_toml(&text).with_context(|| format!("load policy {path}"))
}
