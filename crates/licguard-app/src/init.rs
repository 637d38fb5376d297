//! The `init` use case: scaffold `licguard.toml` and a starter policy.

use crate::report::write_text;
use camino::{Utf8Path, Utf8PathBuf};
use licguard_settings::DEFAULT_PROFILE;

pub const CONFIG_FILE: &str = "licguard.toml";
pub const DEFAULT_POLICY_FILE: &str = "licguard-policy.toml";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InitOutput {
    pub config_path: Utf8PathBuf,
    pub policy_path: Utf8PathBuf,
}

/// Write both files into `dir`. Existing files are kept unless `force` is set.
pub fn run_init(
    dir: &Utf8Path,
    profile: Option<&str>,
    dataset: &str,
    force: bool,
) -> anyhow::Result<InitOutput> {
    let profile = profile.unwrap_or(DEFAULT_PROFILE);
    let config_path = dir.join(CONFIG_FILE);
    let policy_path = dir.join(DEFAULT_POLICY_FILE);

    if !force {
        for path in [&config_path, &policy_path] {
            if path.exists() {
                anyhow::bail!("{path} already exists (use --force to overwrite)");
            }
        }
    }

    let name = dir
        .file_name()
        .filter(|n| !n.is_empty())
        .unwrap_or("project");
    let policy = licguard_settings::policy_template(name, profile)?;
    let config = licguard_settings::config_template(profile, dataset, DEFAULT_POLICY_FILE)?;

    write_text(&config_path, &config)?;
    write_text(&policy_path, &policy)?;
    tracing::info!(%config_path, %policy_path, profile, "scaffolded");

    Ok(InitOutput {
        config_path,
        policy_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluate::{run_evaluate, EvaluateInput};
    use crate::session::{open_session, SessionInput};
    use crate::test_support::fixtures_dir;
    use licguard_data::RegistryCache;
    use licguard_settings::Overrides;
    use licguard_types::Action;
    use tempfile::TempDir;

    fn utf8_root(tmp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(tmp.path().join("acme")).expect("utf8 path")
    }

    #[test]
    fn scaffold_parses_back() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);

        let out = run_init(&root, Some("strict"), "data", false).expect("init");
        let cfg_text = std::fs::read_to_string(&out.config_path).expect("config written");
        let cfg = licguard_settings::parse_config_toml(&cfg_text).expect("config parses");
        assert_eq!(cfg.profile.as_deref(), Some("strict"));
        assert_eq!(cfg.policies, vec![DEFAULT_POLICY_FILE]);

        let policy_text = std::fs::read_to_string(&out.policy_path).expect("policy written");
        let policy = licguard_settings::load_policy_toml(&policy_text).expect("policy valid");
        assert_eq!(policy.name, "acme");
    }

    #[test]
    fn scaffold_evaluates_without_request_distribution() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);
        let dataset = fixtures_dir().join("dataset");

        for profile in ["strict", "standard", "open"] {
            let out = run_init(&root, Some(profile), dataset.as_str(), true).expect("init");
            let config_text = std::fs::read_to_string(&out.config_path).expect("config written");
            let session = open_session(
                SessionInput {
                    config_text: &config_text,
                    base_dir: &root,
                    overrides: Overrides::default(),
                },
                &mut RegistryCache::new(),
            )
            .expect("session opens");

            let report = run_evaluate(&session, EvaluateInput::new(["MIT"])).expect("evaluates");
            assert_eq!(report.result.decision.action, Action::Allow, "{profile}");

            let report =
                run_evaluate(&session, EvaluateInput::new(["GPL-3.0"])).expect("evaluates");
            assert_ne!(
                report.result.decision.rule_id, "no-strong-copyleft-on-mobile",
                "{profile}"
            );
        }
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);

        run_init(&root, None, "data", false).expect("first init");
        let err = run_init(&root, None, "data", false).expect_err("exists");
        assert!(err.to_string().contains("already exists"));
        run_init(&root, Some("open"), "data", true).expect("forced");
    }
}
