use crate::session::{open_session, Session, SessionInput};
use camino::Utf8PathBuf;
use licguard_data::RegistryCache;
use licguard_settings::Overrides;

pub fn fixtures_dir() -> Utf8PathBuf {
    let manifest = Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root")
        .join("tests")
        .join("fixtures")
}

/// A session over the fixture dataset with `policies` (relative to the fixtures dir) composed in.
pub fn fixture_session(policies: &[&str], overrides: Overrides) -> Session {
    let list: Vec<String> = policies.iter().map(|p| format!("\"{p}\"")).collect();
    let config = format!("dataset = \"dataset\"\npolicies = [{}]\n", list.join(", "));
    let root = fixtures_dir();
    open_session(
        SessionInput {
            config_text: &config,
            base_dir: &root,
            overrides,
        },
        &mut RegistryCache::new(),
    )
    .expect("fixture session opens")
}
