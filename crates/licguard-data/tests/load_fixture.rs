use camino::Utf8PathBuf;
use licguard_data::{RegistryCache, load_registry, split_matrix};
use licguard_domain::{Engine, EvaluationRequest};
use licguard_types::{Category, Lineage, Verdict};
use std::sync::Arc;

fn fixtures_dir() -> Utf8PathBuf {
    let manifest = Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root")
        .join("tests")
        .join("fixtures")
}

fn dataset() -> Utf8PathBuf {
    fixtures_dir().join("dataset")
}

#[test]
fn fixture_dataset_loads_every_record() {
    let registry = load_registry(&dataset()).expect("fixture dataset is valid");

    assert_eq!(registry.len(), 9);
    assert_eq!(
        registry.category_of("cc0-1.0").expect("known"),
        Category::PublicDomain
    );
    assert_eq!(
        registry.category_of("LicenseRef-Acme-EULA").expect("known"),
        Category::Proprietary
    );
    let contexts: Vec<&str> = registry.contexts().collect();
    assert_eq!(contexts, vec!["dynamic_linking", "saas", "static_linking"]);
}

#[test]
fn pair_overrides_beat_category_defaults() {
    let engine = Engine::new(Arc::new(load_registry(&dataset()).expect("loads")));

    let gpl_apache = engine
        .check_compatibility("GPL-2.0", "Apache-2.0", "static_linking")
        .expect("known");
    assert_eq!(gpl_apache.verdict, Verdict::Incompatible);
    assert!(matches!(gpl_apache.lineage, Lineage::PairOverride { .. }));

    let gpl_mit = engine
        .check_compatibility("GPL-3.0", "MIT", "static_linking")
        .expect("known");
    assert_eq!(gpl_mit.verdict, Verdict::Compatible);
    assert!(matches!(gpl_mit.lineage, Lineage::CategoryDefault { .. }));

    // Declared on the LGPL-2.1 record itself.
    let lgpl_gpl = engine
        .check_compatibility("gpl-3.0", "lgpl-2.1", "static_linking")
        .expect("known");
    assert_eq!(lgpl_gpl.verdict, Verdict::Compatible);
}

#[test]
fn split_matrix_cells_are_loaded() {
    let engine = Engine::new(Arc::new(load_registry(&dataset()).expect("loads")));

    let v = engine
        .check_compatibility("MIT", "GPL-3.0", "saas")
        .expect("known");
    assert_eq!(v.verdict, Verdict::Compatible);

    // Not covered by the matrix and no saas category defaults exist.
    let v = engine
        .check_compatibility("MIT", "BSD-3-Clause", "saas")
        .expect("known");
    assert_eq!(v.verdict, Verdict::Conditional);
    assert!(matches!(v.lineage, Lineage::NoRule { .. }));
}

#[test]
fn permissive_obligations_merge_by_key() {
    let engine = Engine::new(Arc::new(load_registry(&dataset()).expect("loads")));
    let checklist = engine
        .obligations(&["MIT", "BSD-3-Clause", "Apache-2.0"])
        .expect("known");

    let keys: Vec<&str> = checklist.iter().map(|o| o.merge_key.as_str()).collect();
    assert_eq!(
        keys,
        vec![
            "include_license",
            "notice_file",
            "state_changes",
            "no_endorsement"
        ]
    );
    assert_eq!(
        checklist[0].licenses,
        vec!["Apache-2.0", "BSD-3-Clause", "MIT"]
    );
    assert!(!checklist[3].required);
}

#[test]
fn copyleft_set_is_folded_with_lineage() {
    let engine = Engine::new(Arc::new(load_registry(&dataset()).expect("loads")));
    let result = engine
        .evaluate(&EvaluationRequest::new(
            ["MIT", "GPL-2.0", "Apache-2.0"],
            "static_linking",
        ))
        .expect("evaluates");

    assert_eq!(result.compatibility.overall, Verdict::Incompatible);
    assert_eq!(result.compatibility.pairs.len(), 3);
    assert!(
        result
            .obligations
            .iter()
            .any(|o| o.merge_key == "copyleft_notice")
    );
}

#[test]
fn split_then_reload_matches_the_fixture() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let out = Utf8PathBuf::from_path_buf(tmp.path().join("compatibility")).expect("utf8");

    let original =
        licguard_data::load_split_matrix(&dataset().join("compatibility")).expect("loads");
    let index = split_matrix(&original, &out, 1).expect("splits");
    assert_eq!(index.num_chunks, 3);
    assert_eq!(
        licguard_data::load_split_matrix(&out).expect("reloads"),
        original
    );
}

#[test]
fn cache_reuses_the_fixture_registry() {
    let mut cache = RegistryCache::new();
    let first = cache.get_or_load(&dataset()).expect("loads");
    let second = cache.get_or_load(&dataset()).expect("loads");
    assert!(Arc::ptr_eq(&first, &second));
}
