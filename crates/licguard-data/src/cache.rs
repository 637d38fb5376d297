use crate::load::{discover_license_files, load_registry};
use crate::matrix;
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use licguard_domain::Registry;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use walkdir::WalkDir;

/// SHA-256 over every dataset file (relative path and contents), in stable order.
pub fn dataset_digest(dataset: &Utf8Path) -> anyhow::Result<String> {
    let mut files = discover_license_files(dataset)?;
    for name in [
        "obligations.toml",
        "obligations.json",
        "compatibility.toml",
        "compatibility.json",
        matrix::MATRIX_FILE,
    ] {
        let p = dataset.join(name);
        if p.is_file() {
            files.push(p);
        }
    }
    let split = dataset.join(matrix::MATRIX_DIR);
    if split.is_dir() {
        files.extend(
            WalkDir::new(&split)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .filter_map(|e| Utf8PathBuf::from_path_buf(e.path().to_path_buf()).ok()),
        );
    }
    files.sort();

    let mut hasher = Sha256::new();
    for path in &files {
        let rel = path.strip_prefix(dataset).unwrap_or(path);
        let bytes = std::fs::read(path).with_context(|| format!("read {path}"))?;
        hasher.update(rel.as_str().replace('\\', "/").as_bytes());
        hasher.update([0u8]);
        hasher.update(&bytes);
        hasher.update([0u8]);
    }
    Ok(hex::encode(hasher.finalize()))
}

struct CacheEntry {
    digest: String,
    registry: Arc<Registry>,
}

/// Caller-owned map from dataset directory to a loaded registry.
///
/// Entries are reloaded when the dataset digest changes. There is no process-wide cache.
#[derive(Default)]
pub struct RegistryCache {
    entries: HashMap<Utf8PathBuf, CacheEntry>,
}

impl RegistryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached registry for `dataset`, loading or reloading it if the files changed.
    pub fn get_or_load(&mut self, dataset: &Utf8Path) -> anyhow::Result<Arc<Registry>> {
        let digest = dataset_digest(dataset)?;
        if let Some(entry) = self.entries.get(dataset)
            && entry.digest == digest
        {
            tracing::debug!(%dataset, "registry cache hit");
            return Ok(Arc::clone(&entry.registry));
        }

        tracing::debug!(%dataset, "registry cache miss");
        let registry = Arc::new(load_registry(dataset)?);
        self.entries.insert(
            dataset.to_path_buf(),
            CacheEntry {
                digest,
                registry: Arc::clone(&registry),
            },
        );
        Ok(registry)
    }

    /// Drop one entry. Returns whether it was present.
    pub fn invalidate(&mut self, dataset: &Utf8Path) -> bool {
        self.entries.remove(dataset).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
