use crate::files::{CompatibilityFile, LicenseFile, ObligationsFile};
use crate::matrix::{self, CompatibilityMatrix};
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use licguard_domain::Registry;
use licguard_domain::model::RegistryInput;
use rayon::prelude::*;
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use walkdir::WalkDir;

pub const LICENSES_DIR: &str = "licenses";
pub const OBLIGATIONS_STEM: &str = "obligations";
pub const COMPATIBILITY_STEM: &str = "compatibility";

/// Parse a record file by extension (`.toml` or `.json`).
pub(crate) fn parse_file<T: DeserializeOwned>(path: &Utf8Path) -> anyhow::Result<T> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read {path}"))?;
    parse_text(path, &text).with_context(|| format!("parse {path}"))
}

fn parse_text<T: DeserializeOwned>(path: &Utf8Path, text: &str) -> anyhow::Result<T> {
    match path.extension() {
        Some("toml") => Ok(toml::from_str(text)?),
        Some("json") => Ok(serde_json::from_str(text)?),
        other => anyhow::bail!("unsupported file extension: {other:?} (expected toml or json)"),
    }
}

/// Every `.toml`/`.json` file under `licenses/`, in stable order.
pub fn discover_license_files(dataset: &Utf8Path) -> anyhow::Result<Vec<Utf8PathBuf>> {
    let root = dataset.join(LICENSES_DIR);
    anyhow::ensure!(root.is_dir(), "dataset has no {LICENSES_DIR}/ directory: {dataset}");

    let mut out: Vec<Utf8PathBuf> = WalkDir::new(&root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| pathbuf_to_utf8(e.path().to_path_buf()))
        .filter(|p| matches!(p.extension(), Some("toml") | Some("json")))
        .collect();

    // Stable order.
    out.sort();
    Ok(out)
}

/// `<dir>/<stem>.toml`, else `<dir>/<stem>.json`, else nothing.
fn find_table(dataset: &Utf8Path, stem: &str) -> Option<Utf8PathBuf> {
    ["toml", "json"]
        .iter()
        .map(|ext| dataset.join(format!("{stem}.{ext}")))
        .find(|p| p.is_file())
}

/// Read the dataset into load records. Does not validate cross references; see [`load_registry`].
pub fn load_dataset(dataset: &Utf8Path) -> anyhow::Result<RegistryInput> {
    let license_paths = discover_license_files(dataset)?;

    let licenses = license_paths
        .par_iter()
        .map(|path| {
            tracing::debug!(%path, "parse license");
            let file: LicenseFile = parse_file(path)?;
            file.into_record().with_context(|| format!("license file {path}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let obligations = match find_table(dataset, OBLIGATIONS_STEM) {
        Some(path) => parse_file::<ObligationsFile>(&path)?
            .obligations
            .into_iter()
            .map(|e| e.into_record())
            .collect(),
        None => Vec::new(),
    };

    let mut compatibility = Vec::new();
    if let Some(path) = find_table(dataset, COMPATIBILITY_STEM) {
        for entry in parse_file::<CompatibilityFile>(&path)?.rules {
            compatibility.push(entry.into_record().with_context(|| format!("rule in {path}"))?);
        }
    }
    if let Some(m) = load_matrix(dataset)? {
        compatibility.extend(matrix::matrix_records(&m)?);
    }

    tracing::info!(
        dataset = %dataset,
        licenses = licenses.len(),
        obligations = obligations.len(),
        compatibility = compatibility.len(),
        "dataset loaded"
    );

    Ok(RegistryInput {
        licenses,
        obligations,
        compatibility,
    })
}

/// Split form wins over the unsplit file when both exist.
fn load_matrix(dataset: &Utf8Path) -> anyhow::Result<Option<CompatibilityMatrix>> {
    let split_dir = dataset.join(matrix::MATRIX_DIR);
    if split_dir.join(matrix::INDEX_FILE).is_file() {
        return matrix::load_split_matrix(&split_dir).map(Some);
    }
    let unsplit = dataset.join(matrix::MATRIX_FILE);
    if unsplit.is_file() {
        let text = std::fs::read_to_string(&unsplit).with_context(|| format!("read {unsplit}"))?;
        return matrix::parse_matrix_json(&text)
            .with_context(|| format!("parse {unsplit}"))
            .map(Some);
    }
    Ok(None)
}

/// Load and validate a dataset in one step. Either the whole registry loads or nothing does.
pub fn load_registry(dataset: &Utf8Path) -> anyhow::Result<Registry> {
    let input = load_dataset(dataset)?;
    let registry = Registry::build(input).with_context(|| format!("build registry from {dataset}"))?;
    Ok(registry)
}

fn pathbuf_to_utf8(path: PathBuf) -> Option<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path).ok()
}
