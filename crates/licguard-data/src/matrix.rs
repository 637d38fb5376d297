//! Pairwise compatibility matrix, in unsplit form or as an index plus chunk files.

use crate::files::parse_verdict;
use anyhow::Context;
use camino::Utf8Path;
use licguard_domain::model::{CompatibilityRecord, CompatibilitySubject};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const MATRIX_FILE: &str = "compatibility_matrix.json";
pub const MATRIX_DIR: &str = "compatibility";
pub const INDEX_FILE: &str = "compatibility_index.json";

/// other license -> cell
pub type MatrixRow = BTreeMap<String, MatrixCell>;
/// license -> context -> row
pub type MatrixTable = BTreeMap<String, BTreeMap<String, MatrixRow>>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MatrixCell {
    pub verdict: String,
    #[serde(default)]
    pub reason: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CompatibilityMatrix {
    #[serde(default = "default_matrix_version")]
    pub version: String,
    #[serde(default)]
    pub generated: Option<String>,
    #[serde(default)]
    pub total_licenses: usize,
    #[serde(default)]
    pub compatibility: MatrixTable,
}

fn default_matrix_version() -> String {
    "1.0".to_string()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MatrixIndex {
    pub version: String,
    pub generated: Option<String>,
    pub total_licenses: usize,
    pub chunk_size: usize,
    pub num_chunks: usize,
    pub chunks: Vec<ChunkInfo>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ChunkInfo {
    pub chunk_id: usize,
    pub file: String,
    pub start_license: Option<String>,
    pub end_license: Option<String>,
    pub license_count: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MatrixChunk {
    pub chunk_id: usize,
    pub start_index: usize,
    pub end_index: usize,
    pub licenses: Vec<String>,
    pub compatibility: MatrixTable,
}

pub fn chunk_file_name(chunk_id: usize) -> String {
    format!("compatibility_chunk_{chunk_id:03}.json")
}

/// Split `matrix` into chunks of `chunk_size` licenses (sorted by id) and write them with an index.
pub fn split_matrix(
    matrix: &CompatibilityMatrix,
    out_dir: &Utf8Path,
    chunk_size: usize,
) -> anyhow::Result<MatrixIndex> {
    anyhow::ensure!(chunk_size > 0, "chunk_size must be at least 1");
    std::fs::create_dir_all(out_dir).with_context(|| format!("create {out_dir}"))?;

    // BTreeMap keys are already sorted.
    let ids: Vec<&String> = matrix.compatibility.keys().collect();
    let mut chunks = Vec::new();

    for (chunk_id, slice) in ids.chunks(chunk_size).enumerate() {
        let start_index = chunk_id * chunk_size;
        let licenses: Vec<String> = slice.iter().map(|s| s.to_string()).collect();
        let compatibility: MatrixTable = slice
            .iter()
            .map(|id| ((*id).clone(), matrix.compatibility[*id].clone()))
            .collect();
        let chunk = MatrixChunk {
            chunk_id,
            start_index,
            end_index: start_index + licenses.len(),
            licenses,
            compatibility,
        };

        let file = chunk_file_name(chunk_id);
        write_json(&out_dir.join(&file), &chunk)?;
        tracing::debug!(chunk = chunk_id, licenses = chunk.licenses.len(), %file, "wrote chunk");

        chunks.push(ChunkInfo {
            chunk_id,
            file,
            start_license: chunk.licenses.first().cloned(),
            end_license: chunk.licenses.last().cloned(),
            license_count: chunk.licenses.len(),
        });
    }

    let index = MatrixIndex {
        version: matrix.version.clone(),
        generated: matrix.generated.clone(),
        total_licenses: ids.len(),
        chunk_size,
        num_chunks: chunks.len(),
        chunks,
    };
    write_json(&out_dir.join(INDEX_FILE), &index)?;
    tracing::info!(chunks = index.num_chunks, licenses = index.total_licenses, "matrix split");
    Ok(index)
}

/// Read an index and merge its chunks back into a single matrix.
pub fn load_split_matrix(dir: &Utf8Path) -> anyhow::Result<CompatibilityMatrix> {
    let index_path = dir.join(INDEX_FILE);
    let index: MatrixIndex = read_json(&index_path)?;

    let mut compatibility = MatrixTable::new();
    for info in &index.chunks {
        let chunk: MatrixChunk = read_json(&dir.join(&info.file))?;
        compatibility.extend(chunk.compatibility);
    }

    Ok(CompatibilityMatrix {
        version: index.version,
        generated: index.generated,
        total_licenses: index.total_licenses,
        compatibility,
    })
}

pub fn parse_matrix_json(text: &str) -> anyhow::Result<CompatibilityMatrix> {
    Ok(serde_json::from_str(text)?)
}

pub fn parse_index_json(text: &str) -> anyhow::Result<MatrixIndex> {
    Ok(serde_json::from_str(text)?)
}

/// Every matrix cell as an identifier-pair override.
pub fn matrix_records(matrix: &CompatibilityMatrix) -> anyhow::Result<Vec<CompatibilityRecord>> {
    let mut out = Vec::new();
    for (license, contexts) in &matrix.compatibility {
        for (context, row) in contexts {
            for (other, cell) in row {
                let verdict = parse_verdict(&cell.verdict)
                    .with_context(|| format!("matrix cell {license}/{context}/{other}"))?;
                out.push(CompatibilityRecord {
                    context: context.clone(),
                    subject: CompatibilitySubject::Licenses([license.clone(), other.clone()]),
                    verdict,
                    reason: cell.reason.clone(),
                });
            }
        }
    }
    Ok(out)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Utf8Path) -> anyhow::Result<T> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read {path}"))?;
    serde_json::from_str(&text).with_context(|| format!("parse {path}"))
}

fn write_json<T: Serialize>(path: &Utf8Path, value: &T) -> anyhow::Result<()> {
    let mut text = serde_json::to_string_pretty(value).context("serialize json")?;
    text.push('\n');
    std::fs::write(path, text).with_context(|| format!("write {path}"))
}
