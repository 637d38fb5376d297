//! Dataset adapters: discover and parse license data, chunk the compatibility matrix,
//! and cache loaded registries.
//!
//! This crate is allowed to do filesystem IO. Everything it produces is validated by
//! `licguard_domain::Registry::build`.

#![forbid(unsafe_code)]

mod cache;
mod files;
mod load;
mod matrix;

pub use cache::{dataset_digest, RegistryCache};
pub use files::{
    CompatibilityEntry, CompatibilityFile, LicenseFile, ObligationEntry, ObligationsFile,
    OverrideEntry,
};
pub use load::{discover_license_files, load_dataset, load_registry};
pub use matrix::{
    chunk_file_name, load_split_matrix, matrix_records, parse_index_json, parse_matrix_json,
    split_matrix, ChunkInfo, CompatibilityMatrix, MatrixCell, MatrixChunk, MatrixIndex,
    INDEX_FILE, MATRIX_DIR, MATRIX_FILE,
};

/// Fuzz-friendly API for testing parsing robustness without filesystem access.
/// These functions are designed to never panic on any input.
pub mod fuzz {
    use super::*;

    /// Parse arbitrary text as a TOML license record and convert it.
    ///
    /// **Never panics** on any input.
    pub fn parse_license_toml(text: &str) -> anyhow::Result<()> {
        let file: LicenseFile = toml::from_str(text)?;
        let _ = file.into_record()?;
        Ok(())
    }

    /// Parse arbitrary text as a compatibility matrix and flatten it to records.
    ///
    /// **Never panics** on any input.
    pub fn parse_matrix(text: &str) -> anyhow::Result<usize> {
        let m = parse_matrix_json(text)?;
        Ok(matrix_records(&m)?.len())
    }

    /// Parse arbitrary text as a chunk index.
    ///
    /// **Never panics** on any input.
    pub fn parse_matrix_index(text: &str) -> anyhow::Result<usize> {
        Ok(parse_index_json(text)?.chunks.len())
    }
}
