//! The `split-matrix` use case.

use anyhow::Context;
use camino::Utf8Path;
use licguard_data::MatrixIndex;

#[derive(Clone, Debug)]
pub struct SplitMatrixInput<'a> {
    /// Unsplit `compatibility_matrix.json`.
    pub matrix: &'a Utf8Path,
    /// Output directory for the index and chunk files.
    pub out_dir: &'a Utf8Path,
    pub chunk_size: usize,
}

pub fn run_split_matrix(input: SplitMatrixInput<'_>) -> anyhow::Result<MatrixIndex> {
    let text = std::fs::read_to_string(input.matrix)
        .with_context(|| format!("read matrix {}", input.matrix))?;
    let matrix = licguard_data::parse_matrix_json(&text)
        .with_context(|| format!("parse matrix {}", input.matrix))?;
    licguard_data::split_matrix(&matrix, input.out_dir, input.chunk_size)
}
