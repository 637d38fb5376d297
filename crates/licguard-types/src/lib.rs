//! Stable DTOs and IDs used across the licguard workspace.
//!
//! This crate is intentionally boring:
//! - closed enums for categories, verdicts, and actions
//! - result types returned by the engine (with lineage)
//! - stable string IDs and error codes
//! - report envelopes and the explain registry

#![forbid(unsafe_code)]

pub mod explain;
pub mod ids;
pub mod receipt;
pub mod result;

pub use explain::{lookup_explanation, ExamplePair, Explanation};
pub use receipt::{
    BatchData, BatchEntry, BatchOutcome, BatchReport, CompatReport, ErrorReport, LicguardReport,
    ObligationsData, ObligationsReport, ReportEnvelope, RunError, ToolMeta, SCHEMA_BATCH_V1,
    SCHEMA_COMPAT_V1, SCHEMA_ERROR_V1, SCHEMA_OBLIGATIONS_V1, SCHEMA_REPORT_V1,
};
pub use result::{
    Action, Category, CompatibilityReport, Decision, EvaluationResult, Lineage, ObligationResult,
    PairVerdict, Verdict,
};
