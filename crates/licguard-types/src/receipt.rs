use crate::{CompatibilityReport, EvaluationResult, ObligationResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Stable schema identifiers for licguard reports.
pub const SCHEMA_REPORT_V1: &str = "licguard.report.v1";
pub const SCHEMA_COMPAT_V1: &str = "licguard.compat.v1";
pub const SCHEMA_OBLIGATIONS_V1: &str = "licguard.obligations.v1";
pub const SCHEMA_BATCH_V1: &str = "licguard.batch.v1";
pub const SCHEMA_ERROR_V1: &str = "licguard.error.v1";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// A generic report envelope.
///
/// Keeping this generic lets every use case embed its own payload while the outer shape stays stable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportEnvelope<TData = EvaluationResult> {
    /// Versioned schema identifier for the payload shape.
    pub schema: String,
    pub tool: ToolMeta,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    pub result: TData,
}

/// Error payload written when a run aborts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RunError {
    pub code: String,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ObligationsData {
    pub licenses: Vec<String>,
    pub obligations: Vec<ObligationResult>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum BatchOutcome {
    Ok(EvaluationResult),
    Error(RunError),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BatchEntry {
    /// Position of the originating request in the batch input.
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub outcome: BatchOutcome,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BatchData {
    pub jobs: usize,
    pub items: Vec<BatchEntry>,
}

pub type LicguardReport = ReportEnvelope<EvaluationResult>;
pub type CompatReport = ReportEnvelope<CompatibilityReport>;
pub type ObligationsReport = ReportEnvelope<ObligationsData>;
pub type BatchReport = ReportEnvelope<BatchData>;
pub type ErrorReport = ReportEnvelope<RunError>;
