use anyhow::Context;
use camino::Utf8Path;
use licguard_domain::{EngineError, LoadError};
use licguard_render::RenderableReport;
use licguard_types::{
    ErrorReport, LicguardReport, ReportEnvelope, RunError, SCHEMA_ERROR_V1, SCHEMA_REPORT_V1,
    ToolMeta, ids,
};
use serde::Serialize;
use time::OffsetDateTime;

pub(crate) fn tool_meta() -> ToolMeta {
    ToolMeta {
        name: "licguard".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

pub(crate) fn envelope<T>(schema: &str, started_at: OffsetDateTime, result: T) -> ReportEnvelope<T> {
    ReportEnvelope {
        schema: schema.to_string(),
        tool: tool_meta(),
        started_at,
        finished_at: OffsetDateTime::now_utc(),
        result,
    }
}

pub fn serialize_report<T: Serialize>(report: &ReportEnvelope<T>) -> anyhow::Result<Vec<u8>> {
    let mut data = serde_json::to_vec_pretty(report).context("serialize report")?;
    data.push(b'\n');
    Ok(data)
}

/// Parse an evaluation report written by `licguard evaluate`.
pub fn parse_evaluation_report(text: &str) -> anyhow::Result<LicguardReport> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    if schema != SCHEMA_REPORT_V1 {
        anyhow::bail!("unsupported report schema: {schema:?} (expected {SCHEMA_REPORT_V1})");
    }

    serde_json::from_value(value).context("parse licguard report")
}

pub fn to_renderable(report: &LicguardReport) -> RenderableReport {
    RenderableReport::from(&report.result)
}

/// The stable code for an error: the engine's own code when there is one, else `runtime_error`.
pub fn error_code(err: &anyhow::Error) -> &'static str {
    if let Some(e) = err.downcast_ref::<LoadError>() {
        e.code()
    } else if let Some(e) = err.downcast_ref::<EngineError>() {
        e.code()
    } else {
        ids::CODE_RUNTIME_ERROR
    }
}

pub fn runtime_error_report(err: &anyhow::Error) -> ErrorReport {
    let now = OffsetDateTime::now_utc();
    ReportEnvelope {
        schema: SCHEMA_ERROR_V1.to_string(),
        tool: tool_meta(),
        started_at: now,
        finished_at: now,
        result: RunError {
            code: error_code(err).to_string(),
            message: format!("{err:#}"),
        },
    }
}

pub fn write_report<T: Serialize>(path: &Utf8Path, report: &ReportEnvelope<T>) -> anyhow::Result<()> {
    let data = serialize_report(report)?;
    write_bytes(path, &data).with_context(|| format!("write report: {path}"))
}

pub fn write_text(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    write_bytes(path, text.as_bytes()).with_context(|| format!("write text: {path}"))
}

fn write_bytes(path: &Utf8Path, data: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {parent}"))?;
    }
    std::fs::write(path, data)?;
    Ok(())
}
