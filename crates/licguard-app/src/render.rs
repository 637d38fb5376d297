//! Render use cases: Markdown from in-memory or on-disk evaluation reports.

use crate::report::{parse_evaluation_report, to_renderable};
use licguard_render::{RenderableCompatibility, RenderableObligation};
use licguard_types::{CompatReport, LicguardReport, ObligationsReport};

pub fn render_markdown(report: &LicguardReport) -> String {
    licguard_render::render_markdown(&to_renderable(report))
}

pub fn render_compat_markdown(report: &CompatReport) -> String {
    licguard_render::render_compat_table(&RenderableCompatibility::from(&report.result))
}

pub fn render_obligations_markdown(report: &ObligationsReport) -> String {
    let items: Vec<RenderableObligation> =
        report.result.obligations.iter().map(Into::into).collect();
    licguard_render::render_obligation_checklist(&items)
}

/// Parse a report written by `licguard evaluate` and render it.
pub fn run_markdown(report_text: &str) -> anyhow::Result<String> {
    let report = parse_evaluation_report(report_text)?;
    Ok(render_markdown(&report))
}
