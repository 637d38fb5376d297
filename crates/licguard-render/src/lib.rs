//! Rendering utilities for review surfaces (Markdown reports, checklists, tables).

#![forbid(unsafe_code)]

mod markdown;
mod model;

pub use markdown::{render_compat_table, render_markdown, render_obligation_checklist};
pub use model::{
    RenderableAction, RenderableCompatibility, RenderableDecision, RenderableObligation,
    RenderablePair, RenderableReport, RenderableVerdict,
};
