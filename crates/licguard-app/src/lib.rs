//! Use case orchestration for licguard.
//!
//! This crate provides the application layer: use cases that coordinate the settings, data,
//! domain, and render layers. It is intentionally thin and delegates heavy lifting to them.
//!
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod batch;
mod evaluate;
mod explain;
mod init;
mod matrix;
mod render;
mod report;
mod session;

pub use batch::{batch_exit_code, parse_batch_file, run_batch};
pub use evaluate::{
    action_exit_code, run_compat, run_evaluate, run_obligations, verdict_exit_code, EvaluateInput,
};
pub use explain::{format_explanation, format_not_found, run_explain, ExplainOutput};
pub use init::{run_init, InitOutput, CONFIG_FILE, DEFAULT_POLICY_FILE};
pub use matrix::{run_split_matrix, SplitMatrixInput};
pub use render::{
    render_compat_markdown, render_markdown, render_obligations_markdown, run_markdown,
};
pub use report::{
    error_code, parse_evaluation_report, runtime_error_report, serialize_report, to_renderable,
    write_report, write_text,
};
pub use session::{open_session, Session, SessionInput};

#[cfg(test)]
mod test_support;
