//! The `batch` use case: evaluate many requests on a worker pool.

use crate::report::envelope;
use crate::session::Session;
use anyhow::Context;
use camino::Utf8Path;
use licguard_domain::EvaluationRequest;
use licguard_settings::BatchFileV1;
use licguard_types::{
    Action, BatchData, BatchEntry, BatchOutcome, BatchReport, RunError, SCHEMA_BATCH_V1,
};
use std::num::NonZeroUsize;
use time::OffsetDateTime;

/// Parse a batch file by extension: `.json`, otherwise TOML.
pub fn parse_batch_file(path: &Utf8Path, text: &str) -> anyhow::Result<BatchFileV1> {
    if path.extension() == Some("json") {
        let file: BatchFileV1 =
            serde_json::from_str(text).with_context(|| format!("parse batch file {path}"))?;
        licguard_settings::check_batch_schema(&file)?;
        Ok(file)
    } else {
        licguard_settings::parse_batch_toml(text).with_context(|| format!("parse batch file {path}"))
    }
}

/// Evaluate every request in `file`. A failing request becomes an error entry; the rest still run.
pub fn run_batch(session: &Session, file: BatchFileV1) -> anyhow::Result<BatchReport> {
    let started_at = OffsetDateTime::now_utc();

    let requests: Vec<EvaluationRequest> = file
        .requests
        .into_iter()
        .map(|r| {
            let mut request = session.request(
                r.licenses,
                r.context.as_deref(),
                r.distribution.as_deref(),
                r.attributes,
            );
            request.id = r.id;
            request
        })
        .collect();

    let jobs = session.resolved.jobs.unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1)
    });

    tracing::info!(requests = requests.len(), jobs, "batch started");
    let items = session
        .engine
        .evaluate_batch(&requests, jobs)
        .into_iter()
        .map(|item| BatchEntry {
            index: item.index,
            request_id: item.request_id,
            outcome: match item.result {
                Ok(result) => BatchOutcome::Ok(result),
                Err(err) => {
                    tracing::warn!(index = item.index, error = %err, "batch request failed");
                    BatchOutcome::Error(RunError {
                        code: err.code().to_string(),
                        message: err.to_string(),
                    })
                }
            },
        })
        .collect();

    Ok(envelope(SCHEMA_BATCH_V1, started_at, BatchData { jobs, items }))
}

/// 1 if any request failed, else 2 if any was denied, else 0.
pub fn batch_exit_code(data: &BatchData) -> i32 {
    let mut code = 0;
    for item in &data.items {
        match &item.outcome {
            BatchOutcome::Error(_) => return 1,
            BatchOutcome::Ok(r) if r.decision.action == Action::Deny => code = 2,
            BatchOutcome::Ok(_) => {}
        }
    }
    code
}
