//! The single-request use cases: evaluate, compat, obligations.

use crate::report::envelope;
use crate::session::Session;
use licguard_types::{
    Action, CompatReport, LicguardReport, ObligationsData, ObligationsReport, SCHEMA_COMPAT_V1,
    SCHEMA_OBLIGATIONS_V1, SCHEMA_REPORT_V1, Verdict,
};
use std::collections::BTreeMap;
use time::OffsetDateTime;

/// Input for the evaluate use case. Unset fields fall back to the session's config.
#[derive(Clone, Debug, Default)]
pub struct EvaluateInput {
    pub id: Option<String>,
    pub licenses: Vec<String>,
    pub context: Option<String>,
    pub distribution: Option<String>,
    pub attributes: BTreeMap<String, String>,
}

impl EvaluateInput {
    pub fn new<I, S>(licenses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            licenses: licenses.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_context(mut self, context: &str) -> Self {
        self.context = Some(context.to_string());
        self
    }

    pub fn with_distribution(mut self, distribution: &str) -> Self {
        self.distribution = Some(distribution.to_string());
        self
    }

    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }
}

/// Evaluate one license set under the session's composed policies.
pub fn run_evaluate(session: &Session, input: EvaluateInput) -> anyhow::Result<LicguardReport> {
    let started_at = OffsetDateTime::now_utc();

    let mut request = session.request(
        input.licenses,
        input.context.as_deref(),
        input.distribution.as_deref(),
        input.attributes,
    );
    request.id = input.id;

    let result = session.engine.evaluate(&request)?;
    tracing::info!(
        action = %result.decision.action,
        rule = %result.decision.rule_id,
        compatibility = %result.compatibility.overall,
        "evaluated"
    );
    Ok(envelope(SCHEMA_REPORT_V1, started_at, result))
}

/// Pairwise compatibility over a license set. Policies are not consulted.
pub fn run_compat(
    session: &Session,
    licenses: &[String],
    context: Option<&str>,
) -> anyhow::Result<CompatReport> {
    let started_at = OffsetDateTime::now_utc();
    let report = session
        .engine
        .check_set(licenses, &session.context(context))?;
    Ok(envelope(SCHEMA_COMPAT_V1, started_at, report))
}

/// The merged obligation checklist for a license set.
pub fn run_obligations(session: &Session, licenses: &[String]) -> anyhow::Result<ObligationsReport> {
    let started_at = OffsetDateTime::now_utc();
    let resolved = session
        .engine
        .registry()
        .resolve_set(licenses)?
        .into_iter()
        .map(|l| l.id.clone())
        .collect();
    let obligations = session.engine.obligations(licenses)?;
    Ok(envelope(
        SCHEMA_OBLIGATIONS_V1,
        started_at,
        ObligationsData {
            licenses: resolved,
            obligations,
        },
    ))
}

/// Map a decision to an exit code: 0 = allow/warn, 2 = deny.
pub fn action_exit_code(action: Action) -> i32 {
    match action {
        Action::Allow => 0,
        Action::Warn => 0,
        Action::Deny => 2,
    }
}

/// Map a compatibility verdict to an exit code: 0 = compatible/conditional, 2 = incompatible.
pub fn verdict_exit_code(verdict: Verdict) -> i32 {
    match verdict {
        Verdict::Compatible => 0,
        Verdict::Conditional => 0,
        Verdict::Incompatible => 2,
    }
}
