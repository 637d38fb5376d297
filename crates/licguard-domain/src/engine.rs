use crate::compat;
use crate::error::EngineError;
use crate::fingerprint::fingerprint_for_request;
use crate::matcher::{self, Facts};
use crate::obligations;
use crate::policy::{DefaultDecision, Policy};
use crate::registry::Registry;
use licguard_types::{CompatibilityReport, EvaluationResult, ObligationResult, PairVerdict};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;

/// One evaluation request. Policies and the default decision travel with the request.
#[derive(Clone, Debug)]
pub struct EvaluationRequest {
    /// Correlates batch items; not part of the fingerprint.
    pub id: Option<String>,
    pub licenses: Vec<String>,
    pub context: String,
    pub distribution: Option<String>,
    pub attributes: BTreeMap<String, String>,
    /// Composition order matters for tie-breaking.
    pub policies: Vec<Arc<Policy>>,
    pub default_decision: DefaultDecision,
}

impl EvaluationRequest {
    pub fn new<I, S>(licenses: I, context: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: None,
            licenses: licenses.into_iter().map(Into::into).collect(),
            context: context.to_string(),
            distribution: None,
            attributes: BTreeMap::new(),
            policies: Vec::new(),
            default_decision: DefaultDecision::default(),
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
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

    pub fn with_policy(mut self, policy: Arc<Policy>) -> Self {
        self.policies.push(policy);
        self
    }

    pub fn with_policies(mut self, policies: impl IntoIterator<Item = Arc<Policy>>) -> Self {
        self.policies.extend(policies);
        self
    }

    pub fn with_default_decision(mut self, default_decision: DefaultDecision) -> Self {
        self.default_decision = default_decision;
        self
    }
}

/// Outcome of one request in a batch, in request order.
#[derive(Debug)]
pub struct BatchItem {
    pub index: usize,
    pub request_id: Option<String>,
    pub result: Result<EvaluationResult, EngineError>,
}

/// Stateless orchestrator over a shared registry.
#[derive(Clone, Debug)]
pub struct Engine {
    registry: Arc<Registry>,
}

impl Engine {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Resolve ids, fold compatibility, select a decision, and merge obligations.
    pub fn evaluate(&self, request: &EvaluationRequest) -> Result<EvaluationResult, EngineError> {
        let registry = self.registry.as_ref();
        let licenses = registry.resolve_set(&request.licenses)?;

        let compatibility =
            compat::transitive_resolved(registry.compatibility(), &licenses, &request.context);

        let facts = Facts {
            licenses: &licenses,
            context: &request.context,
            distribution: request.distribution.as_deref(),
            attributes: &request.attributes,
            compatibility: compatibility.overall,
        };
        let decision =
            matcher::select(registry, &facts, &request.policies, request.default_decision)?;

        let obligations = obligations::aggregate_resolved(registry, &licenses)?;

        tracing::debug!(
            request = request.id.as_deref().unwrap_or("-"),
            licenses = licenses.len(),
            compatibility = %compatibility.overall,
            action = %decision.action,
            obligations = obligations.len(),
            "request evaluated"
        );

        Ok(EvaluationResult {
            request_id: request.id.clone(),
            licenses: licenses.iter().map(|l| l.id.clone()).collect(),
            context: request.context.clone(),
            distribution: request.distribution.clone(),
            decision,
            compatibility,
            obligations,
            fingerprint: fingerprint_for_request(request),
        })
    }

    pub fn check_compatibility(
        &self,
        a: &str,
        b: &str,
        context: &str,
    ) -> Result<PairVerdict, EngineError> {
        compat::pairwise(&self.registry, a, b, context)
    }

    pub fn check_set<S: AsRef<str>>(
        &self,
        ids: &[S],
        context: &str,
    ) -> Result<CompatibilityReport, EngineError> {
        compat::transitive(&self.registry, ids, context)
    }

    pub fn obligations<S: AsRef<str>>(
        &self,
        ids: &[S],
    ) -> Result<Vec<ObligationResult>, EngineError> {
        obligations::aggregate(&self.registry, ids)
    }

    /// Evaluate requests on a pool of `jobs` workers. Output order matches input order.
    ///
    /// A failing request does not affect the others.
    pub fn evaluate_batch(&self, requests: &[EvaluationRequest], jobs: usize) -> Vec<BatchItem> {
        let run = |(index, request): (usize, &EvaluationRequest)| BatchItem {
            index,
            request_id: request.id.clone(),
            result: self.evaluate(request),
        };

        match rayon::ThreadPoolBuilder::new()
            .num_threads(jobs.max(1))
            .build()
        {
            Ok(pool) => pool.install(|| requests.par_iter().enumerate().map(run).collect()),
            Err(err) => {
                tracing::warn!(error = %err, "failed to build worker pool; evaluating sequentially");
                requests.iter().enumerate().map(run).collect()
            }
        }
    }
}
