use licguard_types::{Action, CompatibilityReport, EvaluationResult, ObligationResult, Verdict};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableAction {
    Allow,
    Warn,
    Deny,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableVerdict {
    Compatible,
    Conditional,
    Incompatible,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableDecision {
    pub action: RenderableAction,
    pub rule_id: String,
    pub policy: Option<String>,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderablePair {
    pub licenses: [String; 2],
    pub verdict: RenderableVerdict,
    pub reason: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableCompatibility {
    pub context: String,
    pub overall: RenderableVerdict,
    pub pairs: Vec<RenderablePair>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableObligation {
    pub merge_key: String,
    pub text: String,
    pub required: bool,
    pub priority: Option<i32>,
    pub licenses: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableReport {
    pub licenses: Vec<String>,
    pub context: String,
    pub distribution: Option<String>,
    pub decision: RenderableDecision,
    pub compatibility: RenderableCompatibility,
    pub obligations: Vec<RenderableObligation>,
    pub fingerprint: String,
}

impl From<Action> for RenderableAction {
    fn from(a: Action) -> Self {
        match a {
            Action::Allow => RenderableAction::Allow,
            Action::Warn => RenderableAction::Warn,
            Action::Deny => RenderableAction::Deny,
        }
    }
}

impl From<Verdict> for RenderableVerdict {
    fn from(v: Verdict) -> Self {
        match v {
            Verdict::Compatible => RenderableVerdict::Compatible,
            Verdict::Conditional => RenderableVerdict::Conditional,
            Verdict::Incompatible => RenderableVerdict::Incompatible,
        }
    }
}

impl From<&CompatibilityReport> for RenderableCompatibility {
    fn from(r: &CompatibilityReport) -> Self {
        RenderableCompatibility {
            context: r.context.clone(),
            overall: r.overall.into(),
            pairs: r
                .pairs
                .iter()
                .map(|p| RenderablePair {
                    licenses: p.licenses.clone(),
                    verdict: p.verdict.into(),
                    reason: p.reason.clone(),
                })
                .collect(),
        }
    }
}

impl From<&ObligationResult> for RenderableObligation {
    fn from(o: &ObligationResult) -> Self {
        RenderableObligation {
            merge_key: o.merge_key.clone(),
            text: o.text.clone(),
            required: o.required,
            priority: o.priority,
            licenses: o.licenses.clone(),
        }
    }
}

impl From<&EvaluationResult> for RenderableReport {
    fn from(r: &EvaluationResult) -> Self {
        RenderableReport {
            licenses: r.licenses.clone(),
            context: r.context.clone(),
            distribution: r.distribution.clone(),
            decision: RenderableDecision {
                action: r.decision.action.into(),
                rule_id: r.decision.rule_id.clone(),
                policy: r.decision.policy.clone(),
                message: r.decision.message.clone(),
            },
            compatibility: (&r.compatibility).into(),
            obligations: r.obligations.iter().map(Into::into).collect(),
            fingerprint: r.fingerprint.clone(),
        }
    }
}
