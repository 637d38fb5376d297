use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse license classification. The set is closed.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Permissive,
    WeakCopyleft,
    StrongCopyleft,
    Proprietary,
    PublicDomain,
    Unknown,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Permissive,
        Category::WeakCopyleft,
        Category::StrongCopyleft,
        Category::Proprietary,
        Category::PublicDomain,
        Category::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Permissive => "permissive",
            Category::WeakCopyleft => "weak-copyleft",
            Category::StrongCopyleft => "strong-copyleft",
            Category::Proprietary => "proprietary",
            Category::PublicDomain => "public-domain",
            Category::Unknown => "unknown",
        }
    }

    /// Parse a category name. Accepts kebab-case and snake_case, any ASCII case.
    pub fn parse(value: &str) -> Option<Category> {
        let normalized = value.trim().to_ascii_lowercase().replace('_', "-");
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a compatibility check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Compatible,
    Conditional,
    Incompatible,
}

impl Verdict {
    /// incompatible > conditional > compatible
    pub fn rank(&self) -> u8 {
        match self {
            Verdict::Compatible => 0,
            Verdict::Conditional => 1,
            Verdict::Incompatible => 2,
        }
    }

    /// Fold two verdicts; the less compatible one wins.
    pub fn fold(self, other: Verdict) -> Verdict {
        if other.rank() > self.rank() { other } else { self }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Compatible => "compatible",
            Verdict::Conditional => "conditional",
            Verdict::Incompatible => "incompatible",
        }
    }

    pub fn parse(value: &str) -> Option<Verdict> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compatible" => Some(Verdict::Compatible),
            "conditional" => Some(Verdict::Conditional),
            "incompatible" => Some(Verdict::Incompatible),
            _ => None,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Policy decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Allow,
    Warn,
    Deny,
}

impl Action {
    /// deny > warn > allow: the safer outcome ranks higher.
    pub fn rank(&self) -> u8 {
        match self {
            Action::Allow => 0,
            Action::Warn => 1,
            Action::Deny => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Allow => "allow",
            Action::Warn => "warn",
            Action::Deny => "deny",
        }
    }

    pub fn parse(value: &str) -> Option<Action> {
        match value.trim().to_ascii_lowercase().as_str() {
            "allow" => Some(Action::Allow),
            "warn" | "warning" => Some(Action::Warn),
            "deny" => Some(Action::Deny),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which rule or matrix entry produced a part of a result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Lineage {
    /// Identifier-pair override, licenses as declared in the data.
    PairOverride {
        context: String,
        licenses: [String; 2],
    },
    /// Category-pair default, categories as declared in the data.
    CategoryDefault {
        context: String,
        categories: [Category; 2],
    },
    /// Neither an override nor a category default exists.
    NoRule { context: String },
    /// A license checked against itself.
    Identity,
    /// Overall verdict; points at the first pair carrying the dominating verdict.
    Fold {
        #[serde(skip_serializing_if = "Option::is_none")]
        pair: Option<[String; 2]>,
    },
    PolicyRule {
        policy: String,
        rule_id: String,
        priority: i32,
    },
    /// No rule matched; the request's default action applied.
    DefaultDecision,
    Obligation { obligation_ids: Vec<String> },
}

/// Result of a pairwise compatibility check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PairVerdict {
    /// Canonical ids, sorted, so `(A, B)` and `(B, A)` report identically.
    pub licenses: [String; 2],
    pub context: String,
    pub verdict: Verdict,
    pub reason: String,
    pub lineage: Lineage,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CompatibilityReport {
    pub context: String,
    pub overall: Verdict,
    pub pairs: Vec<PairVerdict>,
    pub lineage: Lineage,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Decision {
    pub action: Action,
    pub rule_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<String>,
    pub message: String,
    pub lineage: Lineage,
}

/// One merged checklist entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ObligationResult {
    pub merge_key: String,
    pub text: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    /// Contributing license ids, sorted.
    pub licenses: Vec<String>,
    pub lineage: Lineage,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EvaluationResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub licenses: Vec<String>,
    pub context: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution: Option<String>,
    pub decision: Decision,
    pub compatibility: CompatibilityReport,
    pub obligations: Vec<ObligationResult>,
    /// SHA-256 over the normalized request; stable across runs.
    pub fingerprint: String,
}
