use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `licguard.toml` schema v1.
///
/// This is a *user-facing* config model: it is intentionally permissive so forward-compat is easy.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LicguardConfigV1 {
    /// Optional schema string for tooling (`licguard.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// `strict`, `standard` (default) or `open`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// Action when no rule matches: `allow` or `deny`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_decision: Option<String>,

    /// Default usage context, e.g. `static_linking`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// Default distribution channel, e.g. `mobile`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution: Option<String>,

    /// Dataset directory, relative to the config file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<String>,

    /// Policy files composed after the profile's built-in policies, in order.
    #[serde(default)]
    pub policies: Vec<String>,

    /// Worker count for batch evaluation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jobs: Option<usize>,
}

/// Policy file schema v1.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PolicyFileV1 {
    /// Optional schema string (`licguard.policy.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    pub name: String,

    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

fn default_version() -> String {
    "1".to_string()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RuleConfig {
    pub id: String,

    /// Higher is evaluated first.
    #[serde(default)]
    pub priority: i32,

    /// `allow`, `warn` or `deny`.
    pub action: String,

    /// Message template with `{rule}`, `{policy}`, `{context}`, `{distribution}`,
    /// `{licenses}` and `{categories}` placeholders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    pub when: ConditionConfig,
}

/// Condition tree. Each node is a single-key table, e.g. `{ license_category = "permissive" }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConditionConfig {
    All(Vec<ConditionConfig>),
    Any(Vec<ConditionConfig>),
    Not(Box<ConditionConfig>),
    LicenseCategory(String),
    OnlyCategories(Vec<String>),
    License(String),
    LicenseMatches(String),
    Context(String),
    Distribution(String),
    Compatibility(String),
    Attribute { name: String, equals: String },
}

/// Batch input file schema v1 (TOML or JSON).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BatchFileV1 {
    /// Optional schema string (`licguard.batch-input.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    #[serde(default)]
    pub requests: Vec<BatchRequestV1>,
}

/// One request in a batch file. Unset fields fall back to the resolved config.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BatchRequestV1 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub licenses: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution: Option<String>,

    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}
