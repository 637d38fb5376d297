use crate::model::{ConditionConfig, PolicyFileV1, RuleConfig};
use anyhow::Context;
use licguard_domain::LoadError;
use licguard_domain::policy::{Condition, Pattern, Policy, Rule};
use licguard_types::{Action, Category, Verdict};

pub const POLICY_SCHEMA_V1: &str = "licguard.policy.v1";

/// Convert a parsed policy file into a validated domain policy.
pub fn resolve_policy(file: PolicyFileV1) -> anyhow::Result<Policy> {
    if let Some(schema) = file.schema.as_deref()
        && schema != POLICY_SCHEMA_V1
    {
        anyhow::bail!("unsupported policy schema: {schema} (expected {POLICY_SCHEMA_V1})");
    }

    let mut rules = Vec::with_capacity(file.rules.len());
    for rule in &file.rules {
        rules.push(
            resolve_rule(&file.name, rule)
                .with_context(|| format!("policy '{}', rule '{}'", file.name, rule.id))?,
        );
    }

    let policy = Policy::new(&file.name, &file.version, rules)?;
    Ok(policy)
}

fn resolve_rule(policy: &str, cfg: &RuleConfig) -> anyhow::Result<Rule> {
    let action = parse_action(&cfg.action)?;
    let condition = resolve_condition(&cfg.when).map_err(|err| match err {
        ConditionError::Glob(pattern, source) => anyhow::Error::new(LoadError::InvalidRule {
            policy: policy.to_string(),
            rule_id: cfg.id.clone(),
            reason: format!("invalid glob '{pattern}': {source}"),
        }),
        ConditionError::Other(err) => err,
    })?;

    let mut rule = Rule::new(&cfg.id, action, condition).with_priority(cfg.priority);
    if let Some(message) = cfg.message.as_deref() {
        rule = rule.with_message(message);
    }
    Ok(rule)
}

enum ConditionError {
    Glob(String, globset::Error),
    Other(anyhow::Error),
}

impl From<anyhow::Error> for ConditionError {
    fn from(err: anyhow::Error) -> Self {
        ConditionError::Other(err)
    }
}

fn resolve_condition(cfg: &ConditionConfig) -> Result<Condition, ConditionError> {
    Ok(match cfg {
        ConditionConfig::All(children) => Condition::All(resolve_children(children)?),
        ConditionConfig::Any(children) => Condition::Any(resolve_children(children)?),
        ConditionConfig::Not(child) => Condition::not(resolve_condition(child)?),
        ConditionConfig::LicenseCategory(c) => Condition::LicenseCategory(parse_category(c)?),
        ConditionConfig::OnlyCategories(cs) => {
            let mut set = std::collections::BTreeSet::new();
            for c in cs {
                set.insert(parse_category(c)?);
            }
            Condition::OnlyCategories(set)
        }
        ConditionConfig::License(id) => Condition::License(id.clone()),
        ConditionConfig::LicenseMatches(glob) => Condition::LicenseMatches(
            Pattern::new(glob).map_err(|e| ConditionError::Glob(glob.clone(), e))?,
        ),
        ConditionConfig::Context(c) => Condition::Context(c.clone()),
        ConditionConfig::Distribution(d) => Condition::Distribution(d.clone()),
        ConditionConfig::Compatibility(v) => Condition::Compatibility(parse_verdict(v)?),
        ConditionConfig::Attribute { name, equals } => Condition::Attribute {
            name: name.clone(),
            equals: equals.clone(),
        },
    })
}

fn resolve_children(children: &[ConditionConfig]) -> Result<Vec<Condition>, ConditionError> {
    children.iter().map(resolve_condition).collect()
}

pub(crate) fn parse_action(v: &str) -> anyhow::Result<Action> {
    Action::parse(v).with_context(|| format!("unknown action: {v} (expected allow|warn|deny)"))
}

fn parse_category(v: &str) -> anyhow::Result<Category> {
    Category::parse(v).with_context(|| {
        format!(
            "unknown category: {v} (expected permissive|weak-copyleft|strong-copyleft|proprietary|public-domain|unknown)"
        )
    })
}

fn parse_verdict(v: &str) -> anyhow::Result<Verdict> {
    Verdict::parse(v).with_context(|| {
        format!("unknown verdict: {v} (expected compatible|conditional|incompatible)")
    })
}
