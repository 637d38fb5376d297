//! Rule matching and selection.

use crate::error::EngineError;
use crate::model::{License, LicenseKey};
use crate::policy::{Condition, DefaultDecision, Policy, Rule};
use crate::registry::Registry;
use licguard_types::{ids, Action, Decision, Lineage, Verdict};
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Resolved request attributes that conditions are evaluated against.
#[derive(Clone, Copy, Debug)]
pub struct Facts<'a> {
    /// Deduplicated and key-sorted.
    pub licenses: &'a [&'a License],
    pub context: &'a str,
    pub distribution: Option<&'a str>,
    pub attributes: &'a BTreeMap<String, String>,
    /// Overall transitive verdict for the license set.
    pub compatibility: Verdict,
}

enum Fault {
    NotFound(String),
    Malformed(String),
}

impl Fault {
    fn into_error(self, policy: &Policy, rule: &Rule) -> EngineError {
        match self {
            Fault::NotFound(id) => EngineError::not_found(&id),
            Fault::Malformed(reason) => EngineError::MalformedRule {
                policy: policy.name.clone(),
                rule_id: rule.id.clone(),
                reason,
            },
        }
    }
}

/// Evaluate a condition. `All`/`Any` visit every child so faults deep in the tree surface.
fn eval(condition: &Condition, registry: &Registry, facts: &Facts<'_>) -> Result<bool, Fault> {
    Ok(match condition {
        Condition::All(children) => {
            let mut result = true;
            for child in children {
                result &= eval(child, registry, facts)?;
            }
            result
        }
        Condition::Any(children) => {
            let mut result = false;
            for child in children {
                result |= eval(child, registry, facts)?;
            }
            result
        }
        Condition::Not(child) => !eval(child, registry, facts)?,
        Condition::LicenseCategory(category) => {
            facts.licenses.iter().any(|l| l.category == *category)
        }
        Condition::OnlyCategories(allowed) => {
            facts.licenses.iter().all(|l| allowed.contains(&l.category))
        }
        Condition::License(id) => {
            if !registry.contains(id) {
                return Err(Fault::NotFound(id.clone()));
            }
            let key = LicenseKey::new(id);
            facts.licenses.iter().any(|l| l.key == key)
        }
        Condition::LicenseMatches(pattern) => facts.licenses.iter().any(|l| pattern.is_match(&l.id)),
        Condition::Context(name) => {
            if name != facts.context && !registry.defines_context(name) {
                let known: Vec<&str> = registry.contexts().collect();
                return Err(Fault::Malformed(format!(
                    "condition `context = \"{name}\"` names a context the dataset does not define \
                     (known: {})",
                    known.join(", ")
                )));
            }
            facts.context == name
        }
        Condition::Distribution(name) => match facts.distribution {
            Some(actual) => actual == name,
            None => {
                return Err(Fault::Malformed(format!(
                    "condition `distribution = \"{name}\"` needs a request distribution"
                )));
            }
        },
        Condition::Compatibility(verdict) => facts.compatibility == *verdict,
        Condition::Attribute { name, equals } => match facts.attributes.get(name) {
            Some(actual) => actual == equals,
            None => {
                return Err(Fault::Malformed(format!(
                    "attribute '{name}' is not defined on the request"
                )));
            }
        },
    })
}

/// Whether `rule` matches the facts, with faults attributed to the rule.
pub fn matches(
    registry: &Registry,
    policy: &Policy,
    rule: &Rule,
    facts: &Facts<'_>,
) -> Result<bool, EngineError> {
    eval(&rule.condition, registry, facts).map_err(|fault| fault.into_error(policy, rule))
}

/// Select the winning rule across the composed policies, or fall back to `default`.
///
/// Order: priority descending, then deny > warn > allow, then policy order, then rule order.
/// Every rule is evaluated; the first fault aborts the call.
pub fn select(
    registry: &Registry,
    facts: &Facts<'_>,
    policies: &[Arc<Policy>],
    default: DefaultDecision,
) -> Result<Decision, EngineError> {
    let mut winner: Option<(&Policy, &Rule, (Reverse<i32>, Reverse<u8>, usize, usize))> = None;

    for (pi, policy) in policies.iter().enumerate() {
        let policy: &Policy = policy;
        for (ri, rule) in policy.rules.iter().enumerate() {
            if !matches(registry, policy, rule, facts)? {
                continue;
            }
            let rank = (Reverse(rule.priority), Reverse(rule.action.rank()), pi, ri);
            tracing::debug!(policy = %policy.name, rule = %rule.id, "rule matched");
            if winner.as_ref().is_none_or(|(_, _, best)| rank < *best) {
                winner = Some((policy, rule, rank));
            }
        }
    }

    let decision = match winner {
        Some((policy, rule, _)) => Decision {
            action: rule.action,
            rule_id: rule.id.clone(),
            policy: Some(policy.name.clone()),
            message: render_message(&rule.message, rule.action, &rule.id, Some(&policy.name), facts),
            lineage: Lineage::PolicyRule {
                policy: policy.name.clone(),
                rule_id: rule.id.clone(),
                priority: rule.priority,
            },
        },
        None => {
            let action = default.action();
            Decision {
                action,
                rule_id: ids::RULE_NO_APPLICABLE.to_string(),
                policy: None,
                message: render_message("", action, ids::RULE_NO_APPLICABLE, None, facts),
                lineage: Lineage::DefaultDecision,
            }
        }
    };
    tracing::debug!(action = %decision.action, rule = %decision.rule_id, "decision selected");
    Ok(decision)
}

/// Substitute `{rule}`, `{policy}`, `{context}`, `{distribution}`, `{licenses}` and
/// `{categories}`. Anything else in braces is left as written.
pub fn render_message(
    template: &str,
    action: Action,
    rule_id: &str,
    policy: Option<&str>,
    facts: &Facts<'_>,
) -> String {
    if template.trim().is_empty() {
        return format!("{action} by rule {rule_id}");
    }

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };
        let name = &after[..close];
        match placeholder(name, rule_id, policy, facts) {
            Some(value) => out.push_str(&value),
            None => {
                out.push('{');
                out.push_str(name);
                out.push('}');
            }
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    out
}

fn placeholder(name: &str, rule_id: &str, policy: Option<&str>, facts: &Facts<'_>) -> Option<String> {
    let value = match name {
        "rule" => rule_id.to_string(),
        "policy" => policy.unwrap_or("").to_string(),
        "context" => facts.context.to_string(),
        "distribution" => facts.distribution.unwrap_or("").to_string(),
        "licenses" => facts
            .licenses
            .iter()
            .map(|l| l.id.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        "categories" => {
            let mut cats: Vec<&str> = facts.licenses.iter().map(|l| l.category.as_str()).collect();
            cats.sort_unstable();
            cats.dedup();
            cats.join(", ")
        }
        _ => return None,
    };
    Some(value)
}
