use crate::error::LoadError;
use globset::{GlobBuilder, GlobMatcher};
use licguard_types::{Action, Category, Verdict};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

/// Compiled, case-insensitive glob over license ids.
#[derive(Clone)]
pub struct Pattern {
    source: String,
    matcher: GlobMatcher,
}

impl Pattern {
    pub fn new(source: &str) -> Result<Self, globset::Error> {
        let matcher = GlobBuilder::new(source)
            .case_insensitive(true)
            .literal_separator(false)
            .build()?
            .compile_matcher();
        Ok(Self {
            source: source.to_string(),
            matcher,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, id: &str) -> bool {
        self.matcher.is_match(id)
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.source).finish()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// Boolean expression over request attributes.
#[derive(Clone, Debug, PartialEq)]
pub enum Condition {
    All(Vec<Condition>),
    Any(Vec<Condition>),
    Not(Box<Condition>),
    /// Some license in the request has this category.
    LicenseCategory(Category),
    /// Every license in the request has one of these categories.
    OnlyCategories(BTreeSet<Category>),
    /// The identifier is present in the request.
    License(String),
    /// Some identifier in the request matches the glob.
    LicenseMatches(Pattern),
    Context(String),
    /// Requires the request to carry a distribution channel.
    Distribution(String),
    /// Overall transitive compatibility verdict equals this one.
    Compatibility(Verdict),
    /// Free-form request attribute; must be defined on the request.
    Attribute { name: String, equals: String },
}

impl Condition {
    pub fn all(children: Vec<Condition>) -> Self {
        Condition::All(children)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(child: Condition) -> Self {
        Condition::Not(Box::new(child))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Rule {
    pub id: String,
    /// Higher is evaluated first.
    pub priority: i32,
    pub condition: Condition,
    pub action: Action,
    /// Message template; see `matcher::render_message` for placeholders.
    pub message: String,
}

impl Rule {
    pub fn new(id: &str, action: Action, condition: Condition) -> Self {
        Self {
            id: id.to_string(),
            priority: 0,
            condition,
            action,
            message: String::new(),
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_message(mut self, message: &str) -> Self {
        self.message = message.to_string();
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Policy {
    pub name: String,
    pub version: String,
    pub rules: Vec<Rule>,
}

impl Policy {
    /// Build a policy, running static validation.
    pub fn new(name: &str, version: &str, rules: Vec<Rule>) -> Result<Self, LoadError> {
        let policy = Self {
            name: name.to_string(),
            version: version.to_string(),
            rules,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Checks that do not depend on a request: rule ids are present and unique.
    ///
    /// Attribute existence is request-dependent and checked at evaluation time.
    pub fn validate(&self) -> Result<(), LoadError> {
        let mut seen = HashSet::new();
        for rule in &self.rules {
            if rule.id.trim().is_empty() {
                return Err(LoadError::InvalidRule {
                    policy: self.name.clone(),
                    rule_id: rule.id.clone(),
                    reason: "rule id must not be empty".to_string(),
                });
            }
            if !seen.insert(rule.id.as_str()) {
                return Err(LoadError::InvalidRule {
                    policy: self.name.clone(),
                    rule_id: rule.id.clone(),
                    reason: "duplicate rule id".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Decision applied when no rule matches. Part of each request, never global.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DefaultDecision {
    #[default]
    Allow,
    Deny,
}

impl DefaultDecision {
    pub fn action(&self) -> Action {
        match self {
            DefaultDecision::Allow => Action::Allow,
            DefaultDecision::Deny => Action::Deny,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.action().as_str()
    }
}
