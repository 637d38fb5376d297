//! Error taxonomy for the engine.
//!
//! `LoadError` aborts registry or policy construction. `EngineError` aborts a single call.

use licguard_types::{ids, Verdict};
use thiserror::Error;

/// Load-time data integrity faults.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("duplicate {kind} id '{id}'")]
    DuplicateId { kind: &'static str, id: String },

    #[error("unknown category '{category}' on {owner}")]
    UnknownCategory { owner: String, category: String },

    #[error("license '{license}' references unknown obligation '{obligation}'")]
    UnknownObligation { license: String, obligation: String },

    #[error("compatibility entry in context '{context}' references unknown license '{license}'")]
    UnknownLicense { context: String, license: String },

    #[error(
        "conflicting compatibility entries for {subject} in context '{context}': {first} vs {second}"
    )]
    ConflictingCompatibility {
        context: String,
        subject: String,
        first: Verdict,
        second: Verdict,
    },

    #[error("invalid rule '{rule_id}' in policy '{policy}': {reason}")]
    InvalidRule {
        policy: String,
        rule_id: String,
        reason: String,
    },
}

impl LoadError {
    pub fn code(&self) -> &'static str {
        match self {
            LoadError::DuplicateId { .. } => ids::CODE_DUPLICATE_ID,
            LoadError::UnknownCategory { .. } => ids::CODE_UNKNOWN_CATEGORY,
            LoadError::UnknownObligation { .. } => ids::CODE_UNKNOWN_OBLIGATION,
            LoadError::UnknownLicense { .. } => ids::CODE_UNKNOWN_LICENSE,
            LoadError::ConflictingCompatibility { .. } => ids::CODE_CONFLICTING_COMPATIBILITY,
            LoadError::InvalidRule { .. } => ids::CODE_INVALID_RULE,
        }
    }
}

/// Per-call faults. Never downgraded to a default verdict.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("license '{id}' not found in registry")]
    NotFound { id: String },

    #[error("rule '{rule_id}' in policy '{policy}' cannot be evaluated: {reason}")]
    MalformedRule {
        policy: String,
        rule_id: String,
        reason: String,
    },

    #[error(
        "obligations '{first_id}' and '{second_id}' share merge key '{merge_key}' but disagree on text"
    )]
    ConflictingObligation {
        merge_key: String,
        first_id: String,
        first_text: String,
        second_id: String,
        second_text: String,
    },
}

impl EngineError {
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::NotFound { .. } => ids::CODE_NOT_FOUND,
            EngineError::MalformedRule { .. } => ids::CODE_MALFORMED_RULE,
            EngineError::ConflictingObligation { .. } => ids::CODE_CONFLICTING_OBLIGATION,
        }
    }

    pub(crate) fn not_found(id: &str) -> Self {
        EngineError::NotFound { id: id.to_string() }
    }
}
