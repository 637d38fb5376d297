//! Stable identifiers for error codes, synthetic rules, and well-known contexts.
//!
//! Codes are short snake_case discriminators; they are what `licguard explain` accepts.

// Codes: load-time data integrity
pub const CODE_DUPLICATE_ID: &str = "duplicate_id";
pub const CODE_UNKNOWN_CATEGORY: &str = "unknown_category";
pub const CODE_UNKNOWN_OBLIGATION: &str = "unknown_obligation";
pub const CODE_UNKNOWN_LICENSE: &str = "unknown_license";
pub const CODE_CONFLICTING_COMPATIBILITY: &str = "conflicting_compatibility";
pub const CODE_INVALID_RULE: &str = "invalid_rule";

// Codes: per-call evaluation
pub const CODE_NOT_FOUND: &str = "not_found";
pub const CODE_MALFORMED_RULE: &str = "malformed_rule";
pub const CODE_CONFLICTING_OBLIGATION: &str = "conflicting_obligation";

// Codes: lineage markers surfaced in results
pub const CODE_NO_APPLICABLE_RULE: &str = "no_applicable_rule";
pub const CODE_NO_COMPATIBILITY_RULE: &str = "no_compatibility_rule";

// Synthetic rule id used when no policy rule matches.
pub const RULE_NO_APPLICABLE: &str = "no-applicable-rule";

pub const REASON_NO_EXPLICIT_RULE: &str = "no explicit rule — manual review required";
pub const REASON_SAME_LICENSE: &str = "a license is compatible with itself";

// Well-known contexts
pub const CONTEXT_STATIC_LINKING: &str = "static_linking";
pub const CONTEXT_DYNAMIC_LINKING: &str = "dynamic_linking";
pub const CONTEXT_DISTRIBUTION: &str = "distribution";

// Tool-level
pub const CODE_RUNTIME_ERROR: &str = "runtime_error";
