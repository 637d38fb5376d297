//! Explain registry for error and lineage codes.
//!
//! Maps codes to human-readable explanations with remediation guidance.

use crate::ids;

/// Explanation entry for a code.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the code.
    pub title: &'static str,
    /// What the code means and when it is raised.
    pub description: &'static str,
    /// How to resolve it.
    pub remediation: &'static str,
    /// Before/after data examples.
    pub examples: ExamplePair,
}

/// Before and after data examples.
#[derive(Debug, Clone)]
pub struct ExamplePair {
    /// Data that raises the code.
    pub before: &'static str,
    /// Data that does not.
    pub after: &'static str,
}

/// Look up an explanation by code.
///
/// Returns `None` if the code is not recognized.
pub fn lookup_explanation(code: &str) -> Option<Explanation> {
    match code {
        ids::CODE_DUPLICATE_ID => Some(explain_duplicate_id()),
        ids::CODE_UNKNOWN_CATEGORY => Some(explain_unknown_category()),
        ids::CODE_UNKNOWN_OBLIGATION => Some(explain_unknown_obligation()),
        ids::CODE_UNKNOWN_LICENSE => Some(explain_unknown_license()),
        ids::CODE_CONFLICTING_COMPATIBILITY => Some(explain_conflicting_compatibility()),
        ids::CODE_INVALID_RULE => Some(explain_invalid_rule()),
        ids::CODE_NOT_FOUND => Some(explain_not_found()),
        ids::CODE_MALFORMED_RULE => Some(explain_malformed_rule()),
        ids::CODE_CONFLICTING_OBLIGATION => Some(explain_conflicting_obligation()),
        ids::CODE_NO_APPLICABLE_RULE => Some(explain_no_applicable_rule()),
        ids::CODE_NO_COMPATIBILITY_RULE => Some(explain_no_compatibility_rule()),
        _ => None,
    }
}

/// List all known codes.
pub fn all_codes() -> &'static [&'static str] {
    &[
        ids::CODE_DUPLICATE_ID,
        ids::CODE_UNKNOWN_CATEGORY,
        ids::CODE_UNKNOWN_OBLIGATION,
        ids::CODE_UNKNOWN_LICENSE,
        ids::CODE_CONFLICTING_COMPATIBILITY,
        ids::CODE_INVALID_RULE,
        ids::CODE_NOT_FOUND,
        ids::CODE_MALFORMED_RULE,
        ids::CODE_CONFLICTING_OBLIGATION,
        ids::CODE_NO_APPLICABLE_RULE,
        ids::CODE_NO_COMPATIBILITY_RULE,
    ]
}

// --- Load-time codes ---

fn explain_duplicate_id() -> Explanation {
    Explanation {
        title: "Duplicate Identifier",
        description: "\
Two license records (or two obligation records) share the same identifier.

License identifiers are compared case-insensitively, so `MIT` and `mit` collide.
The registry refuses to load rather than silently picking one of the records.",
        remediation: "\
Remove or rename one of the records. If both files describe the same license,
merge their obligations and compatibility entries into a single record.",
        examples: ExamplePair {
            before: r#"# licenses/mit.toml
id = "MIT"
category = "permissive"

# licenses/mit-copy.toml
id = "mit"
category = "permissive""#,
            after: r#"# licenses/mit.toml
id = "MIT"
category = "permissive""#,
        },
    }
}

fn explain_unknown_category() -> Explanation {
    Explanation {
        title: "Unknown Category",
        description: "\
A record names a license category outside the closed set:
permissive, weak-copyleft, strong-copyleft, proprietary, public-domain, unknown.

Categories drive the compatibility defaults and policy conditions, so an
unrecognized name cannot be mapped safely.",
        remediation: "\
Use one of the supported category names. If the license does not fit any of
them, classify it as `unknown` so it is reviewed manually.",
        examples: ExamplePair {
            before: r#"id = "GPL-3.0"
category = "copyleft""#,
            after: r#"id = "GPL-3.0"
category = "strong-copyleft""#,
        },
    }
}

fn explain_unknown_obligation() -> Explanation {
    Explanation {
        title: "Unknown Obligation Reference",
        description: "\
A license record references an obligation id that is not present in the
obligation table. The checklist for that license would silently miss a
requirement, so loading fails.",
        remediation: "\
Add the obligation to `obligations.toml`, or fix the reference in the license record.",
        examples: ExamplePair {
            before: r#"id = "MIT"
category = "permissive"
obligations = ["include-licence"]"#,
            after: r#"id = "MIT"
category = "permissive"
obligations = ["include-license"]"#,
        },
    }
}

fn explain_unknown_license() -> Explanation {
    Explanation {
        title: "Unknown License In Compatibility Data",
        description: "\
An identifier-pair override names a license that is not loaded in the registry.
Overrides for unknown licenses can never apply and usually indicate a typo.",
        remediation: "\
Add the missing license record, or correct the identifier in the override.",
        examples: ExamplePair {
            before: r#"[[rules]]
context = "static_linking"
licenses = ["GPL-2.0", "Apache2"]
verdict = "incompatible""#,
            after: r#"[[rules]]
context = "static_linking"
licenses = ["GPL-2.0", "Apache-2.0"]
verdict = "incompatible""#,
        },
    }
}

fn explain_conflicting_compatibility() -> Explanation {
    Explanation {
        title: "Conflicting Compatibility Entries",
        description: "\
The same pair (of licenses or of categories) is declared more than once in one
context with different verdicts. Pairs are unordered, so `(A, B)` and `(B, A)`
are the same entry.

Identical duplicates are accepted; contradictory ones abort loading because
either choice could overstate compatibility.",
        remediation: "\
Keep a single entry per pair and context. Decide which verdict is correct and
delete the other declaration.",
        examples: ExamplePair {
            before: r#"[[rules]]
context = "static_linking"
licenses = ["GPL-2.0", "Apache-2.0"]
verdict = "incompatible"

[[rules]]
context = "static_linking"
licenses = ["Apache-2.0", "GPL-2.0"]
verdict = "compatible""#,
            after: r#"[[rules]]
context = "static_linking"
licenses = ["GPL-2.0", "Apache-2.0"]
verdict = "incompatible""#,
        },
    }
}

fn explain_invalid_rule() -> Explanation {
    Explanation {
        title: "Invalid Policy Rule",
        description: "\
A policy rule failed static validation: an empty or duplicate rule id within a
policy, or a `license_matches` glob pattern that does not compile.",
        remediation: "\
Give every rule a unique, non-empty id and make sure glob patterns are valid.",
        examples: ExamplePair {
            before: r#"[[rules]]
id = "gpl"
action = "deny"
when = { license_matches = "GPL-[" }"#,
            after: r#"[[rules]]
id = "gpl"
action = "deny"
when = { license_matches = "GPL-*" }"#,
        },
    }
}

// --- Per-call codes ---

fn explain_not_found() -> Explanation {
    Explanation {
        title: "License Not Found",
        description: "\
A request (or a `license = ...` rule condition) references a license id that the
registry does not know. The engine never substitutes a default category for an
unknown license: the call fails instead.",
        remediation: "\
Check the spelling of the identifier (lookups are case-insensitive), or add a
license record for it to the dataset.",
        examples: ExamplePair {
            before: "licguard evaluate GPL3 --context static_linking",
            after: "licguard evaluate GPL-3.0 --context static_linking",
        },
    }
}

fn explain_malformed_rule() -> Explanation {
    Explanation {
        title: "Malformed Rule Condition",
        description: "\
A rule condition references an attribute that the request does not define, for
example `distribution = \"mobile\"` on a request without a distribution channel,
or `attribute = { name = \"tier\" }` without a `tier` attribute. A `context`
condition naming a context the dataset never declares is also malformed.

This is checked at evaluation time because attribute existence depends on the
request. The condition is never treated as false.",
        remediation: "\
Supply the missing attribute in the request (or a default `distribution` in
licguard.toml), fix the context name, or guard the rule so it only applies
where the attribute is meaningful.",
        examples: ExamplePair {
            before: "licguard evaluate GPL-3.0 --context static_linking",
            after: "licguard evaluate GPL-3.0 --context static_linking --distribution mobile",
        },
    }
}

fn explain_conflicting_obligation() -> Explanation {
    Explanation {
        title: "Conflicting Obligation Text",
        description: "\
Two obligations share a merge key but carry different requirement text. Merged
obligations must describe the same requirement; picking one text would risk
dropping a compliance obligation.",
        remediation: "\
Align the text of both obligations, or give them distinct merge keys if they
are genuinely different requirements.",
        examples: ExamplePair {
            before: r#"[[obligations]]
id = "mit-notice"
merge_key = "include_license"
text = "Include the license text."

[[obligations]]
id = "apache-notice"
merge_key = "include_license"
text = "Ship a copy of the license.""#,
            after: r#"[[obligations]]
id = "mit-notice"
merge_key = "include_license"
text = "Include the license text."

[[obligations]]
id = "apache-notice"
merge_key = "include_license"
text = "Include the license text.""#,
        },
    }
}

// --- Lineage markers ---

fn explain_no_applicable_rule() -> Explanation {
    Explanation {
        title: "No Applicable Rule",
        description: "\
No policy rule matched the request, so the run's default decision applied. The
decision carries the synthetic rule id `no-applicable-rule`.

The default decision is `allow` unless the run is configured with
`default_decision = \"deny\"` (the `strict` profile does this).",
        remediation: "\
Add a rule covering the request, or run with a stricter default decision.",
        examples: ExamplePair {
            before: r#"profile = "open""#,
            after: r#"profile = "strict"
default_decision = "deny""#,
        },
    }
}

fn explain_no_compatibility_rule() -> Explanation {
    Explanation {
        title: "No Compatibility Rule",
        description: "\
A license pair has neither an identifier-pair override nor a category default in
the requested context. The pair is reported as `conditional`: an unknown pair is
never reported as safely compatible.",
        remediation: "\
Add a category default or an explicit override for the pair in that context.",
        examples: ExamplePair {
            before: r#"# compatibility.toml has no entry for static_linking"#,
            after: r#"[[rules]]
context = "static_linking"
categories = ["permissive", "permissive"]
verdict = "compatible"
reason = "permissive licenses combine freely""#,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_code() {
        assert!(lookup_explanation(ids::CODE_NOT_FOUND).is_some());
        assert!(lookup_explanation(ids::CODE_MALFORMED_RULE).is_some());
        assert!(lookup_explanation(ids::CODE_CONFLICTING_OBLIGATION).is_some());
        assert!(lookup_explanation(ids::CODE_DUPLICATE_ID).is_some());
    }

    #[test]
    fn lookup_unknown_returns_none() {
        assert!(lookup_explanation("unknown_code").is_none());
        assert!(lookup_explanation("").is_none());
    }

    #[test]
    fn all_codes_are_valid() {
        for code in all_codes() {
            let exp = lookup_explanation(code);
            assert!(exp.is_some(), "code {} should be in registry", code);
            let exp = exp.unwrap();
            assert!(!exp.title.is_empty());
            assert!(!exp.remediation.is_empty());
        }
    }
}
