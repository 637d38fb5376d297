//! The `explain` use case: look up documentation for an error or lineage code.

use licguard_types::explain::{self, Explanation};

/// Output from the explain use case.
#[derive(Clone, Debug)]
pub enum ExplainOutput {
    /// Found an explanation for the code.
    Found(Explanation),
    /// Unknown code; includes the codes that are documented.
    NotFound {
        code: String,
        available_codes: &'static [&'static str],
    },
}

/// Look up an explanation for a code. Matching ignores case and accepts `-` for `_`.
pub fn run_explain(code: &str) -> ExplainOutput {
    let normalized = code.trim().to_ascii_lowercase().replace('-', "_");
    match explain::lookup_explanation(&normalized) {
        Some(exp) => ExplainOutput::Found(exp),
        None => ExplainOutput::NotFound {
            code: code.to_string(),
            available_codes: explain::all_codes(),
        },
    }
}

/// Format an explanation for terminal display.
pub fn format_explanation(exp: &Explanation) -> String {
    let mut out = String::new();

    out.push_str(exp.title);
    out.push('\n');
    out.push_str(&"=".repeat(exp.title.len()));
    out.push_str("\n\n");
    out.push_str(exp.description);
    out.push_str("\n\n");
    out.push_str("Remediation\n");
    out.push_str("-----------\n");
    out.push_str(exp.remediation);
    out.push_str("\n\n");
    out.push_str("Examples\n");
    out.push_str("--------\n\n");
    out.push_str("Before:\n");
    out.push_str("```toml\n");
    out.push_str(exp.examples.before);
    out.push('\n');
    out.push_str("```\n\n");
    out.push_str("After:\n");
    out.push_str("```toml\n");
    out.push_str(exp.examples.after);
    out.push('\n');
    out.push_str("```\n");

    out
}

/// Format the "not found" message for terminal display.
pub fn format_not_found(code: &str, codes: &[&'static str]) -> String {
    let mut out = format!("Unknown code: {code}\n\nAvailable codes:\n");
    for c in codes {
        out.push_str(&format!("  - {c}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_code_is_explained() {
        for code in explain::all_codes() {
            assert!(
                matches!(run_explain(code), ExplainOutput::Found(_)),
                "{code} has no explanation"
            );
        }
    }

    #[test]
    fn lookup_is_forgiving_about_spelling() {
        assert!(matches!(run_explain("Not-Found"), ExplainOutput::Found(_)));
        assert!(matches!(run_explain(" malformed_rule "), ExplainOutput::Found(_)));
    }

    #[test]
    fn unknown_code_lists_alternatives() {
        match run_explain("not_a_real_thing") {
            ExplainOutput::NotFound {
                code,
                available_codes,
            } => {
                assert_eq!(code, "not_a_real_thing");
                assert!(available_codes.contains(&"duplicate_id"));
            }
            ExplainOutput::Found(_) => panic!("expected NotFound"),
        }
    }

    #[test]
    fn format_explanation_output() {
        let ExplainOutput::Found(exp) = run_explain("duplicate_id") else {
            panic!("expected Found");
        };
        let formatted = format_explanation(&exp);
        assert!(formatted.starts_with("Duplicate Identifier\n====="));
        assert!(formatted.contains("Remediation"));
        assert!(formatted.contains("```toml"));
    }

    #[test]
    fn format_not_found_output() {
        let formatted = format_not_found("missing", &["code_one", "code_two"]);
        assert!(formatted.contains("Unknown code: missing"));
        assert!(formatted.contains("  - code_one\n"));
        assert!(formatted.contains("  - code_two\n"));
    }
}
