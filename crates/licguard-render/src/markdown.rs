use crate::{
    RenderableAction, RenderableCompatibility, RenderableObligation, RenderableReport,
    RenderableVerdict,
};

fn action_label(action: RenderableAction) -> &'static str {
    match action {
        RenderableAction::Allow => "ALLOW",
        RenderableAction::Warn => "WARN",
        RenderableAction::Deny => "DENY",
    }
}

fn verdict_label(verdict: RenderableVerdict) -> &'static str {
    match verdict {
        RenderableVerdict::Compatible => "compatible",
        RenderableVerdict::Conditional => "conditional",
        RenderableVerdict::Incompatible => "incompatible",
    }
}

fn table_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

pub fn render_markdown(report: &RenderableReport) -> String {
    let mut out = String::new();

    out.push_str("# Licguard report\n\n");

    let d = &report.decision;
    match &d.policy {
        Some(policy) => out.push_str(&format!(
            "- Decision: **{}** by `{}` (policy `{}`)\n",
            action_label(d.action),
            d.rule_id,
            policy
        )),
        None => out.push_str(&format!(
            "- Decision: **{}** by `{}`\n",
            action_label(d.action),
            d.rule_id
        )),
    }
    if !d.message.is_empty() {
        out.push_str(&format!("- Message: {}\n", d.message));
    }

    let licenses: Vec<String> = report.licenses.iter().map(|l| format!("`{l}`")).collect();
    if licenses.is_empty() {
        out.push_str("- Licenses: (none)\n");
    } else {
        out.push_str(&format!("- Licenses: {}\n", licenses.join(", ")));
    }
    out.push_str(&format!("- Context: `{}`\n", report.context));
    if let Some(dist) = &report.distribution {
        out.push_str(&format!("- Distribution: `{dist}`\n"));
    }
    out.push_str(&format!(
        "- Compatibility: **{}**\n\n",
        verdict_label(report.compatibility.overall)
    ));

    out.push_str("## Compatibility\n\n");
    out.push_str(&render_compat_table(&report.compatibility));
    out.push('\n');

    out.push_str("## Obligations\n\n");
    out.push_str(&render_obligation_checklist(&report.obligations));

    if !report.fingerprint.is_empty() {
        out.push_str(&format!("\nFingerprint: `{}`\n", report.fingerprint));
    }

    out
}

/// One row per checked pair, in the order given.
pub fn render_compat_table(compat: &RenderableCompatibility) -> String {
    if compat.pairs.is_empty() {
        return "No license pairs to check.\n".to_string();
    }

    let mut out = String::new();
    out.push_str("| License A | License B | Verdict | Reason |\n");
    out.push_str("|---|---|---|---|\n");
    for p in &compat.pairs {
        out.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            table_cell(&p.licenses[0]),
            table_cell(&p.licenses[1]),
            verdict_label(p.verdict),
            table_cell(&p.reason)
        ));
    }
    out
}

/// A task list with one entry per merge key.
pub fn render_obligation_checklist(obligations: &[RenderableObligation]) -> String {
    if obligations.is_empty() {
        return "No obligations.\n".to_string();
    }

    let mut out = String::new();
    for o in obligations {
        out.push_str(&format!("- [ ] {}\n", o.text));

        let mut meta = format!("  - `{}`, ", o.merge_key);
        meta.push_str(if o.required { "required" } else { "optional" });
        if let Some(p) = o.priority {
            meta.push_str(&format!(", priority {p}"));
        }
        out.push_str(&meta);
        out.push('\n');

        if !o.licenses.is_empty() {
            out.push_str(&format!("  - from: {}\n", o.licenses.join(", ")));
        }
    }
    out
}
