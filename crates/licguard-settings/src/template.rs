use crate::presets;

/// Render a commented starter policy for `profile`. The output parses back to a valid policy.
pub fn policy_template(name: &str, profile: &str) -> anyhow::Result<String> {
    let preset = presets::preset(profile)?;
    let baseline = if preset.policies.is_empty() {
        "no built-in policies are composed ahead of this file"
    } else {
        "the built-in `licguard-baseline` policy is composed ahead of this file"
    };

    let mut out = String::new();
    out.push_str(&format!(
        "# licguard policy scaffolded for the `{profile}` profile.\n\
         #\n\
         # Under this profile {baseline}, and requests that match no rule\n\
         # are answered with `{default}`.\n\
         #\n\
         # Rules are ranked by priority (higher first), then deny > warn > allow,\n\
         # then policy order, then rule order.\n\
         schema = \"licguard.policy.v1\"\n\
         name = \"{name}\"\n\
         version = \"1\"\n",
        default = preset.default_decision.as_str(),
    ));

    out.push_str(
        "\n\
         # Strong copyleft cannot ship in closed mobile apps.\n\
         [[rules]]\n\
         id = \"no-strong-copyleft-on-mobile\"\n\
         priority = 10\n\
         action = \"deny\"\n\
         message = \"{licenses} cannot ship on {distribution}\"\n\
         when = { all = [ { license_category = \"strong-copyleft\" }, { distribution = \"mobile\" } ] }\n",
    );

    out.push_str(
        "\n\
         # Flag anything outside the permissive family for review.\n\
         [[rules]]\n\
         id = \"review-non-permissive\"\n\
         priority = 0\n\
         action = \"warn\"\n\
         when = { not = { only_categories = [\"permissive\", \"public-domain\"] } }\n",
    );

    if preset.default_decision.as_str() == "deny" {
        out.push_str(
            "\n\
             # The profile denies by default: allow what is known to be safe.\n\
             [[rules]]\n\
             id = \"allow-permissive\"\n\
             priority = 0\n\
             action = \"allow\"\n\
             when = { only_categories = [\"permissive\", \"public-domain\"] }\n",
        );
    }

    Ok(out)
}

/// Render a starter `licguard.toml` that composes `policy_file` on top of `profile`.
pub fn config_template(profile: &str, dataset: &str, policy_file: &str) -> anyhow::Result<String> {
    let preset = presets::preset(profile)?;
    Ok(format!(
        "# licguard configuration. Command-line flags override these values.\n\
         schema = \"licguard.config.v1\"\n\
         profile = \"{profile}\"\n\
         default_decision = \"{default}\"\n\
         context = \"static_linking\"\n\
         \n\
         # Distribution channel for requests that do not name one (`--distribution`).\n\
         # Rules that test `distribution` cannot be evaluated without it.\n\
         distribution = \"desktop\"\n\
         \n\
         # Relative to this file.\n\
         dataset = \"{dataset}\"\n\
         policies = [\"{policy_file}\"]\n",
        profile = preset.profile,
        default = preset.default_decision.as_str(),
    ))
}
