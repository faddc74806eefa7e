use super::schema::Config;
use std::collections::HashSet;

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for (field, path) in [
        ("data.catalog", &config.data.catalog),
        ("data.products", &config.data.products),
        ("data.evidence", &config.data.evidence),
    ] {
        if path.as_os_str().is_empty() {
            errors.push(format!("{}: path must not be empty", field));
        }
    }

    if let Some(ref definitions) = config.rails.definitions {
        let mut seen = HashSet::new();
        for (i, rail) in definitions.iter().enumerate() {
            let key = rail.key.trim();
            if key.is_empty() {
                errors.push(format!("rails.definitions[{}].key: must not be empty", i));
            } else if !seen.insert(key) {
                errors.push(format!("rails.definitions[{}].key: duplicate key '{}'", i, key));
            }
            for (j, keyword) in rail.keywords.iter().enumerate() {
                if keyword.trim().is_empty() {
                    errors.push(format!(
                        "rails.definitions[{}].keywords[{}]: must not be blank",
                        i, j
                    ));
                }
            }
        }
    }

    let wizard = &config.wizard;
    if wizard.security_domain.trim().is_empty() {
        errors.push("wizard.security_domain: must not be empty".to_string());
    }
    if wizard.governance_domain.trim().is_empty() {
        errors.push("wizard.governance_domain: must not be empty".to_string());
    }
    if !wizard.security_domain.trim().is_empty()
        && wizard.security_domain.trim() == wizard.governance_domain.trim()
    {
        errors.push(format!(
            "wizard: security_domain and governance_domain are both '{}'",
            wizard.security_domain.trim()
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
