use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::config::{get_config_path, validate_config, Config, DataConfig, RailsConfig};
use crate::prompt::Console;
use crate::rails::RailStrategy;
use crate::wizard::WizardDomains;

/// Ask for a data file path; a path that does not exist yet is kept only
/// after confirmation.
fn prompt_data_path<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    label: &str,
    default: &str,
    base: &Path,
) -> Result<PathBuf> {
    loop {
        let input = console.prompt_with_default(label, default)?;
        let path = PathBuf::from(&input);
        let resolved = if path.is_absolute() { path.clone() } else { base.join(&path) };
        if resolved.exists() {
            return Ok(path);
        }
        if console.prompt_yes_no(
            &format!("  {} does not exist yet. Keep it?", resolved.display()),
            false,
        )? {
            return Ok(path);
        }
    }
}

fn prompt_strategy<R: BufRead, W: Write>(console: &mut Console<R, W>) -> Result<RailStrategy> {
    loop {
        let input = console.prompt_with_default("Rail strategy (keyword/static)", "keyword")?;
        match input.to_lowercase().as_str() {
            "keyword" => return Ok(RailStrategy::Keyword),
            "static" => return Ok(RailStrategy::Static),
            _ => console.say("  Invalid: enter 'keyword' or 'static'. Try again.")?,
        }
    }
}

/// Run the interactive init flow that writes a config file.
///
/// If `default_path` is Some, uses that as the suggested config file path.
/// Returns the written path, or None when the user declined to overwrite.
pub fn run_init_wizard<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    default_path: Option<PathBuf>,
) -> Result<Option<PathBuf>> {
    console.say("")?;
    console.typewriter("Criteria Compass Configuration")?;
    console.say("==============================")?;

    // 1. Config path first: relative data paths are read from its directory
    let default_config_path = default_path.unwrap_or_else(get_config_path);
    console.say("")?;
    let path_str = console.prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);
    let base = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    if config_path.exists() {
        let overwrite = console.prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            console.say("Aborted.")?;
            return Ok(None);
        }
    }

    // 2. Data files
    console.say("")?;
    console.typewriter("The catalog, product list and evidence scores are JSON files.")?;
    console.typewriter(&format!(
        "Relative paths are read from {}.",
        base.display()
    ))?;
    let data = DataConfig {
        catalog: prompt_data_path(console, "Catalog file", "tree.json", &base)?,
        products: prompt_data_path(console, "Products file", "products.json", &base)?,
        evidence: prompt_data_path(console, "Evidence file", "scores.json", &base)?,
    };

    // 3. Rails
    console.say("")?;
    console.typewriter("Rails group subcriteria so they can be edited together.")?;
    console.typewriter("  keyword -- match subcriterion names and descriptions against keywords")?;
    console.typewriter("  static  -- use the subcriterion ids listed in the config")?;
    let strategy = prompt_strategy(console)?;

    // 4. Wizard domains
    console.say("")?;
    console.typewriter("The questionnaire scales two domains by how sensitive your data is.")?;
    let defaults = WizardDomains::default();
    let wizard = WizardDomains {
        security_domain: console
            .prompt_with_default("Security domain id", &defaults.security_domain)?,
        governance_domain: console
            .prompt_with_default("Governance domain id", &defaults.governance_domain)?,
    };

    let config = Config {
        data,
        state_dir: None,
        rails: RailsConfig {
            strategy,
            definitions: None,
        },
        wizard,
    };
    if let Err(errors) = validate_config(&config) {
        anyhow::bail!("Invalid configuration:\n  {}", errors.join("\n  "));
    }

    // 5. Write config
    let yaml = serde_saphyr::to_string(&config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    std::fs::create_dir_all(&base)
        .with_context(|| format!("Failed to create directory {}", base.display()))?;
    std::fs::write(&config_path, &yaml)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    console.say("")?;
    console.say(&format!("Config written to {}", config_path.display()))?;
    console.say("Run `criteria-compass wizard --interactive` to set your priorities.")?;

    Ok(Some(config_path))
}
