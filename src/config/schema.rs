use crate::rails::{default_rails, RailSpec, RailStrategy};
use crate::wizard::WizardDomains;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
///
/// Example YAML:
/// ```yaml
/// data:
///   catalog: data/tree.json
///   products: data/products.json
///   evidence: data/scores.json
/// rails:
///   strategy: static
///   definitions:
///     - key: sso
///       title: SSO
///       subcriterion_ids: ["s_d1_2_1"]
/// wizard:
///   security_domain: d1
///   governance_domain: d2
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub data: DataConfig,

    /// Where preference, selection and multiplier state is kept
    /// (default: the config file's directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_dir: Option<PathBuf>,

    #[serde(default)]
    pub rails: RailsConfig,

    #[serde(default)]
    pub wizard: WizardDomains,
}

/// Paths of the three JSON data files. Relative paths are taken from the
/// config file's directory.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DataConfig {
    pub catalog: PathBuf,
    pub products: PathBuf,
    pub evidence: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct RailsConfig {
    #[serde(default)]
    pub strategy: RailStrategy,

    /// Rail definitions (default: the built-in set)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definitions: Option<Vec<RailSpec>>,
}

impl RailsConfig {
    pub fn definitions(&self) -> Vec<RailSpec> {
        self.definitions.clone().unwrap_or_else(default_rails)
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

impl Config {
    /// Make every relative path absolute against `base` and fill in the
    /// state directory.
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        self.data.catalog = resolve(base, &self.data.catalog);
        self.data.products = resolve(base, &self.data.products);
        self.data.evidence = resolve(base, &self.data.evidence);
        self.state_dir = Some(match &self.state_dir {
            Some(dir) => resolve(base, dir),
            None => base.to_path_buf(),
        });
        self
    }

    pub fn state_dir(&self) -> PathBuf {
        self.state_dir.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config() {
        let yaml = r#"
data:
  catalog: tree.json
  products: products.json
  evidence: scores.json
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.rails.strategy, RailStrategy::Keyword);
        assert_eq!(config.rails.definitions().len(), default_rails().len());
        assert_eq!(config.wizard, WizardDomains::default());
        assert!(config.state_dir.is_none());
    }

    #[test]
    fn test_full_config() {
        let yaml = r#"
data:
  catalog: /srv/tree.json
  products: products.json
  evidence: scores.json
state_dir: state
rails:
  strategy: static
  definitions:
    - key: sso
      title: SSO
      subcriterion_ids: ["s1"]
wizard:
  security_domain: sec
  governance_domain: gov
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.rails.strategy, RailStrategy::Static);
        assert_eq!(config.rails.definitions()[0].subcriterion_ids, vec!["s1"]);
        assert_eq!(config.wizard.security_domain, "sec");

        let resolved = config.resolve_paths(Path::new("/home/u/.config/criteria-compass"));
        assert_eq!(resolved.data.catalog, PathBuf::from("/srv/tree.json"));
        assert_eq!(
            resolved.data.products,
            PathBuf::from("/home/u/.config/criteria-compass/products.json")
        );
        assert_eq!(
            resolved.state_dir(),
            PathBuf::from("/home/u/.config/criteria-compass/state")
        );
    }

    #[test]
    fn test_state_dir_defaults_to_base() {
        let yaml = "data: { catalog: a.json, products: b.json, evidence: c.json }\n";
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        let resolved = config.resolve_paths(Path::new("/cfg"));
        assert_eq!(resolved.state_dir(), PathBuf::from("/cfg"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "data: { catalog: a, products: b, evidence: c }\nqueries: []\n";
        assert!(serde_saphyr::from_str::<Config>(yaml).is_err());
    }
}
