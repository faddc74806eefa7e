use anyhow::{Context, Result};

use crate::catalog::{load_dataset, Dataset};
use crate::config::Config;
use crate::evaluation::{evaluate_products, ProductEvaluation};
use crate::preferences::{
    apply_domain_multiplier_change, reconcile, DomainMultipliers, Preference, PreferenceStore,
};
use crate::rails::RailBook;
use crate::selection::SelectionStore;
use crate::wizard::{apply_wizard_answers, WizardAnswers, WizardOutcome};

/// Loaded data plus the state stores, as every command sees them.
pub struct Workspace {
    pub config: Config,
    pub dataset: Dataset,
    pub store: PreferenceStore,
    pub selection: SelectionStore,
    pub rails: RailBook,
}

impl Workspace {
    /// Load the configured data files and resolve rails against the catalog.
    pub fn open(config: Config) -> Result<Self> {
        let dataset = load_dataset(
            &config.data.catalog,
            &config.data.products,
            &config.data.evidence,
        )?;
        Ok(Self::from_parts(config, dataset))
    }

    pub fn from_parts(config: Config, dataset: Dataset) -> Self {
        let state_dir = config.state_dir();
        let resolver = config.rails.strategy.resolver();
        let rails = RailBook::resolve(&dataset.catalog, &config.rails.definitions(), resolver.as_ref());
        Self {
            store: PreferenceStore::new(&state_dir),
            selection: SelectionStore::new(&state_dir),
            config,
            dataset,
            rails,
        }
    }

    /// Stored preferences reconciled against the catalog: one per subcriterion.
    pub fn preferences(&self) -> Result<Vec<Preference>> {
        let stored = self.store.load_preferences()?;
        Ok(reconcile(&self.dataset.catalog, &stored))
    }

    pub fn evaluate(&self, prefs: &[Preference]) -> Vec<ProductEvaluation> {
        evaluate_products(
            &self.dataset.products,
            &self.dataset.catalog,
            &self.dataset.evidence,
            prefs,
        )
    }

    /// Ids of a configured rail. Unknown keys are an error; a rail that
    /// matched nothing yields an empty slice.
    pub fn rail_ids(&self, key: &str) -> Result<&[String]> {
        self.rails
            .get(key)
            .map(|r| r.ids.as_slice())
            .with_context(|| {
                let known: Vec<&str> = self.rails.iter().map(|r| r.spec.key.as_str()).collect();
                format!("Unknown rail '{}'. Known rails: {}", key, known.join(", "))
            })
    }

    pub fn ensure_subcriterion(&self, id: &str) -> Result<()> {
        if self.dataset.catalog.contains(id) {
            Ok(())
        } else {
            anyhow::bail!("Unknown subcriterion '{}'", id)
        }
    }

    /// Change one domain's multiplier and rescale its weights to match.
    /// Saves both the multipliers and the preferences (as draft).
    pub fn set_domain_weight(
        &self,
        prefs: &[Preference],
        domain_id: &str,
        percent: f64,
    ) -> Result<(DomainMultipliers, Vec<Preference>)> {
        if self.dataset.catalog.find_domain(domain_id).is_none() {
            anyhow::bail!("Unknown domain '{}'", domain_id);
        }
        let prev = self.store.load_domain_weights()?;
        let next = prev.with_percent(domain_id, percent);
        let updated = apply_domain_multiplier_change(&self.dataset.catalog, prefs, &prev, &next);
        self.store.save_domain_weights(&next)?;
        self.store.save_draft(&updated)?;
        Ok((next, updated))
    }

    pub fn run_wizard(&self, prefs: &[Preference], answers: &WizardAnswers) -> WizardOutcome {
        apply_wizard_answers(
            &self.dataset.catalog,
            prefs,
            answers,
            &self.rails,
            &self.config.wizard,
        )
    }
}

/// Number of preferences that differ from the neutral default.
pub fn customized_count(prefs: &[Preference]) -> usize {
    prefs
        .iter()
        .filter(|p| **p != Preference::neutral(p.subcriterion_id.clone()))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::fixtures::{evidence, product, sample_catalog};
    use crate::config::{DataConfig, RailsConfig};
    use crate::preferences::set_weight;
    use crate::wizard::WizardDomains;
    use std::env;
    use std::path::PathBuf;

    fn workspace(name: &str) -> (Workspace, PathBuf) {
        let dir = env::temp_dir().join(format!("criteria_compass_workspace_{}", name));
        let _ = std::fs::remove_dir_all(&dir);
        let config = Config {
            data: DataConfig {
                catalog: dir.join("tree.json"),
                products: dir.join("products.json"),
                evidence: dir.join("scores.json"),
            },
            state_dir: Some(dir.clone()),
            rails: RailsConfig::default(),
            wizard: WizardDomains::default(),
        };
        let dataset = Dataset {
            catalog: sample_catalog(),
            products: vec![product("a"), product("b")],
            evidence: vec![evidence("a", "s1", 2), evidence("b", "s1", 1)],
        };
        (Workspace::from_parts(config, dataset), dir)
    }

    #[test]
    fn test_open_reads_data_files() {
        let dir = env::temp_dir().join("criteria_compass_workspace_open");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("tree.json"),
            serde_json::to_string(&sample_catalog()).unwrap(),
        )
        .unwrap();
        std::fs::write(dir.join("products.json"), r#"[{"id":"a","name":"A"}]"#).unwrap();
        std::fs::write(
            dir.join("scores.json"),
            r#"[{"product_id":"a","subcriterion_id":"s1","score":2}]"#,
        )
        .unwrap();
        let config = Config {
            data: DataConfig {
                catalog: dir.join("tree.json"),
                products: dir.join("products.json"),
                evidence: dir.join("scores.json"),
            },
            state_dir: Some(dir.clone()),
            rails: RailsConfig::default(),
            wizard: WizardDomains::default(),
        };

        let ws = Workspace::open(config).unwrap();
        assert_eq!(ws.dataset.products.len(), 1);
        assert_eq!(ws.rail_ids("sso").unwrap(), ["s1".to_string()]);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_open_missing_data_is_an_error() {
        let (ws, dir) = workspace("missing");
        assert!(Workspace::open(ws.config).is_err());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_preferences_fill_catalog() {
        let (ws, dir) = workspace("prefs");
        let prefs = ws.preferences().unwrap();
        assert_eq!(prefs.len(), 6);
        assert_eq!(customized_count(&prefs), 0);

        ws.store.save_draft(&set_weight(&prefs, "s2", 9)).unwrap();
        let prefs = ws.preferences().unwrap();
        assert_eq!(customized_count(&prefs), 1);
        assert!(!ws.store.is_applied().unwrap());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_rail_lookup() {
        let (ws, dir) = workspace("rails");
        assert!(ws.rail_ids("tco").unwrap().is_empty());
        let err = ws.rail_ids("nope").unwrap_err().to_string();
        assert!(err.contains("Unknown rail 'nope'"));
        assert!(err.contains("sso"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_domain_weight_rescales_and_persists() {
        let (ws, dir) = workspace("domain");
        let prefs = set_weight(&ws.preferences().unwrap(), "s4", 4);
        let (multipliers, updated) = ws.set_domain_weight(&prefs, "d2", 150.0).unwrap();
        assert_eq!(multipliers.get("d2"), 1.5);
        assert_eq!(updated.iter().find(|p| p.subcriterion_id == "s4").unwrap().weight, 6);
        assert_eq!(ws.store.load_domain_weights().unwrap(), multipliers);
        assert_eq!(ws.preferences().unwrap(), updated);

        assert!(ws.set_domain_weight(&prefs, "d9", 120.0).is_err());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_evaluate_uses_dataset() {
        let (ws, dir) = workspace("evaluate");
        let evals = ws.evaluate(&ws.preferences().unwrap());
        assert_eq!(evals[0].product_id, "a");
        std::fs::remove_dir_all(&dir).ok();
    }
}
