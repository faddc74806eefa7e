use super::types::{Catalog, EvidenceScore, Product};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Everything the engine reads but never writes.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub catalog: Catalog,
    pub products: Vec<Product>,
    pub evidence: Vec<EvidenceScore>,
}

impl Dataset {
    pub fn find_product(&self, product_id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == product_id)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file at {}", what, path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {} JSON in {}", what, path.display()))
}

pub fn load_catalog(path: &Path) -> Result<Catalog> {
    read_json(path, "catalog")
}

pub fn load_products(path: &Path) -> Result<Vec<Product>> {
    read_json(path, "products")
}

pub fn load_evidence(path: &Path) -> Result<Vec<EvidenceScore>> {
    read_json(path, "evidence")
}

/// Load catalog, products and evidence in one go.
pub fn load_dataset(catalog: &Path, products: &Path, evidence: &Path) -> Result<Dataset> {
    let dataset = Dataset {
        catalog: load_catalog(catalog)?,
        products: load_products(products)?,
        evidence: load_evidence(evidence)?,
    };
    tracing::debug!(
        domains = dataset.catalog.domains.len(),
        subcriteria = dataset.catalog.subcriteria().count(),
        products = dataset.products.len(),
        evidence = dataset.evidence.len(),
        "dataset loaded"
    );
    Ok(dataset)
}
