pub mod loader;
pub mod lookup;
pub mod types;

pub use loader::{load_catalog, load_dataset, load_evidence, load_products, Dataset};
pub use lookup::EvidenceIndex;
pub use types::{
    Catalog, Criterion, Domain, EvidenceLink, EvidenceScore, Product, Subcriterion, MAX_SCORE,
};
