use serde::{Deserialize, Deserializer, Serialize};

/// Evidence score scale: 0 = critical / no evidence, 1 = partial, 2 = strong.
pub const MAX_SCORE: u8 = 2;

/// The full criteria tree: domain -> criterion -> subcriterion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub domains: Vec<Domain>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub criteria: Vec<Criterion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub subcriteria: Vec<Subcriterion>,
}

/// Smallest scored unit of the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subcriterion {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_desc: Option<String>,
}

impl Subcriterion {
    /// Text searched by keyword rails: name plus short description.
    pub fn search_text(&self) -> String {
        format!("{} {}", self.name, self.short_desc.as_deref().unwrap_or(""))
    }
}

impl Catalog {
    /// Iterate every subcriterion in traversal order (domain -> criterion -> subcriterion).
    pub fn subcriteria(&self) -> impl Iterator<Item = &Subcriterion> {
        self.domains
            .iter()
            .flat_map(|d| d.criteria.iter())
            .flat_map(|c| c.subcriteria.iter())
    }

    /// All subcriterion ids in traversal order.
    pub fn subcriterion_ids(&self) -> Vec<String> {
        self.subcriteria().map(|s| s.id.clone()).collect()
    }

    pub fn find_domain(&self, domain_id: &str) -> Option<&Domain> {
        self.domains.iter().find(|d| d.id == domain_id)
    }

    /// Subcriterion ids belonging to one domain; empty when the domain is unknown.
    pub fn subcriterion_ids_in_domain(&self, domain_id: &str) -> Vec<String> {
        self.find_domain(domain_id)
            .map(|d| d.subcriterion_ids())
            .unwrap_or_default()
    }

    pub fn find_subcriterion(&self, id: &str) -> Option<&Subcriterion> {
        self.subcriteria().find(|s| s.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find_subcriterion(id).is_some()
    }
}

impl Domain {
    pub fn subcriteria(&self) -> impl Iterator<Item = &Subcriterion> {
        self.criteria.iter().flat_map(|c| c.subcriteria.iter())
    }

    pub fn subcriterion_ids(&self) -> Vec<String> {
        self.subcriteria().map(|s| s.id.clone()).collect()
    }
}

/// A candidate product under evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, rename = "logoUrl", skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

/// Citation attached to an evidence score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceLink {
    pub label: String,
    pub url: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// Evidence for one (product, subcriterion) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceScore {
    pub product_id: String,
    pub subcriterion_id: String,
    #[serde(deserialize_with = "deserialize_score")]
    pub score: u8,
    #[serde(default)]
    pub audit_comment: String,
    #[serde(default)]
    pub evidenz_links: Vec<EvidenceLink>,
}

/// Scores outside 0..=2 (or non-integers) load as 0, the worst case.
fn deserialize_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let score = value
        .as_u64()
        .filter(|s| *s <= MAX_SCORE as u64)
        .map(|s| s as u8);
    match score {
        Some(s) => Ok(s),
        None => {
            tracing::warn!(%value, "evidence score out of range, treating as 0");
            Ok(0)
        }
    }
}
