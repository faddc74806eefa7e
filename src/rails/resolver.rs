use super::spec::RailSpec;
use crate::catalog::Catalog;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Maps a rail to the concrete subcriterion ids it governs.
///
/// Output is de-duplicated and contains only ids present in the catalog.
/// An empty result is valid and means the rail has no effect.
pub trait RailResolver {
    fn resolve(&self, catalog: &Catalog, rail: &RailSpec) -> Vec<String>;
}

/// Uses the rail's explicit id list, in the order given.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticRails;

impl RailResolver for StaticRails {
    fn resolve(&self, catalog: &Catalog, rail: &RailSpec) -> Vec<String> {
        let valid: HashSet<&str> = catalog.subcriteria().map(|s| s.id.as_str()).collect();
        let mut seen = HashSet::new();
        rail.subcriterion_ids
            .iter()
            .filter(|id| valid.contains(id.as_str()))
            .filter(|id| seen.insert(id.as_str()))
            .cloned()
            .collect()
    }
}

/// Case-insensitive substring match of any keyword against name + description.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordRails;

impl RailResolver for KeywordRails {
    fn resolve(&self, catalog: &Catalog, rail: &RailSpec) -> Vec<String> {
        find_ids_by_keywords(catalog, &rail.keywords)
    }
}

/// Scan every subcriterion once, in catalog order, keeping those whose
/// lower-cased text contains any lower-cased keyword.
pub fn find_ids_by_keywords<S: AsRef<str>>(catalog: &Catalog, keywords: &[S]) -> Vec<String> {
    let keys: Vec<String> = keywords
        .iter()
        .map(|k| k.as_ref().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect();
    if keys.is_empty() {
        return Vec::new();
    }

    let mut seen = HashSet::new();
    catalog
        .subcriteria()
        .filter(|sub| {
            let hay = sub.search_text().to_lowercase();
            keys.iter().any(|k| hay.contains(k.as_str()))
        })
        .filter(|sub| seen.insert(sub.id.as_str()))
        .map(|sub| sub.id.clone())
        .collect()
}

/// Which resolver the configuration selects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RailStrategy {
    Static,
    #[default]
    Keyword,
}

impl RailStrategy {
    pub fn resolver(self) -> Box<dyn RailResolver> {
        match self {
            RailStrategy::Static => Box::new(StaticRails),
            RailStrategy::Keyword => Box::new(KeywordRails),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::fixtures::sample_catalog;

    fn spec(keywords: &[&str], ids: &[&str]) -> RailSpec {
        RailSpec {
            key: "k".to_string(),
            title: "K".to_string(),
            helper: String::new(),
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            subcriterion_ids: ids.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        let catalog = sample_catalog();
        let ids = KeywordRails.resolve(&catalog, &spec(&["SAML"], &[]));
        assert_eq!(ids, vec!["s1"]);
    }

    #[test]
    fn test_keyword_matches_description() {
        let catalog = sample_catalog();
        let ids = KeywordRails.resolve(&catalog, &spec(&["oidc"], &[]));
        assert_eq!(ids, vec!["s1"]);
    }

    #[test]
    fn test_keyword_output_in_catalog_order_without_duplicates() {
        let catalog = sample_catalog();
        let ids = KeywordRails.resolve(&catalog, &spec(&["export", "access", "encryption", "exit"], &[]));
        assert_eq!(ids, vec!["s2", "s3", "s5"]);
    }

    #[test]
    fn test_keyword_no_match_is_empty() {
        let catalog = sample_catalog();
        assert!(KeywordRails.resolve(&catalog, &spec(&["blockchain"], &[])).is_empty());
        assert!(KeywordRails.resolve(&catalog, &spec(&[], &[])).is_empty());
        assert!(KeywordRails.resolve(&catalog, &spec(&[""], &[])).is_empty());
    }

    #[test]
    fn test_static_filters_unknown_and_duplicates() {
        let catalog = sample_catalog();
        let ids = StaticRails.resolve(&catalog, &spec(&["sso"], &["s5", "missing", "s2", "s5"]));
        assert_eq!(ids, vec!["s5", "s2"]);
    }

    #[test]
    fn test_strategies_are_interchangeable() {
        let catalog = sample_catalog();
        let rail = spec(&["residency"], &["s4"]);
        let by_keyword = RailStrategy::Keyword.resolver().resolve(&catalog, &rail);
        let by_static = RailStrategy::Static.resolver().resolve(&catalog, &rail);
        assert_eq!(by_keyword, by_static);
    }
}
