use super::engine::preference_map;
use crate::catalog::{Catalog, EvidenceIndex, EvidenceScore};
use crate::preferences::{Preference, RelevanceLevel};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompareCell {
    pub product_id: String,
    pub score: u8,
    pub ko_fail: bool,
}

/// One subcriterion across the compared products.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompareRow {
    pub domain_name: String,
    pub criterion_name: String,
    pub subcriterion_id: String,
    pub subcriterion_name: String,
    pub preference: Option<Preference>,
    pub cells: Vec<CompareCell>,
    pub is_different: bool,
}

impl CompareRow {
    fn is_must_or_ko(&self) -> bool {
        self.preference
            .as_ref()
            .map(|p| p.is_ko || p.relevance_level == RelevanceLevel::Must)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompareFilter {
    pub only_diffs: bool,
    pub only_must_or_ko: bool,
}

fn is_ko_fail(pref: Option<&Preference>, score: u8) -> bool {
    match pref {
        Some(p) => {
            p.relevance_level != RelevanceLevel::NotApplicable
                && p.is_ko
                && score < p.ko_threshold.value()
        }
        None => false,
    }
}

/// Side-by-side matrix for the given products in catalog order.
/// Rows for not-applicable subcriteria are left out.
pub fn compare_matrix(
    catalog: &Catalog,
    evidence: &[EvidenceScore],
    prefs: &[Preference],
    product_ids: &[String],
    filter: CompareFilter,
) -> Vec<CompareRow> {
    let index = EvidenceIndex::new(evidence);
    let by_id = preference_map(prefs);
    let mut rows = Vec::new();

    for domain in &catalog.domains {
        for criterion in &domain.criteria {
            for sub in &criterion.subcriteria {
                let pref = by_id.get(sub.id.as_str()).copied();
                if pref.is_some_and(|p| p.relevance_level == RelevanceLevel::NotApplicable) {
                    continue;
                }
                let cells: Vec<CompareCell> = product_ids
                    .iter()
                    .map(|product_id| {
                        let score = index.score_or_zero(product_id, &sub.id);
                        CompareCell {
                            product_id: product_id.clone(),
                            score,
                            ko_fail: is_ko_fail(pref, score),
                        }
                    })
                    .collect();
                let first = cells.first().map(|c| c.score).unwrap_or(0);
                let is_different = cells.iter().any(|c| c.score != first);

                rows.push(CompareRow {
                    domain_name: domain.name.clone(),
                    criterion_name: criterion.name.clone(),
                    subcriterion_id: sub.id.clone(),
                    subcriterion_name: sub.name.clone(),
                    preference: pref.cloned(),
                    cells,
                    is_different,
                });
            }
        }
    }

    rows.retain(|r| {
        (!filter.only_diffs || r.is_different) && (!filter.only_must_or_ko || r.is_must_or_ko())
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::fixtures::{evidence, sample_catalog};
    use crate::preferences::{reconcile, set_ko, set_weight};

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn scores() -> Vec<EvidenceScore> {
        vec![
            evidence("a", "s1", 2),
            evidence("b", "s1", 0),
            evidence("a", "s2", 1),
            evidence("b", "s2", 1),
            evidence("a", "s4", 2),
        ]
    }

    #[test]
    fn test_full_matrix() {
        let catalog = sample_catalog();
        let prefs = set_ko(&reconcile(&catalog, &[]), "s1", true);
        let rows = compare_matrix(&catalog, &scores(), &prefs, &ids(&["a", "b"]), CompareFilter::default());

        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].subcriterion_id, "s1");
        assert_eq!(rows[0].domain_name, "Security & Compliance");
        assert!(rows[0].is_different);
        assert!(!rows[0].cells[0].ko_fail);
        assert!(rows[0].cells[1].ko_fail);
        assert!(!rows[1].is_different);
        assert!(!rows[2].is_different);
    }

    #[test]
    fn test_not_applicable_rows_hidden() {
        let catalog = sample_catalog();
        let prefs = set_weight(&reconcile(&catalog, &[]), "s3", 0);
        let rows = compare_matrix(&catalog, &scores(), &prefs, &ids(&["a", "b"]), CompareFilter::default());
        assert_eq!(rows.len(), 5);
        assert!(rows.iter().all(|r| r.subcriterion_id != "s3"));
    }

    #[test]
    fn test_only_diffs() {
        let catalog = sample_catalog();
        let prefs = reconcile(&catalog, &[]);
        let filter = CompareFilter {
            only_diffs: true,
            ..CompareFilter::default()
        };
        let rows = compare_matrix(&catalog, &scores(), &prefs, &ids(&["a", "b"]), filter);
        let got: Vec<&str> = rows.iter().map(|r| r.subcriterion_id.as_str()).collect();
        assert_eq!(got, vec!["s1", "s4"]);
    }

    #[test]
    fn test_only_must_or_ko() {
        let catalog = sample_catalog();
        let prefs = set_ko(&reconcile(&catalog, &[]), "s1", true);
        let prefs = set_weight(&prefs, "s5", 8);
        let prefs = set_weight(&prefs, "s6", 5);
        let filter = CompareFilter {
            only_must_or_ko: true,
            ..CompareFilter::default()
        };
        let rows = compare_matrix(&catalog, &scores(), &prefs, &ids(&["a", "b"]), filter);
        let got: Vec<&str> = rows.iter().map(|r| r.subcriterion_id.as_str()).collect();
        assert_eq!(got, vec!["s1", "s5"]);
    }

    #[test]
    fn test_single_product_never_differs() {
        let catalog = sample_catalog();
        let prefs = reconcile(&catalog, &[]);
        let rows = compare_matrix(&catalog, &scores(), &prefs, &ids(&["a"]), CompareFilter::default());
        assert!(rows.iter().all(|r| !r.is_different));
    }
}
