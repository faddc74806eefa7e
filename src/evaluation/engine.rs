use crate::catalog::{Catalog, EvidenceIndex, EvidenceScore, Product, MAX_SCORE};
use crate::preferences::{KoThreshold, Preference};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KoViolation {
    pub subcriterion_id: String,
    pub threshold: KoThreshold,
    pub actual_score: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductEvaluation {
    pub product_id: String,
    pub total_raw: u32,
    pub total_norm_0_100: u8,
    pub ko_violations: Vec<KoViolation>,
}

impl ProductEvaluation {
    pub fn is_ko_free(&self) -> bool {
        self.ko_violations.is_empty()
    }
}

pub(crate) fn preference_map(prefs: &[Preference]) -> HashMap<&str, &Preference> {
    prefs.iter().map(|p| (p.subcriterion_id.as_str(), p)).collect()
}

/// Best achievable raw score: every weighted subcriterion at full evidence.
/// Never below 1, so normalization cannot divide by zero.
pub fn max_possible(catalog: &Catalog, prefs: &[Preference]) -> u32 {
    let by_id = preference_map(prefs);
    let total: u32 = catalog
        .subcriteria()
        .filter_map(|s| by_id.get(s.id.as_str()))
        .filter(|p| p.weight > 0)
        .map(|p| p.weight as u32 * MAX_SCORE as u32)
        .sum();
    total.max(1)
}

/// Score and rank products.
///
/// Subcriteria without a preference or with weight 0 do not count. Missing
/// evidence scores 0. Products without knockout violations rank first, then
/// by normalized score descending; ties keep input order.
pub fn evaluate_products(
    products: &[Product],
    catalog: &Catalog,
    evidence: &[EvidenceScore],
    prefs: &[Preference],
) -> Vec<ProductEvaluation> {
    let index = EvidenceIndex::new(evidence);
    let by_id = preference_map(prefs);
    let max = max_possible(catalog, prefs);

    let mut out: Vec<ProductEvaluation> = products
        .iter()
        .map(|product| {
            let mut total_raw = 0u32;
            let mut ko_violations = Vec::new();

            for sub in catalog.subcriteria() {
                let Some(pref) = by_id.get(sub.id.as_str()) else {
                    continue;
                };
                if !pref.is_weighted() {
                    continue;
                }
                let score = index.score_or_zero(&product.id, &sub.id);
                total_raw += pref.weight as u32 * score as u32;
                if pref.is_ko && score < pref.ko_threshold.value() {
                    ko_violations.push(KoViolation {
                        subcriterion_id: sub.id.clone(),
                        threshold: pref.ko_threshold,
                        actual_score: score,
                    });
                }
            }

            let norm = (total_raw as f64 / max as f64 * 100.0).round().clamp(0.0, 100.0) as u8;
            ProductEvaluation {
                product_id: product.id.clone(),
                total_raw,
                total_norm_0_100: norm,
                ko_violations,
            }
        })
        .collect();

    out.sort_by(|a, b| {
        a.is_ko_free()
            .cmp(&b.is_ko_free())
            .reverse()
            .then(b.total_norm_0_100.cmp(&a.total_norm_0_100))
    });
    tracing::debug!(products = out.len(), max_possible = max, "products evaluated");
    out
}
