use super::engine::preference_map;
use crate::catalog::{Catalog, EvidenceIndex, EvidenceScore, MAX_SCORE};
use crate::preferences::{Preference, RelevanceLevel};
use serde::Serialize;

/// Which subcriteria a domain summary counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsFilter {
    /// Skip subcriteria marked not applicable.
    pub only_relevant: bool,
    /// Count only subcriteria scored 0.
    pub only_critical: bool,
}

/// Evidence summary of one product within one domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainStats {
    pub domain_id: String,
    pub domain_name: String,
    pub visible_count: usize,
    pub sum: u32,
    pub max: u32,
    pub critical_count: usize,
    pub citation_count: usize,
    pub with_citations_count: usize,
}

impl DomainStats {
    /// Share of the maximum reached, 0..=100.
    pub fn percent(&self) -> u8 {
        if self.max == 0 {
            return 0;
        }
        (self.sum as f64 / self.max as f64 * 100.0).round() as u8
    }
}

/// Per-domain evidence statistics for `product_id`, in catalog order.
///
/// Subcriteria without a stored preference count as relevance "can".
pub fn domain_stats(
    catalog: &Catalog,
    evidence: &[EvidenceScore],
    prefs: &[Preference],
    product_id: &str,
    filter: StatsFilter,
) -> Vec<DomainStats> {
    let index = EvidenceIndex::new(evidence);
    let by_id = preference_map(prefs);

    catalog
        .domains
        .iter()
        .map(|domain| {
            let mut stats = DomainStats {
                domain_id: domain.id.clone(),
                domain_name: domain.name.clone(),
                visible_count: 0,
                sum: 0,
                max: 0,
                critical_count: 0,
                citation_count: 0,
                with_citations_count: 0,
            };
            for sub in domain.subcriteria() {
                let relevance = by_id
                    .get(sub.id.as_str())
                    .map(|p| p.relevance_level)
                    .unwrap_or(RelevanceLevel::Can);
                let record = index.get(product_id, &sub.id);
                let score = record.map(|r| r.score).unwrap_or(0);

                if filter.only_relevant && relevance == RelevanceLevel::NotApplicable {
                    continue;
                }
                if filter.only_critical && score != 0 {
                    continue;
                }

                stats.visible_count += 1;
                stats.sum += score as u32;
                stats.max += MAX_SCORE as u32;
                if score == 0 {
                    stats.critical_count += 1;
                }
                let links = record.map(|r| r.evidenz_links.len()).unwrap_or(0);
                stats.citation_count += links;
                if links > 0 {
                    stats.with_citations_count += 1;
                }
            }
            stats
        })
        .collect()
}
