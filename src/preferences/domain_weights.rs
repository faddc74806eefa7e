use super::mutate::scale_weight_many;
use super::types::Preference;
use crate::catalog::Catalog;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const MIN_MULTIPLIER: f64 = 0.5;
pub const MAX_MULTIPLIER: f64 = 1.5;

/// Coarse per-domain emphasis. Unlisted domains count as 1.0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainMultipliers {
    #[serde(default)]
    pub multipliers: BTreeMap<String, f64>,
}

impl DomainMultipliers {
    pub fn get(&self, domain_id: &str) -> f64 {
        self.multipliers
            .get(domain_id)
            .copied()
            .filter(|m| m.is_finite())
            .unwrap_or(1.0)
    }

    /// Copy with one domain set from a percentage, clamped to 50..=150 %.
    pub fn with_percent(&self, domain_id: &str, percent: f64) -> Self {
        let mut next = self.clone();
        let value = if percent.is_finite() {
            (percent / 100.0).clamp(MIN_MULTIPLIER, MAX_MULTIPLIER)
        } else {
            1.0
        };
        next.multipliers.insert(domain_id.to_string(), value);
        next
    }
}

/// Rescale each domain's weights by `next / prev`.
///
/// Domains whose previous multiplier is not positive use factor 1.
pub fn apply_domain_multiplier_change(
    catalog: &Catalog,
    prefs: &[Preference],
    prev: &DomainMultipliers,
    next: &DomainMultipliers,
) -> Vec<Preference> {
    let mut out = prefs.to_vec();
    for domain in &catalog.domains {
        let before = prev.get(&domain.id);
        let after = next.get(&domain.id);
        let factor = if before > 0.0 { after / before } else { 1.0 };
        if (factor - 1.0).abs() < f64::EPSILON {
            continue;
        }
        tracing::debug!(domain = %domain.id, factor, "rescaling domain weights");
        out = scale_weight_many(&out, &domain.subcriterion_ids(), factor);
    }
    out
}
