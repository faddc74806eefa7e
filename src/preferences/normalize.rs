//! Parse-and-validate boundary for preference data of unknown shape.
//!
//! Anything read back from storage goes through [`normalize_all`] and then
//! [`reconcile`] before the engine sees it. Nothing here fails: malformed
//! fields fall back to the neutral default.

use super::types::{KoThreshold, Preference, RelevanceLevel, MAX_WEIGHT};
use crate::catalog::Catalog;
use serde_json::Value;
use std::collections::HashMap;

fn coerce_id(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn coerce_relevance(value: Option<&Value>) -> RelevanceLevel {
    value
        .and_then(Value::as_str)
        .and_then(RelevanceLevel::parse_lenient)
        .unwrap_or(RelevanceLevel::Can)
}

fn coerce_number(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

fn coerce_weight(value: Option<&Value>, relevance: RelevanceLevel) -> u8 {
    match coerce_number(value) {
        Some(w) => w.round().clamp(0.0, MAX_WEIGHT as f64) as u8,
        None => relevance.default_weight(),
    }
}

fn coerce_bool(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => matches!(s.trim().to_lowercase().as_str(), "true" | "yes" | "1"),
        _ => false,
    }
}

fn coerce_threshold(value: Option<&Value>) -> KoThreshold {
    coerce_number(value)
        .filter(|t| *t == 1.0 || *t == 2.0)
        .and_then(|t| KoThreshold::try_from(t as u8).ok())
        .unwrap_or_default()
}

/// Turn a loosely-typed candidate into an invariant-respecting preference.
///
/// The incoming relevance only matters when the weight is unusable: it then
/// picks the fallback weight. Otherwise relevance is re-derived from weight.
pub fn normalize(raw: &Value) -> Preference {
    let field = |name: &str| raw.get(name);
    let relevance = coerce_relevance(field("relevance_level"));
    Preference {
        subcriterion_id: coerce_id(field("subcriterion_id")),
        relevance_level: relevance,
        is_ko: coerce_bool(field("is_ko")),
        weight: coerce_weight(field("weight"), relevance),
        ko_threshold: coerce_threshold(field("ko_threshold")),
    }
    .normalized()
}

/// Normalize every candidate, dropping entries without a subcriterion id.
pub fn normalize_all(raw: &[Value]) -> Vec<Preference> {
    let normalized: Vec<Preference> = raw
        .iter()
        .map(normalize)
        .filter(|p| !p.subcriterion_id.is_empty())
        .collect();
    if normalized.len() != raw.len() {
        tracing::warn!(
            dropped = raw.len() - normalized.len(),
            "dropped preference records without a subcriterion id"
        );
    }
    normalized
}

/// Exactly one normalized preference per catalog subcriterion, in catalog order.
///
/// Existing entries are re-normalized; for duplicate ids the last one wins.
/// Missing subcriteria get the neutral default. Entries whose id is not in the
/// catalog are dropped.
pub fn reconcile(catalog: &Catalog, existing: &[Preference]) -> Vec<Preference> {
    let mut by_id: HashMap<&str, &Preference> = HashMap::new();
    for pref in existing {
        if !pref.subcriterion_id.is_empty() {
            by_id.insert(pref.subcriterion_id.as_str(), pref);
        }
    }

    let mut synthesized = 0usize;
    let reconciled: Vec<Preference> = catalog
        .subcriteria()
        .map(|sub| match by_id.remove(sub.id.as_str()) {
            Some(pref) => pref.clone().normalized(),
            None => {
                synthesized += 1;
                Preference::neutral(sub.id.clone())
            }
        })
        .collect();

    tracing::debug!(
        kept = reconciled.len() - synthesized,
        synthesized,
        orphaned = by_id.len(),
        "preferences reconciled against catalog"
    );
    reconciled
}
