//! Pure preference mutators. Each returns a new, fully normalized list.
//!
//! `set_weight` and `set_ko` are the primitives; everything else is written
//! in terms of them. Bulk variants touch each id independently, so
//! `set_weight_many(p, ids, w)` equals folding `set_weight` over `ids`.

use super::types::{KoThreshold, Preference, RelevanceLevel, MAX_WEIGHT};
use std::collections::HashSet;

fn update_where<F>(prefs: &[Preference], ids: &HashSet<&str>, update: F) -> Vec<Preference>
where
    F: Fn(Preference) -> Preference,
{
    prefs
        .iter()
        .map(|p| {
            if ids.contains(p.subcriterion_id.as_str()) {
                update(p.clone()).normalized()
            } else {
                p.clone()
            }
        })
        .collect()
}

fn id_set<S: AsRef<str>>(ids: &[S]) -> HashSet<&str> {
    ids.iter().map(AsRef::as_ref).collect()
}

fn clamp_weight(weight: i64) -> u8 {
    weight.clamp(0, MAX_WEIGHT as i64) as u8
}

/// Set the weight of one subcriterion; relevance, KO and threshold follow.
pub fn set_weight(prefs: &[Preference], id: &str, weight: i64) -> Vec<Preference> {
    set_weight_many(prefs, &[id], weight)
}

pub fn set_weight_many<S: AsRef<str>>(prefs: &[Preference], ids: &[S], weight: i64) -> Vec<Preference> {
    let weight = clamp_weight(weight);
    update_where(prefs, &id_set(ids), |p| Preference { weight, ..p })
}

/// Set weight to the canonical value for `level` (must=10, should=5, can=1, not_applicable=0).
pub fn set_relevance(prefs: &[Preference], id: &str, level: RelevanceLevel) -> Vec<Preference> {
    set_weight(prefs, id, level.default_weight() as i64)
}

pub fn set_relevance_many<S: AsRef<str>>(
    prefs: &[Preference],
    ids: &[S],
    level: RelevanceLevel,
) -> Vec<Preference> {
    set_weight_many(prefs, ids, level.default_weight() as i64)
}

/// Toggle knockout. Enabling pins the weight at 10; disabling leaves the weight alone.
/// A zero-weight (not applicable) subcriterion cannot become a knockout.
pub fn set_ko(prefs: &[Preference], id: &str, is_ko: bool) -> Vec<Preference> {
    set_ko_many(prefs, &[id], is_ko)
}

pub fn set_ko_many<S: AsRef<str>>(prefs: &[Preference], ids: &[S], is_ko: bool) -> Vec<Preference> {
    update_where(prefs, &id_set(ids), |p| Preference { is_ko, ..p })
}

/// Set the knockout threshold. Inert (reset to 2) unless knockout is active.
pub fn set_ko_threshold(prefs: &[Preference], id: &str, threshold: KoThreshold) -> Vec<Preference> {
    set_ko_threshold_many(prefs, &[id], threshold)
}

pub fn set_ko_threshold_many<S: AsRef<str>>(
    prefs: &[Preference],
    ids: &[S],
    threshold: KoThreshold,
) -> Vec<Preference> {
    update_where(prefs, &id_set(ids), |p| Preference {
        ko_threshold: threshold,
        ..p
    })
}

/// Multiply the current weight of each weighted, applicable entry by `factor`.
///
/// Zero-weight and not-applicable entries are left untouched. Results are
/// rounded and clamped back into 0..=10.
pub fn scale_weight_many<S: AsRef<str>>(prefs: &[Preference], ids: &[S], factor: f64) -> Vec<Preference> {
    if !factor.is_finite() {
        return prefs.to_vec();
    }
    let ids = id_set(ids);
    prefs
        .iter()
        .map(|p| {
            if !ids.contains(p.subcriterion_id.as_str()) || !p.is_weighted() {
                return p.clone();
            }
            let scaled = (p.weight as f64 * factor).round() as i64;
            Preference {
                weight: clamp_weight(scaled),
                ..p.clone()
            }
            .normalized()
        })
        .collect()
}

/// A bundle of optional edits applied to a group of subcriteria.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreferencePatch {
    pub is_ko: Option<bool>,
    pub weight: Option<u8>,
    pub ko_threshold: Option<KoThreshold>,
}

impl PreferencePatch {
    /// Hard knockout: must, weight 10, KO on, threshold 2.
    /// Sets weight and KO together, so unlike `set_ko` it also applies to not-applicable entries.
    pub fn hard_ko() -> Self {
        Self {
            is_ko: Some(true),
            weight: Some(MAX_WEIGHT),
            ko_threshold: Some(KoThreshold::Two),
        }
    }

    /// Soft requirement: fixed weight with knockout switched off.
    pub fn soft(weight: u8) -> Self {
        Self {
            is_ko: Some(false),
            weight: Some(weight),
            ko_threshold: None,
        }
    }

    /// Weight only; an existing knockout stays in force.
    pub fn weight(weight: u8) -> Self {
        Self {
            is_ko: None,
            weight: Some(weight),
            ko_threshold: None,
        }
    }
}

/// Apply a patch. All fields land in one step before normalizing, so a
/// hard knockout takes hold even on a zero-weight entry.
pub fn apply_patch_many<S: AsRef<str>>(
    prefs: &[Preference],
    ids: &[S],
    patch: &PreferencePatch,
) -> Vec<Preference> {
    update_where(prefs, &id_set(ids), |p| Preference {
        is_ko: patch.is_ko.unwrap_or(p.is_ko),
        weight: patch.weight.unwrap_or(p.weight),
        ko_threshold: patch.ko_threshold.unwrap_or(p.ko_threshold),
        ..p
    })
}
