use super::resolver::RailResolver;
use super::spec::RailSpec;
use crate::catalog::Catalog;
use crate::preferences::{KoThreshold, Preference, RelevanceLevel};
use std::collections::HashMap;

/// A rail together with the ids it resolved to.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRail {
    pub spec: RailSpec,
    pub ids: Vec<String>,
}

/// All configured rails resolved against one catalog.
#[derive(Debug, Clone, Default)]
pub struct RailBook {
    rails: Vec<ResolvedRail>,
    index: HashMap<String, usize>,
}

impl RailBook {
    pub fn resolve(catalog: &Catalog, specs: &[RailSpec], resolver: &dyn RailResolver) -> Self {
        let mut book = RailBook::default();
        for spec in specs {
            let ids = resolver.resolve(catalog, spec);
            tracing::debug!(rail = %spec.key, matched = ids.len(), "rail resolved");
            book.index.insert(spec.key.clone(), book.rails.len());
            book.rails.push(ResolvedRail {
                spec: spec.clone(),
                ids,
            });
        }
        book
    }

    /// Ids for a rail key; empty for unknown keys.
    pub fn ids(&self, key: &str) -> &[String] {
        self.get(key).map(|r| r.ids.as_slice()).unwrap_or(&[])
    }

    pub fn get(&self, key: &str) -> Option<&ResolvedRail> {
        self.index.get(key).map(|i| &self.rails[*i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedRail> {
        self.rails.iter()
    }

    /// Rails that matched at least one subcriterion.
    pub fn mapped(&self) -> impl Iterator<Item = &ResolvedRail> {
        self.rails.iter().filter(|r| !r.ids.is_empty())
    }
}

/// Display view of a rail's members: the first member's settings, plus
/// whether any member disagrees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RailState {
    pub weight: u8,
    pub relevance_level: RelevanceLevel,
    pub is_ko: bool,
    pub ko_threshold: KoThreshold,
    pub mixed: bool,
}

/// Aggregate state of the given ids; `None` when none of them has a preference.
pub fn rail_state<S: AsRef<str>>(prefs: &[Preference], ids: &[S]) -> Option<RailState> {
    let by_id: HashMap<&str, &Preference> = prefs
        .iter()
        .map(|p| (p.subcriterion_id.as_str(), p))
        .collect();
    let mut members = ids.iter().filter_map(|id| by_id.get(id.as_ref()).copied());

    let first = members.next()?;
    let mixed = members.any(|p| {
        p.weight != first.weight
            || p.relevance_level != first.relevance_level
            || p.is_ko != first.is_ko
            || p.ko_threshold != first.ko_threshold
    });

    Some(RailState {
        weight: first.weight,
        relevance_level: first.relevance_level,
        is_ko: first.is_ko,
        ko_threshold: first.ko_threshold,
        mixed,
    })
}
