use crate::preferences::storage::{open_if_exists, write_json};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const MAX_COMPARE: usize = 3;
const SELECTION_FILE: &str = "selection.json";
const SELECTION_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
    /// Selection already holds the maximum; nothing changed.
    Full,
}

/// Products picked for side-by-side comparison, in pick order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareSelection {
    version: u32,
    #[serde(default)]
    product_ids: Vec<String>,
}

impl Default for CompareSelection {
    fn default() -> Self {
        Self {
            version: SELECTION_VERSION,
            product_ids: Vec::new(),
        }
    }
}

impl CompareSelection {
    /// Selection from `ids`, skipping repeats and anything past the limit.
    pub fn new<S: AsRef<str>>(ids: &[S]) -> Self {
        let mut selection = Self::default();
        for id in ids {
            if !selection.contains(id.as_ref()) {
                selection.toggle(id.as_ref());
            }
        }
        selection
    }

    pub fn product_ids(&self) -> &[String] {
        &self.product_ids
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.product_ids.iter().any(|id| id == product_id)
    }

    pub fn is_empty(&self) -> bool {
        self.product_ids.is_empty()
    }

    /// Remove `product_id` if present, otherwise append it unless full.
    pub fn toggle(&mut self, product_id: &str) -> ToggleOutcome {
        if self.contains(product_id) {
            self.product_ids.retain(|id| id != product_id);
            ToggleOutcome::Removed
        } else if self.product_ids.len() >= MAX_COMPARE {
            ToggleOutcome::Full
        } else {
            self.product_ids.push(product_id.to_string());
            ToggleOutcome::Added
        }
    }
}

pub struct SelectionStore {
    path: PathBuf,
}

impl SelectionStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(SELECTION_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing or unreadable selection files load as an empty selection.
    pub fn load(&self) -> Result<CompareSelection> {
        let Some(file) = open_if_exists(&self.path)? else {
            return Ok(CompareSelection::default());
        };
        match serde_json::from_reader::<_, CompareSelection>(file) {
            Ok(stored) => Ok(CompareSelection::new(&stored.product_ids)),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring unreadable selection");
                Ok(CompareSelection::default())
            }
        }
    }

    pub fn save(&self, selection: &CompareSelection) -> Result<()> {
        write_json(&self.path, selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_store(name: &str) -> (SelectionStore, PathBuf) {
        let dir = env::temp_dir().join(format!("criteria_compass_selection_{}", name));
        let _ = std::fs::remove_dir_all(&dir);
        (SelectionStore::new(&dir), dir)
    }

    #[test]
    fn test_toggle_adds_and_removes() {
        let mut sel = CompareSelection::default();
        assert_eq!(sel.toggle("a"), ToggleOutcome::Added);
        assert_eq!(sel.toggle("b"), ToggleOutcome::Added);
        assert_eq!(sel.toggle("a"), ToggleOutcome::Removed);
        assert_eq!(sel.product_ids(), ["b".to_string()]);
    }

    #[test]
    fn test_toggle_refuses_fourth() {
        let mut sel = CompareSelection::new(&["a", "b", "c"]);
        assert_eq!(sel.toggle("d"), ToggleOutcome::Full);
        assert_eq!(sel.product_ids().len(), MAX_COMPARE);
        assert!(!sel.contains("d"));
        assert_eq!(sel.toggle("b"), ToggleOutcome::Removed);
        assert_eq!(sel.toggle("d"), ToggleOutcome::Added);
    }

    #[test]
    fn test_new_caps_and_dedups() {
        let sel = CompareSelection::new(&["a", "b", "a", "c", "e"]);
        assert_eq!(sel.product_ids(), ["a", "b", "c"].map(String::from));
    }

    #[test]
    fn test_store_roundtrip() {
        let (store, dir) = temp_store("roundtrip");
        assert!(store.load().unwrap().is_empty());

        let sel = CompareSelection::new(&["x", "y"]);
        store.save(&sel).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(json["version"], 1);
        assert_eq!(store.load().unwrap(), sel);

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_store_corrupt_is_empty() {
        let (store, dir) = temp_store("corrupt");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(store.path(), "[not json").unwrap();
        assert!(store.load().unwrap().is_empty());
        std::fs::remove_dir_all(dir).ok();
    }
}
