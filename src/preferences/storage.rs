use super::domain_weights::DomainMultipliers;
use super::normalize::normalize_all;
use super::types::Preference;
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const PREFERENCES_FILE: &str = "preferences.json";
const APPLIED_FILE: &str = "applied.json";
const DOMAIN_WEIGHTS_FILE: &str = "domain_weights.json";

/// Whether the stored preference set was explicitly applied or is still a draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedFlag {
    pub applied: bool,
    pub updated_at: DateTime<Utc>,
}

/// File-backed slots for preference state under one directory.
///
/// The preference slot and the applied flag are separate files; the engine
/// never sees either, only the plain values read from them.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    dir: PathBuf,
}

impl PreferenceStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn preferences_path(&self) -> PathBuf {
        self.dir.join(PREFERENCES_FILE)
    }

    pub fn applied_path(&self) -> PathBuf {
        self.dir.join(APPLIED_FILE)
    }

    pub fn domain_weights_path(&self) -> PathBuf {
        self.dir.join(DOMAIN_WEIGHTS_FILE)
    }

    /// Read the stored preference set through the normalization boundary.
    ///
    /// A missing file yields an empty list. Unreadable JSON is treated as
    /// stale data: logged and replaced by an empty list.
    pub fn load_preferences(&self) -> Result<Vec<Preference>> {
        let path = self.preferences_path();
        let Some(file) = open_if_exists(&path)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_reader::<_, Vec<serde_json::Value>>(file) {
            Ok(raw) => Ok(normalize_all(&raw)),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable preference file");
                Ok(Vec::new())
            }
        }
    }

    pub fn save_preferences(&self, prefs: &[Preference]) -> Result<()> {
        write_json(&self.preferences_path(), &prefs)
    }

    /// Missing or unreadable flag means "not applied".
    pub fn load_applied(&self) -> Result<Option<AppliedFlag>> {
        let path = self.applied_path();
        let Some(file) = open_if_exists(&path)? else {
            return Ok(None);
        };
        match serde_json::from_reader(file) {
            Ok(flag) => Ok(Some(flag)),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable applied flag");
                Ok(None)
            }
        }
    }

    pub fn is_applied(&self) -> Result<bool> {
        Ok(self.load_applied()?.is_some_and(|f| f.applied))
    }

    pub fn set_applied(&self, applied: bool) -> Result<()> {
        let flag = AppliedFlag {
            applied,
            updated_at: Utc::now(),
        };
        write_json(&self.applied_path(), &flag)
    }

    /// Store an edited set as a draft (clears the applied flag).
    pub fn save_draft(&self, prefs: &[Preference]) -> Result<()> {
        self.save_preferences(prefs)?;
        self.set_applied(false)
    }

    /// Store a set and mark it applied.
    pub fn save_applied(&self, prefs: &[Preference]) -> Result<()> {
        self.save_preferences(prefs)?;
        self.set_applied(true)
    }

    pub fn load_domain_weights(&self) -> Result<DomainMultipliers> {
        let path = self.domain_weights_path();
        let Some(file) = open_if_exists(&path)? else {
            return Ok(DomainMultipliers::default());
        };
        match serde_json::from_reader(file) {
            Ok(m) => Ok(m),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable domain weights");
                Ok(DomainMultipliers::default())
            }
        }
    }

    pub fn save_domain_weights(&self, multipliers: &DomainMultipliers) -> Result<()> {
        write_json(&self.domain_weights_path(), multipliers)
    }

    /// Remove preference, applied flag and domain weight slots.
    pub fn clear(&self) -> Result<()> {
        for path in [
            self.preferences_path(),
            self.applied_path(),
            self.domain_weights_path(),
        ] {
            match std::fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(e).with_context(|| format!("Failed to remove {}", path.display()))
                }
            }
        }
        Ok(())
    }
}

pub(crate) fn open_if_exists(path: &Path) -> Result<Option<File>> {
    match File::open(path) {
        Ok(file) => Ok(Some(file)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to open {}", path.display())),
    }
}

/// Write JSON atomically, creating the parent directory when needed.
pub(crate) fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, value)
        .with_context(|| format!("Failed to serialize {}", path.display()))?;

    file.commit()
        .with_context(|| format!("Failed to save {}", path.display()))?;

    Ok(())
}
