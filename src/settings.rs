//! Settings storage backends.
//!
//! Two [`SettingsStore`] implementations:
//! - [`MemorySettings`]: a plain map, for tests and hosts without storage.
//! - [`JsonFileSettings`]: a small versioned JSON document on disk.
//!
//! # File Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "entries": {
//!     "playbackSpeed": { "value": 1.5, "updated_at_ms": 1760000000000 },
//!     "codeLanguage": { "value": "python", "updated_at_ms": 1760000000000 }
//!   }
//! }
//! ```
//!
//! Writes go to a temp file that is then renamed over the target.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::traits::SettingsStore;

/// Current file format version.
const FORMAT_VERSION: u64 = 1;

/// A stored preference value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Number(f64),
    Text(String),
}

impl SettingValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SettingValue::Number(n) => Some(*n),
            SettingValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingValue::Text(s) => Some(s),
            SettingValue::Number(_) => None,
        }
    }
}

impl From<f64> for SettingValue {
    fn from(n: f64) -> Self {
        SettingValue::Number(n)
    }
}

impl From<&str> for SettingValue {
    fn from(s: &str) -> Self {
        SettingValue::Text(s.to_owned())
    }
}

impl From<String> for SettingValue {
    fn from(s: String) -> Self {
        SettingValue::Text(s)
    }
}

/// In-memory store.
#[derive(Clone, Debug, Default)]
pub struct MemorySettings {
    values: HashMap<String, SettingValue>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw lookup without a default.
    pub fn value(&self, key: &str) -> Option<&SettingValue> {
        self.values.get(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str, default: SettingValue) -> Result<SettingValue, SettingsError> {
        Ok(self.values.get(key).cloned().unwrap_or(default))
    }

    fn set(&mut self, key: &str, value: SettingValue) -> Result<(), SettingsError> {
        self.values.insert(key.to_owned(), value);
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SettingsEntry {
    value: SettingValue,
    updated_at_ms: u64,
}

#[derive(Debug, Serialize, Deserialize)]
struct SettingsFile {
    version: u64,
    entries: BTreeMap<String, SettingsEntry>,
}

impl Default for SettingsFile {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            entries: BTreeMap::new(),
        }
    }
}

/// File-backed store. Every call reads the file; every write rewrites it.
///
/// - **Missing file** reads as empty (not an error).
/// - **Corrupted file** or **version mismatch** is a [`SettingsError`] on
///   read. A write replaces such a file with a fresh document holding only
///   the new entry.
/// - The parent directory must already exist.
#[derive(Clone, Debug)]
pub struct JsonFileSettings {
    path: PathBuf,
}

impl JsonFileSettings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<SettingsFile, SettingsError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(SettingsFile::default()),
            Err(source) => {
                return Err(SettingsError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        let file: SettingsFile =
            serde_json::from_str(&contents).map_err(|source| SettingsError::Parse {
                path: self.path.clone(),
                source,
            })?;
        if file.version != FORMAT_VERSION {
            return Err(SettingsError::UnsupportedVersion {
                found: file.version,
                expected: FORMAT_VERSION,
            });
        }
        Ok(file)
    }

    /// Like [`load`](Self::load), but an unreadable document is discarded
    /// so the write can replace it. I/O errors still propagate.
    fn load_for_write(&self) -> Result<SettingsFile, SettingsError> {
        match self.load() {
            Err(_err @ (SettingsError::Parse { .. } | SettingsError::UnsupportedVersion { .. })) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(path = %self.path.display(), error = %_err, "discarding unreadable settings file");
                Ok(SettingsFile::default())
            }
            other => other,
        }
    }

    fn store(&self, file: &SettingsFile) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(file).map_err(SettingsError::Encode)?;
        let temp = self.path.with_extension("json.tmp");
        let io_err = |source| SettingsError::Io {
            path: self.path.clone(),
            source,
        };
        fs::write(&temp, json).map_err(io_err)?;
        fs::rename(&temp, &self.path).map_err(io_err)?;
        Ok(())
    }
}

impl SettingsStore for JsonFileSettings {
    fn get(&self, key: &str, default: SettingValue) -> Result<SettingValue, SettingsError> {
        let file = self.load()?;
        Ok(file
            .entries
            .get(key)
            .map(|e| e.value.clone())
            .unwrap_or(default))
    }

    fn set(&mut self, key: &str, value: SettingValue) -> Result<(), SettingsError> {
        let mut file = self.load_for_write()?;
        file.entries.insert(
            key.to_owned(),
            SettingsEntry {
                value,
                updated_at_ms: now_ms(),
            },
        );
        self.store(&file)
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
