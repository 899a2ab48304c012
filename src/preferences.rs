//! Persisted user preferences.
//!
//! [`Preferences`] is explicit state: it is loaded once from a
//! [`SettingsStore`] and written back on each change. Storage failures never
//! escape; a failed load yields the default, a failed save is logged and the
//! in-memory value stands.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::{PlaybackConfig, CODE_LANGUAGE_KEY, PLAYBACK_SPEED_KEY};
use crate::error::SettingsError;
use crate::settings::SettingValue;
use crate::traits::SettingsStore;

/// Language the code listing is shown in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Java,
    Python,
    Golang,
    Javascript,
}

impl Language {
    pub const ALL: [Language; 4] = [
        Language::Java,
        Language::Python,
        Language::Golang,
        Language::Javascript,
    ];

    /// Storage key form.
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Java => "java",
            Language::Python => "python",
            Language::Golang => "golang",
            Language::Javascript => "javascript",
        }
    }

    /// Display name.
    pub fn display_name(self) -> &'static str {
        match self {
            Language::Java => "Java",
            Language::Python => "Python",
            Language::Golang => "Go",
            Language::Javascript => "JavaScript",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|l| l.as_str() == value)
            .ok_or_else(|| format!("unknown language '{value}'"))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Preferences {
    pub language: Language,
    pub speed: f64,
}

impl Preferences {
    /// Defaults for `config`, used when nothing is stored.
    pub fn defaults(config: &PlaybackConfig) -> Self {
        Self {
            language: Language::default(),
            speed: config.default_speed,
        }
    }

    /// Read both preferences from `store`.
    ///
    /// Each key falls back to its default independently when it is missing,
    /// unreadable, of the wrong type or out of range.
    pub fn load<K: SettingsStore + ?Sized>(store: &K, config: &PlaybackConfig) -> Self {
        let defaults = Self::defaults(config);

        let language = read(store, CODE_LANGUAGE_KEY, defaults.language.as_str().into())
            .and_then(|v| v.as_str().and_then(|s| s.parse().ok()))
            .unwrap_or(defaults.language);

        let speed = read(store, PLAYBACK_SPEED_KEY, defaults.speed.into())
            .and_then(|v| v.as_f64())
            .and_then(|s| config.sanitize_speed(s))
            .unwrap_or(defaults.speed);

        #[cfg(feature = "tracing")]
        tracing::debug!(language = language.as_str(), speed, "preferences loaded");

        Self { language, speed }
    }

    /// Persist the speed.
    pub fn save_speed<K: SettingsStore + ?Sized>(&self, store: &mut K) -> Result<(), SettingsError> {
        store.set(PLAYBACK_SPEED_KEY, self.speed.into())
    }

    /// Persist the language.
    pub fn save_language<K: SettingsStore + ?Sized>(
        &self,
        store: &mut K,
    ) -> Result<(), SettingsError> {
        store.set(CODE_LANGUAGE_KEY, self.language.as_str().into())
    }
}

fn read<K: SettingsStore + ?Sized>(store: &K, key: &str, default: SettingValue) -> Option<SettingValue> {
    match store.get(key, default) {
        Ok(v) => Some(v),
        Err(_err) => {
            #[cfg(feature = "tracing")]
            tracing::warn!(key, error = %_err, "failed to read setting; using default");
            None
        }
    }
}

/// Log a failed write and drop it.
pub(crate) fn log_save_failure(key: &str, result: Result<(), SettingsError>) {
    if let Err(_err) = result {
        #[cfg(feature = "tracing")]
        tracing::warn!(key, error = %_err, "failed to persist setting");
        #[cfg(not(feature = "tracing"))]
        let _ = key;
    }
}
