use crate::config::PlaybackConfig;
use crate::generator::Trace;
use crate::preferences::Preferences;
use crate::traits::{Scheduler, SettingsStore};
use crate::PlaybackController;

/// Assembles a [`PlaybackController`].
///
/// `build` loads the persisted preferences from the store before anything
/// else happens, so the restored speed is in effect from the first timer.
/// The config is passed through [`PlaybackConfig::normalized`] first.
pub struct PlaybackBuilder<S: Scheduler, K: SettingsStore> {
    trace: Trace,
    scheduler: S,
    store: K,
    config: Option<PlaybackConfig>,
}

impl<S: Scheduler, K: SettingsStore> PlaybackBuilder<S, K> {
    pub fn new(trace: Trace, scheduler: S, store: K) -> Self {
        Self {
            trace,
            scheduler,
            store,
            config: None,
        }
    }

    pub fn with_config(mut self, config: PlaybackConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn build(self) -> PlaybackController<S, K> {
        let config = self.config.unwrap_or_default().normalized();
        let preferences = Preferences::load(&self.store, &config);
        PlaybackController::from_parts(self.trace, self.scheduler, self.store, config, preferences)
    }
}
