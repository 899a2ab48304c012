//! End-to-end wiring: input words → validation → trace → playback.
//!
//! A [`Session`] owns the current words and one [`PlaybackController`]. Each
//! accepted input produces a brand-new trace that supersedes the previous one
//! in full; rejected input leaves everything as it was.

use rand::Rng;

use crate::builder::PlaybackBuilder;
use crate::config::{InputLimits, PlaybackConfig};
use crate::error::ValidationError;
use crate::generator::generate;
use crate::playback::PlaybackController;
use crate::step::Step;
use crate::traits::{Scheduler, SettingsStore};
use crate::validate::{random_input, validate, Preset, DEFAULT_PRESET};

/// What a renderer receives: the current step and the words it refers to.
/// Read-only by construction.
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    pub step: &'a Step,
    pub word1: &'a str,
    pub word2: &'a str,
    pub index: usize,
    pub total: usize,
}

pub struct Session<S: Scheduler, K: SettingsStore> {
    limits: InputLimits,
    playback: PlaybackController<S, K>,
}

impl<S: Scheduler, K: SettingsStore> Session<S, K> {
    /// Start on [`DEFAULT_PRESET`] with default configuration.
    pub fn new(scheduler: S, store: K) -> Self {
        Self::with_config(scheduler, store, PlaybackConfig::default(), InputLimits::default())
    }

    pub fn with_config(
        scheduler: S,
        store: K,
        config: PlaybackConfig,
        limits: InputLimits,
    ) -> Self {
        let trace = generate(DEFAULT_PRESET.word1, DEFAULT_PRESET.word2);
        let playback = PlaybackBuilder::new(trace, scheduler, store)
            .with_config(config)
            .build();
        Self { limits, playback }
    }

    pub fn word1(&self) -> &str {
        self.playback.trace().word1()
    }

    pub fn word2(&self) -> &str {
        self.playback.trace().word2()
    }

    pub fn limits(&self) -> &InputLimits {
        &self.limits
    }

    pub fn playback(&self) -> &PlaybackController<S, K> {
        &self.playback
    }

    pub fn playback_mut(&mut self) -> &mut PlaybackController<S, K> {
        &mut self.playback
    }

    /// Validate and, if accepted, regenerate and rewind.
    pub fn apply_input(&mut self, word1: &str, word2: &str) -> Result<(), ValidationError> {
        if let Err(err) = validate(word1, word2, &self.limits) {
            #[cfg(feature = "tracing")]
            tracing::debug!(error = %err, "input rejected");
            return Err(err);
        }
        self.playback.load_trace(generate(word1, word2));
        Ok(())
    }

    pub fn apply_preset(&mut self, preset: &Preset) -> Result<(), ValidationError> {
        self.apply_input(preset.word1, preset.word2)
    }

    /// Load a random pair of words. Returns the words loaded.
    pub fn apply_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(String, String), ValidationError> {
        let (word1, word2) = random_input(rng);
        self.apply_input(&word1, &word2)?;
        Ok((word1, word2))
    }

    /// The view handed to rendering collaborators.
    pub fn frame(&self) -> Frame<'_> {
        let trace = self.playback.trace();
        Frame {
            step: self.playback.current_step(),
            word1: trace.word1(),
            word2: trace.word2(),
            index: self.playback.index(),
            total: trace.len(),
        }
    }
}
