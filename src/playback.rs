//! Scrubbable, auto-advancing position over a [`Trace`].
//!
//! [`PlaybackController`] owns the only mutable playback state: the current
//! index, whether autoplay is running and the speed. Rendering code reads it
//! and never writes it.
//!
//! # Autoplay
//!
//! While playing, exactly one timer is armed through the [`Scheduler`]. Each
//! due timer passed to [`PlaybackController::tick`] advances the index by one
//! and re-arms with the *current* speed, so a speed change applies from the
//! next armed timer on. Reaching the last index pauses; playback never wraps.
//!
//! The armed timer is canceled on every path that leaves `Playing`, when the
//! trace is replaced and when the controller is dropped. A tick carrying any
//! other id is stale and ignored.

use crate::config::{PlaybackConfig, CODE_LANGUAGE_KEY, PLAYBACK_SPEED_KEY};
use crate::generator::Trace;
use crate::keys::{Command, InputFocus, Key};
use crate::preferences::{log_save_failure, Language, Preferences};
use crate::scheduler::TimerId;
use crate::step::Step;
use crate::traits::{Scheduler, SettingsStore};
use crate::utils::{clamp_index, tick_interval};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackStatus {
    #[default]
    Paused,
    Playing,
}

impl PlaybackStatus {
    pub fn label(self) -> &'static str {
        match self {
            PlaybackStatus::Paused => "paused",
            PlaybackStatus::Playing => "playing",
        }
    }
}

/// Snapshot of the controller's position. `0 <= index < trace.len()` always.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaybackState {
    pub index: usize,
    pub status: PlaybackStatus,
    pub speed: f64,
}

impl PlaybackState {
    #[inline]
    pub fn is_playing(&self) -> bool {
        self.status == PlaybackStatus::Playing
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Backward,
    Forward,
}

impl Direction {
    #[inline]
    fn delta(self) -> i64 {
        match self {
            Direction::Backward => -1,
            Direction::Forward => 1,
        }
    }
}

/// What a call to [`PlaybackController::tick`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The id was not the armed timer; nothing changed.
    Stale,
    /// Moved to `index`; the next timer is armed.
    Advanced { index: usize },
    /// At the last index; playback paused and nothing is armed.
    Finished { index: usize },
}

/// Playback state machine over one trace at a time.
///
/// Built through [`crate::PlaybackBuilder`], which also loads the persisted
/// preferences.
pub struct PlaybackController<S: Scheduler, K: SettingsStore> {
    trace: Trace,
    state: PlaybackState,
    config: PlaybackConfig,
    preferences: Preferences,
    scheduler: S,
    store: K,
    timer: Option<TimerId>,
}

impl<S: Scheduler, K: SettingsStore> PlaybackController<S, K> {
    pub(crate) fn from_parts(
        trace: Trace,
        scheduler: S,
        store: K,
        config: PlaybackConfig,
        preferences: Preferences,
    ) -> Self {
        Self {
            trace,
            state: PlaybackState {
                index: 0,
                status: PlaybackStatus::Paused,
                speed: preferences.speed,
            },
            config,
            preferences,
            scheduler,
            store,
            timer: None,
        }
    }

    // ----- reads -----

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.state.index
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.state.speed
    }

    /// Number of steps in the current trace.
    #[inline]
    pub fn total(&self) -> usize {
        self.trace.len()
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    /// The step at the current index.
    pub fn current_step(&self) -> &Step {
        // `index` is kept inside the non-empty trace by every mutation.
        &self.trace.steps()[self.state.index]
    }

    pub fn preferences(&self) -> Preferences {
        self.preferences
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Access for host loops that drain due timers.
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn store(&self) -> &K {
        &self.store
    }

    /// Timer currently armed for autoplay, if any.
    pub fn armed_timer(&self) -> Option<TimerId> {
        self.timer
    }

    // ----- operations -----

    /// Flip between playing and paused.
    ///
    /// Starting at the last index is allowed; the first tick then pauses
    /// without moving.
    pub fn toggle_play(&mut self) {
        match self.state.status {
            PlaybackStatus::Paused => {
                self.state.status = PlaybackStatus::Playing;
                self.arm();
                #[cfg(feature = "tracing")]
                tracing::debug!(index = self.state.index, speed = self.state.speed, "playback started");
            }
            PlaybackStatus::Playing => self.pause(),
        }
    }

    /// Move one step and pause. Clamped to the trace.
    pub fn step(&mut self, direction: Direction) {
        self.pause();
        self.state.index = clamp_index(self.state.index as i64 + direction.delta(), self.total());
    }

    /// Jump to `target`, clamped to `[0, total - 1]`. Play state is kept.
    pub fn go_to(&mut self, target: i64) {
        self.state.index = clamp_index(target, self.total());
    }

    /// Back to the first step, paused.
    pub fn reset(&mut self) {
        self.pause();
        self.state.index = 0;
    }

    /// Change the autoplay speed and persist it.
    ///
    /// An armed timer keeps its original delay; the new speed applies from
    /// the next one. Requests outside the configured range are clamped and
    /// non-positive or non-finite requests are ignored. Returns the speed in
    /// effect afterwards.
    pub fn set_speed(&mut self, speed: f64) -> f64 {
        let Some(speed) = self.config.sanitize_speed(speed) else {
            return self.state.speed;
        };
        self.state.speed = speed;
        self.preferences.speed = speed;
        log_save_failure(PLAYBACK_SPEED_KEY, self.preferences.save_speed(&mut self.store));
        #[cfg(feature = "tracing")]
        tracing::debug!(speed, "playback speed changed");
        speed
    }

    /// Change the code-display language and persist it.
    pub fn set_language(&mut self, language: Language) {
        self.preferences.language = language;
        log_save_failure(
            CODE_LANGUAGE_KEY,
            self.preferences.save_language(&mut self.store),
        );
    }

    /// Handle a due timer.
    pub fn tick(&mut self, id: TimerId) -> TickOutcome {
        if self.timer != Some(id) || !self.state.is_playing() {
            #[cfg(feature = "tracing")]
            tracing::trace!(timer = id.0, "stale tick ignored");
            return TickOutcome::Stale;
        }
        self.timer = None;

        let last = self.total().saturating_sub(1);
        if self.state.index < last {
            self.state.index += 1;
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(index = self.state.index, "tick");

        if self.state.index >= last {
            self.state.status = PlaybackStatus::Paused;
            #[cfg(feature = "tracing")]
            tracing::debug!(index = self.state.index, "playback reached the end");
            TickOutcome::Finished {
                index: self.state.index,
            }
        } else {
            self.arm();
            TickOutcome::Advanced {
                index: self.state.index,
            }
        }
    }

    /// Replace the trace. Cancels autoplay and rewinds to the first step.
    pub fn load_trace(&mut self, trace: Trace) {
        self.disarm();
        self.trace = trace;
        self.state.index = 0;
        self.state.status = PlaybackStatus::Paused;
        #[cfg(feature = "tracing")]
        tracing::debug!(steps = self.trace.len(), "trace replaced");
    }

    /// Run a keyboard command.
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::TogglePlay => self.toggle_play(),
            Command::StepBack => self.step(Direction::Backward),
            Command::StepForward => self.step(Direction::Forward),
            Command::Reset => self.reset(),
        }
    }

    /// Resolve and run a key press. Returns the command run, if any.
    pub fn handle_key(&mut self, key: Key, focus: InputFocus) -> Option<Command> {
        let command = Command::from_key(key, focus)?;
        self.apply(command);
        Some(command)
    }

    // ----- timer plumbing -----

    fn pause(&mut self) {
        if self.state.is_playing() {
            #[cfg(feature = "tracing")]
            tracing::debug!(index = self.state.index, "playback paused");
        }
        self.state.status = PlaybackStatus::Paused;
        self.disarm();
    }

    fn arm(&mut self) {
        self.disarm();
        self.timer = Some(self.scheduler.schedule(tick_interval(self.state.speed)));
    }

    fn disarm(&mut self) {
        if let Some(id) = self.timer.take() {
            self.scheduler.cancel(id);
        }
    }
}

impl<S: Scheduler, K: SettingsStore> Drop for PlaybackController<S, K> {
    fn drop(&mut self) {
        self.disarm();
    }
}

impl<S: Scheduler, K: SettingsStore> std::fmt::Debug for PlaybackController<S, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackController")
            .field("state", &self.state)
            .field("total", &self.trace.len())
            .field("preferences", &self.preferences)
            .field("timer", &self.timer)
            .finish_non_exhaustive()
    }
}
