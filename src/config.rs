//! Tunable defaults for playback and input handling.

/// Settings key for the preferred code-display language.
pub const CODE_LANGUAGE_KEY: &str = "codeLanguage";

/// Settings key for the preferred playback speed.
pub const PLAYBACK_SPEED_KEY: &str = "playbackSpeed";

/// Playback speed policy.
///
/// Speed is a multiplier: autoplay advances every `1000 / speed` ms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaybackConfig {
    /// Speed used when nothing (valid) is persisted.
    pub default_speed: f64,
    /// Lower clamp for requested speeds.
    pub min_speed: f64,
    /// Upper clamp for requested speeds.
    pub max_speed: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            default_speed: 1.0,
            min_speed: 0.5,
            max_speed: 3.0,
        }
    }
}

impl PlaybackConfig {
    /// Clamp `speed` into `[min_speed, max_speed]`.
    ///
    /// Returns `None` for NaN, infinities, zero and negative values; those
    /// requests are ignored rather than coerced.
    pub fn sanitize_speed(&self, speed: f64) -> Option<f64> {
        (speed.is_finite() && speed > 0.0).then(|| speed.clamp(self.min_speed, self.max_speed))
    }

    /// Make the policy safe to run with.
    ///
    /// Bounds that are not finite, not positive or inverted are replaced by
    /// [`PlaybackConfig::default`] as a whole. A default speed outside the
    /// bounds is clamped; an unusable one falls back to the stock default,
    /// clamped into the bounds.
    pub fn normalized(self) -> Self {
        let bounds_ok = self.min_speed.is_finite()
            && self.max_speed.is_finite()
            && self.min_speed > 0.0
            && self.min_speed <= self.max_speed;
        if !bounds_ok {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                min_speed = self.min_speed,
                max_speed = self.max_speed,
                "invalid playback speed bounds; using defaults"
            );
            return Self::default();
        }
        let default_speed = self.sanitize_speed(self.default_speed).unwrap_or_else(|| {
            Self::default()
                .default_speed
                .clamp(self.min_speed, self.max_speed)
        });
        Self {
            default_speed,
            ..self
        }
    }
}

/// Bounds enforced by [`crate::validate::validate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputLimits {
    /// Maximum length of each word, in characters.
    pub max_len: usize,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self { max_len: 500 }
    }
}
