//! Capability traits the playback side depends on.
//!
//! The controller never touches a clock or a storage backend directly. It is
//! handed two capabilities:
//! - [`Scheduler`]: arm a one-shot timer for a duration and cancel it later.
//! - [`SettingsStore`]: read and write small scalar preferences by key.
//!
//! Hosts plug in real implementations (see [`crate::scheduler`] and
//! [`crate::settings`]); tests plug in doubles that fire synchronously or
//! fail on demand.

use std::time::Duration;

use crate::error::SettingsError;
use crate::scheduler::TimerId;
use crate::settings::SettingValue;

/// Schedule one callback after a duration; cancelable.
///
/// The scheduler only hands out [`TimerId`]s. When a timer is due the host
/// passes its id back to [`crate::PlaybackController::tick`], which ignores
/// ids it no longer owns. A canceled timer must never be reported as due.
pub trait Scheduler {
    /// Arm a timer that becomes due after `delay`.
    fn schedule(&mut self, delay: Duration) -> TimerId;

    /// Disarm `id`. Canceling an unknown or already-fired id is a no-op.
    fn cancel(&mut self, id: TimerId);
}

/// Key/value preference storage.
///
/// Values are plain scalars. Callers treat every failure as recoverable: a
/// failed read falls back to the default, a failed write is logged and
/// dropped.
pub trait SettingsStore {
    /// Value stored under `key`, or `default` when nothing is stored.
    fn get(&self, key: &str, default: SettingValue) -> Result<SettingValue, SettingsError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: SettingValue) -> Result<(), SettingsError>;
}

impl<S: Scheduler + ?Sized> Scheduler for &mut S {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        (**self).schedule(delay)
    }

    fn cancel(&mut self, id: TimerId) {
        (**self).cancel(id)
    }
}

impl<K: SettingsStore + ?Sized> SettingsStore for &mut K {
    fn get(&self, key: &str, default: SettingValue) -> Result<SettingValue, SettingsError> {
        (**self).get(key, default)
    }

    fn set(&mut self, key: &str, value: SettingValue) -> Result<(), SettingsError> {
        (**self).set(key, value)
    }
}

impl<K: SettingsStore + ?Sized> SettingsStore for Box<K> {
    fn get(&self, key: &str, default: SettingValue) -> Result<SettingValue, SettingsError> {
        (**self).get(key, default)
    }

    fn set(&mut self, key: &str, value: SettingValue) -> Result<(), SettingsError> {
        (**self).set(key, value)
    }
}
