//! Step-by-step traces of the edit-distance dynamic program.
//!
//! This crate turns a pair of words into an immutable, replayable record of
//! every step the classic Levenshtein table-filling algorithm takes, and
//! provides a playback controller that scrubs through that record by hand or
//! on a timer.
//!
//! ## Core idea
//! 1. [`TraceGenerator`] runs the DP once and records a [`Step`] for every
//!    observable action: bootstrapping, filling the first row and column,
//!    comparing characters, and resolving each interior cell. Each step owns a
//!    full snapshot of the cost table and of the per-cell states.
//! 2. [`PlaybackController`] keeps the current index into the [`Trace`],
//!    arms one timer at a time through a [`Scheduler`] while autoplaying, and
//!    persists speed and language preferences through a [`SettingsStore`].
//! 3. [`Session`] wires input validation, generation and playback together.
//!
//! ## Quick start
//! ```
//! use ed_trace::{generate, scheduler::ManualScheduler, settings::MemorySettings};
//! use ed_trace::PlaybackBuilder;
//!
//! let trace = generate("horse", "ros");
//! assert_eq!(trace.len(), 39);
//! assert_eq!(trace.distance(), 3);
//!
//! let mut playback =
//!     PlaybackBuilder::new(trace, ManualScheduler::new(), MemorySettings::new()).build();
//! playback.toggle_play();
//! let id = playback.scheduler_mut().fire_next().unwrap();
//! playback.tick(id);
//! assert_eq!(playback.index(), 1);
//! ```
//!
//! ## Step count
//! For words of length `n1` and `n2` a trace holds exactly
//! `1 + n2 + n1 + 2 * n1 * n2` steps: one bootstrap, one per first-row and
//! first-column cell, and a compare/resolve pair per interior cell. The last
//! step also carries the completion: the answer cell turns final and the
//! narrative reports the distance.

pub mod builder;
pub mod config;
pub mod error;
pub mod generator;
pub mod keys;
pub mod playback;
pub mod preferences;
pub mod scheduler;
pub mod session;
pub mod settings;
pub mod step;
pub mod traits;
pub mod utils;
pub mod validate;

pub use crate::builder::PlaybackBuilder;
pub use crate::error::{SettingsError, ValidationError};
pub use crate::generator::{generate, PathStep, Trace, TraceGenerator};
pub use crate::playback::{Direction, PlaybackController, PlaybackState, PlaybackStatus, TickOutcome};
pub use crate::session::{Frame, Session};
pub use crate::step::{CellRef, CellState, Step};
pub use crate::traits::{Scheduler, SettingsStore};
