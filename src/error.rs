//! Error types.
//!
//! Generation and playback are total and have no error type. Only the two
//! collaborators at the edges can fail: input validation and settings storage.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Which of the two input words an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Word {
    First,
    Second,
}

impl std::fmt::Display for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Word::First => f.write_str("word1"),
            Word::Second => f.write_str("word2"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{word} is {len} characters long; the limit is {max}")]
    TooLong { word: Word, len: usize, max: usize },
    #[error("{word} may only contain lowercase letters a-z (found {found:?} at position {position})")]
    InvalidChar {
        word: Word,
        position: usize,
        found: char,
    },
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("settings file {path} is not valid json: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode settings: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("unsupported settings file version {found} (expected {expected})")]
    UnsupportedVersion { found: u64, expected: u64 },
    #[error("settings backend unavailable: {0}")]
    Unavailable(String),
}
