//! Input validation and canned inputs.
//!
//! The generator accepts anything, but trace size grows with
//! `len(word1) * len(word2)` and every step holds a full table copy. Callers
//! run [`validate`] first; it admits lower-case ASCII words up to
//! [`InputLimits::max_len`] characters.

use rand::Rng;

use crate::config::InputLimits;
use crate::error::{ValidationError, Word};

/// Check both words against `limits`.
pub fn validate(word1: &str, word2: &str, limits: &InputLimits) -> Result<(), ValidationError> {
    for (word, text) in [(Word::First, word1), (Word::Second, word2)] {
        let len = text.chars().count();
        if len > limits.max_len {
            return Err(ValidationError::TooLong {
                word,
                len,
                max: limits.max_len,
            });
        }
    }
    for (word, text) in [(Word::First, word1), (Word::Second, word2)] {
        if let Some((position, found)) = text.chars().enumerate().find(|(_, c)| !c.is_ascii_lowercase()) {
            return Err(ValidationError::InvalidChar {
                word,
                position,
                found,
            });
        }
    }
    Ok(())
}

/// A named example input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    pub word1: &'static str,
    pub word2: &'static str,
}

/// Input shown when a session starts.
pub const DEFAULT_PRESET: Preset = Preset {
    name: "horse",
    word1: "horse",
    word2: "ros",
};

pub const PRESETS: &[Preset] = &[
    DEFAULT_PRESET,
    Preset {
        name: "intention",
        word1: "intention",
        word2: "execution",
    },
    Preset {
        name: "simple",
        word1: "abc",
        word2: "adc",
    },
    Preset {
        name: "identical",
        word1: "same",
        word2: "same",
    },
    Preset {
        name: "empty",
        word1: "",
        word2: "abc",
    },
];

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const RANDOM_MIN_LEN: usize = 3;
const RANDOM_MAX_LEN: usize = 8;

/// Two random words of 3..=8 lower-case letters each.
pub fn random_input<R: Rng + ?Sized>(rng: &mut R) -> (String, String) {
    (random_word(rng), random_word(rng))
}

fn random_word<R: Rng + ?Sized>(rng: &mut R) -> String {
    let len = rng.gen_range(RANDOM_MIN_LEN..=RANDOM_MAX_LEN);
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}
