//! Keyboard bindings over the playback operations.
//!
//! | Key | Command |
//! |---|---|
//! | Space | toggle play |
//! | Left | step back |
//! | Right | step forward |
//! | `r` / `R` | reset |
//!
//! Bindings are inactive while a text input has focus.

/// Host-neutral key event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Space,
    Left,
    Right,
    Char(char),
    Other,
}

/// Where keyboard focus currently is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InputFocus {
    #[default]
    Canvas,
    TextInput,
}

/// A playback operation triggered from the keyboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    TogglePlay,
    StepBack,
    StepForward,
    Reset,
}

impl Command {
    /// Resolve `key` under `focus`. `None` means the key is not ours and the
    /// host should let it through.
    pub fn from_key(key: Key, focus: InputFocus) -> Option<Self> {
        if focus == InputFocus::TextInput {
            return None;
        }
        match key {
            Key::Space | Key::Char(' ') => Some(Command::TogglePlay),
            Key::Left => Some(Command::StepBack),
            Key::Right => Some(Command::StepForward),
            Key::Char('r' | 'R') => Some(Command::Reset),
            Key::Char(_) | Key::Other => None,
        }
    }
}
