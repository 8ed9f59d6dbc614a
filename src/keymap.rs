//! Key bindings for the viewer's logical actions.
//!
//! The model never looks at physical keys. A [`KeyMap`] translates key
//! events into one of the five [`Action`]s, and can be rebound from the
//! command line or the config file with `ACTION=KEY` pairs such as
//! `quit=ctrl+q` or `next_section=tab`.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use thiserror::Error;

/// Errors produced while parsing key bindings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyMapError {
    #[error("empty key binding")]
    Empty,
    #[error("unknown modifier `{0}`")]
    UnknownModifier(String),
    #[error("unknown key `{0}`")]
    UnknownKey(String),
    #[error("unknown action `{0}`")]
    UnknownAction(String),
    #[error("expected ACTION=KEY, got `{0}`")]
    MalformedBinding(String),
}

/// Every action the viewer responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    CursorUp,
    CursorDown,
    PrevSection,
    NextSection,
}

impl Action {
    pub const ALL: &[Self] = &[
        Self::Quit,
        Self::CursorUp,
        Self::CursorDown,
        Self::PrevSection,
        Self::NextSection,
    ];

    /// Name used in `--bind` flags and the config file.
    pub const fn config_key(self) -> &'static str {
        match self {
            Self::Quit => "quit",
            Self::CursorUp => "cursor_up",
            Self::CursorDown => "cursor_down",
            Self::PrevSection => "prev_section",
            Self::NextSection => "next_section",
        }
    }
}

impl FromStr for Action {
    type Err = KeyMapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|action| action.config_key() == s.trim())
            .ok_or_else(|| KeyMapError::UnknownAction(s.trim().to_string()))
    }
}

/// A key code plus modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    /// Does this binding match a key event?
    ///
    /// Only CTRL/ALT/SHIFT are compared. SHIFT is ignored for characters and
    /// back-tab because terminals disagree on whether to report it.
    pub fn matches(&self, event: KeyEvent) -> bool {
        if self.code != event.code {
            return false;
        }
        let mut mask = KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT;
        if matches!(self.code, KeyCode::Char(_) | KeyCode::BackTab) {
            mask.remove(KeyModifiers::SHIFT);
        }
        (self.modifiers & mask) == (event.modifiers & mask)
    }

    /// Would some key event match both bindings?
    pub fn overlaps(&self, other: &KeyBind) -> bool {
        self.matches(KeyEvent::new(other.code, other.modifiers))
            || other.matches(KeyEvent::new(self.code, self.modifiers))
    }
}

impl FromStr for KeyBind {
    type Err = KeyMapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(KeyMapError::Empty);
        }

        // A trailing `+` is the plus key itself, as in `ctrl++`.
        let (prefix, key) = match s.strip_suffix("++") {
            Some(rest) => (Some(rest), "+"),
            None if s == "+" => (None, "+"),
            None => match s.rsplit_once('+') {
                Some((mods, key)) => (Some(mods), key),
                None => (None, s),
            },
        };

        let mut modifiers = KeyModifiers::NONE;
        for part in prefix.into_iter().flat_map(|p| p.split('+')) {
            match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return Err(KeyMapError::UnknownModifier(part.to_string())),
            }
        }

        let code = parse_key_code(key)?;
        if code == KeyCode::BackTab || (code == KeyCode::Tab && modifiers == KeyModifiers::SHIFT)
        {
            return Ok(Self::new(KeyCode::BackTab, KeyModifiers::SHIFT));
        }
        Ok(Self::new(code, modifiers))
    }
}

fn parse_key_code(key: &str) -> Result<KeyCode, KeyMapError> {
    let mut chars = key.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(KeyCode::Char(c));
    }
    let code = match key.to_ascii_lowercase().as_str() {
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "tab" => KeyCode::Tab,
        "backtab" => KeyCode::BackTab,
        "esc" | "escape" => KeyCode::Esc,
        "enter" | "return" => KeyCode::Enter,
        "space" => KeyCode::Char(' '),
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "" => return Err(KeyMapError::Empty),
        _ => return Err(KeyMapError::UnknownKey(key.to_string())),
    };
    Ok(code)
}

impl fmt::Display for KeyBind {
    /// Formats in the same syntax [`KeyBind::from_str`] accepts.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.code == KeyCode::BackTab {
            return f.write_str("backtab");
        }
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            f.write_str("ctrl+")?;
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            f.write_str("alt+")?;
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            f.write_str("shift+")?;
        }
        match self.code {
            KeyCode::Char(' ') => f.write_str("space"),
            KeyCode::Char(c) => write!(f, "{c}"),
            KeyCode::Up => f.write_str("up"),
            KeyCode::Down => f.write_str("down"),
            KeyCode::Left => f.write_str("left"),
            KeyCode::Right => f.write_str("right"),
            KeyCode::Tab => f.write_str("tab"),
            KeyCode::Esc => f.write_str("esc"),
            KeyCode::Enter => f.write_str("enter"),
            KeyCode::PageUp => f.write_str("pageup"),
            KeyCode::PageDown => f.write_str("pagedown"),
            KeyCode::Home => f.write_str("home"),
            KeyCode::End => f.write_str("end"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Parse an `ACTION=KEY` pair.
///
/// # Errors
///
/// Returns an error if the pair has no `=`, names an unknown action, or the
/// key cannot be parsed.
pub fn parse_binding(spec: &str) -> Result<(Action, KeyBind), KeyMapError> {
    let (action, key) = spec
        .split_once('=')
        .ok_or_else(|| KeyMapError::MalformedBinding(spec.to_string()))?;
    Ok((action.parse()?, key.parse()?))
}

/// Maps key events to actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMap {
    bindings: HashMap<Action, Vec<KeyBind>>,
}

impl Default for KeyMap {
    fn default() -> Self {
        let ch = |c| KeyBind::plain(KeyCode::Char(c));
        let bindings = HashMap::from([
            (
                Action::Quit,
                vec![
                    ch('q'),
                    KeyBind::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
                ],
            ),
            (Action::CursorUp, vec![KeyBind::plain(KeyCode::Up), ch('k')]),
            (
                Action::CursorDown,
                vec![KeyBind::plain(KeyCode::Down), ch('j')],
            ),
            (
                Action::PrevSection,
                vec![
                    KeyBind::plain(KeyCode::Left),
                    ch('h'),
                    KeyBind::new(KeyCode::BackTab, KeyModifiers::SHIFT),
                ],
            ),
            (
                Action::NextSection,
                vec![
                    KeyBind::plain(KeyCode::Right),
                    ch('l'),
                    KeyBind::plain(KeyCode::Tab),
                ],
            ),
        ]);
        Self { bindings }
    }
}

impl KeyMap {
    /// Replace every binding of `action` with `bind`.
    ///
    /// Any binding that would fire on the same key event is removed from
    /// other actions so one key never maps to two actions.
    pub fn bind(&mut self, action: Action, bind: KeyBind) {
        for binds in self.bindings.values_mut() {
            binds.retain(|b| !b.overlaps(&bind));
        }
        self.bindings.insert(action, vec![bind]);
    }

    /// Apply `ACTION=KEY` overrides in order; later pairs win.
    ///
    /// # Errors
    ///
    /// Returns the first binding that fails to parse. Earlier pairs stay
    /// applied.
    pub fn apply_overrides<S: AsRef<str>>(&mut self, specs: &[S]) -> Result<(), KeyMapError> {
        for spec in specs {
            let (action, bind) = parse_binding(spec.as_ref())?;
            tracing::debug!(action = action.config_key(), key = %bind, "rebinding key");
            self.bind(action, bind);
        }
        Ok(())
    }

    /// Bindings for `action`, empty when it has been left unbound.
    pub fn bindings(&self, action: Action) -> &[KeyBind] {
        self.bindings.get(&action).map_or(&[], Vec::as_slice)
    }

    /// The action `event` triggers, if any.
    pub fn action_for(&self, event: KeyEvent) -> Option<Action> {
        Action::ALL
            .iter()
            .copied()
            .find(|action| self.bindings(*action).iter().any(|b| b.matches(event)))
    }
}
