//! Core types for the keymap system: Modifiers, KeyCode, Keystroke, KeyToken

use std::fmt;

use serde::{Deserialize, Serialize};

/// Modifier keys as a bitfield for efficient storage and comparison
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const CTRL: Modifiers = Modifiers(0b0001);
    pub const SHIFT: Modifiers = Modifiers(0b0010);
    pub const ALT: Modifiers = Modifiers(0b0100);
    pub const META: Modifiers = Modifiers(0b1000); // Cmd on macOS, Win elsewhere

    /// Create modifiers from individual flags
    pub const fn new(ctrl: bool, shift: bool, alt: bool, meta: bool) -> Self {
        let mut bits = 0u8;
        if ctrl {
            bits |= 0b0001;
        }
        if shift {
            bits |= 0b0010;
        }
        if alt {
            bits |= 0b0100;
        }
        if meta {
            bits |= 0b1000;
        }
        Modifiers(bits)
    }

    /// Check if ctrl is held
    #[inline]
    pub const fn ctrl(self) -> bool {
        self.0 & 0b0001 != 0
    }

    /// Check if shift is held
    #[inline]
    pub const fn shift(self) -> bool {
        self.0 & 0b0010 != 0
    }

    /// Check if alt/option is held
    #[inline]
    pub const fn alt(self) -> bool {
        self.0 & 0b0100 != 0
    }

    /// Check if meta (cmd/win) is held
    #[inline]
    pub const fn meta(self) -> bool {
        self.0 & 0b1000 != 0
    }

    /// Check if no modifiers are held
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Combine two modifier sets
    #[inline]
    pub const fn union(self, other: Modifiers) -> Modifiers {
        Modifiers(self.0 | other.0)
    }

    /// Remove every modifier in `other`
    #[inline]
    pub const fn without(self, other: Modifiers) -> Modifiers {
        Modifiers(self.0 & !other.0)
    }

    /// Check if this contains all modifiers in other
    #[inline]
    pub const fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Modifier for a notation letter (`C`, `S`, `A`, `D`, with `M` as an alias of `D`)
    pub fn from_letter(letter: char) -> Option<Modifiers> {
        match letter.to_ascii_uppercase() {
            'C' => Some(Modifiers::CTRL),
            'S' => Some(Modifiers::SHIFT),
            'A' => Some(Modifiers::ALT),
            'D' | 'M' => Some(Modifiers::META),
            _ => None,
        }
    }

    /// Canonical notation prefix, e.g. `C-S-` for ctrl+shift
    pub fn prefix(self) -> String {
        let mut out = String::with_capacity(8);
        if self.ctrl() {
            out.push_str("C-");
        }
        if self.shift() {
            out.push_str("S-");
        }
        if self.alt() {
            out.push_str("A-");
        }
        if self.meta() {
            out.push_str("D-");
        }
        out
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.ctrl() {
            parts.push("Ctrl");
        }
        if self.shift() {
            parts.push("Shift");
        }
        if self.alt() {
            parts.push(if cfg!(target_os = "macos") {
                "Option"
            } else {
                "Alt"
            });
        }
        if self.meta() {
            parts.push(if cfg!(target_os = "macos") {
                "Cmd"
            } else {
                "Win"
            });
        }
        write!(f, "{}", parts.join("+"))
    }
}

/// A key code representing a logical key
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A printable character, case preserved
    Char(char),

    // Named keys
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    Space,

    // Arrow keys
    Up,
    Down,
    Left,
    Right,

    // Navigation
    Home,
    End,
    PageUp,
    PageDown,
    Insert,

    // Function keys
    F(u8), // F1-F24

    /// Placeholder resolved to the configured leader key when bindings are built
    Leader,

    /// Any other symbolic key, kept verbatim
    Named(String),
}

impl KeyCode {
    /// Key code for a single character; a space is always the symbolic `Space`
    pub fn from_char(c: char) -> KeyCode {
        if c == ' ' {
            KeyCode::Space
        } else {
            KeyCode::Char(c)
        }
    }

    /// Resolve a symbolic name or alias, case-insensitively
    ///
    /// Single characters resolve to [`KeyCode::Char`] with their case intact.
    /// Returns `None` for names that are not known.
    pub fn from_name(name: &str) -> Option<KeyCode> {
        let mut chars = name.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Some(KeyCode::from_char(c));
        }

        let lower = name.to_ascii_lowercase();
        let code = match lower.as_str() {
            "lt" | "less" => KeyCode::Char('<'),
            "gt" => KeyCode::Char('>'),
            "bar" => KeyCode::Char('|'),
            "bslash" | "backslash" => KeyCode::Char('\\'),
            "space" => KeyCode::Space,
            "esc" | "escape" => KeyCode::Escape,
            "cr" | "enter" | "return" => KeyCode::Enter,
            "tab" => KeyCode::Tab,
            "bs" | "backspace" => KeyCode::Backspace,
            "del" | "delete" => KeyCode::Delete,
            "up" | "arrowup" => KeyCode::Up,
            "down" | "arrowdown" => KeyCode::Down,
            "left" | "arrowleft" => KeyCode::Left,
            "right" | "arrowright" => KeyCode::Right,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdown" | "pgdn" => KeyCode::PageDown,
            "insert" | "ins" => KeyCode::Insert,
            "leader" => KeyCode::Leader,
            other => {
                let n = other.strip_prefix('f')?.parse::<u8>().ok()?;
                if (1..=24).contains(&n) {
                    KeyCode::F(n)
                } else {
                    return None;
                }
            }
        };
        Some(code)
    }

    /// Key code for the logical `key` value of a raw keyboard event
    pub fn from_key_value(key: &str) -> KeyCode {
        KeyCode::from_name(key).unwrap_or_else(|| KeyCode::Named(key.to_string()))
    }

    /// Name used inside a bracketed token
    pub fn notation_name(&self) -> String {
        match self {
            KeyCode::Char('<') => "lt".to_string(),
            KeyCode::Char('|') => "Bar".to_string(),
            KeyCode::Char('\\') => "Bslash".to_string(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Enter => "CR".to_string(),
            KeyCode::Escape => "Esc".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::Backspace => "BS".to_string(),
            KeyCode::Delete => "Del".to_string(),
            KeyCode::Space => "Space".to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
            KeyCode::Left => "Left".to_string(),
            KeyCode::Right => "Right".to_string(),
            KeyCode::Home => "Home".to_string(),
            KeyCode::End => "End".to_string(),
            KeyCode::PageUp => "PageUp".to_string(),
            KeyCode::PageDown => "PageDown".to_string(),
            KeyCode::Insert => "Insert".to_string(),
            KeyCode::F(n) => format!("F{}", n),
            KeyCode::Leader => "leader".to_string(),
            KeyCode::Named(name) => name.clone(),
        }
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.notation_name())
    }
}

/// A single keystroke: a key with modifiers
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Keystroke {
    pub key: KeyCode,
    pub mods: Modifiers,
}

impl Keystroke {
    /// Create a new keystroke
    pub const fn new(key: KeyCode, mods: Modifiers) -> Self {
        Self { key, mods }
    }

    /// Create a keystroke with no modifiers
    pub const fn key(key: KeyCode) -> Self {
        Self {
            key,
            mods: Modifiers::NONE,
        }
    }

    /// Create a keystroke with a character key
    pub fn char(c: char) -> Self {
        Self::key(KeyCode::from_char(c))
    }

    /// Create a keystroke with a character and modifiers
    pub fn char_with_mods(c: char, mods: Modifiers) -> Self {
        Self::new(KeyCode::from_char(c), mods)
    }

    /// Canonical token for this keystroke
    ///
    /// Shift on a cased letter is folded into the uppercase letter. A
    /// printable character with no modifier other than shift is bare;
    /// everything else is bracketed with the modifier prefix in `C-S-A-D`
    /// order.
    pub fn token(&self) -> KeyToken {
        let mut mods = self.mods;
        let key = match &self.key {
            KeyCode::Char(c) if mods.shift() && has_case(*c) => {
                mods = mods.without(Modifiers::SHIFT);
                KeyCode::Char(uppercase(*c))
            }
            other => other.clone(),
        };

        if let KeyCode::Char(c) = key {
            if mods.without(Modifiers::SHIFT).is_empty() {
                return KeyToken(c.to_string());
            }
        }

        KeyToken(format!("<{}{}>", mods.prefix(), key.notation_name()))
    }

    /// Keystroke with the leader placeholder replaced by `leader`
    ///
    /// Modifiers written on the placeholder (`<D-leader>`) are merged onto
    /// the leader keystroke.
    pub fn resolve_leader(&self, leader: &Keystroke) -> Keystroke {
        match self.key {
            KeyCode::Leader => Keystroke::new(leader.key.clone(), leader.mods | self.mods),
            _ => self.clone(),
        }
    }
}

impl fmt::Display for Keystroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

fn has_case(c: char) -> bool {
    c.is_lowercase() || c.is_uppercase()
}

fn uppercase(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

/// Canonical string for one logical keypress
///
/// Either a single visible character (`a`, `A`, `|`, `<`) or a bracketed
/// symbolic token (`<C-S-Left>`, `<Esc>`, `<C-lt>`). Two keypresses that mean
/// the same thing always produce equal tokens.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct KeyToken(String);

impl KeyToken {
    /// Token for an unmodified character
    pub fn char(c: char) -> KeyToken {
        Keystroke::char(c).token()
    }

    /// The canonical text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The character of a bare single-character token
    pub fn as_char(&self) -> Option<char> {
        let mut chars = self.0.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }

    /// Whether this token still carries the unresolved leader placeholder
    pub fn is_leader(&self) -> bool {
        self.0.ends_with("leader>")
    }
}

impl fmt::Display for KeyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<KeyToken> for String {
    fn from(token: KeyToken) -> Self {
        token.0
    }
}

impl TryFrom<String> for KeyToken {
    type Error = super::NotationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        super::notation::normalize(&value)
    }
}

impl std::str::FromStr for KeyToken {
    type Err = super::NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        super::notation::normalize(s)
    }
}

/// Join tokens into the text shown for a pending or bound sequence
pub fn display_sequence(tokens: &[KeyToken]) -> String {
    tokens.iter().map(KeyToken::as_str).collect()
}
