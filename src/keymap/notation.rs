//! Parsing of user-authored key notation such as `<leader>f<C-o>`
//!
//! A `<` only opens a bracket when a matching `>` follows with no whitespace
//! or second `<` in between; otherwise it is a literal `<` key. Inside a
//! bracket, modifier letters are written as `C-`, `S-`, `A-`, `D-` (`M-` is
//! accepted for `D-`), followed by a key name or alias.

use thiserror::Error;

use super::types::{KeyCode, KeyToken, Keystroke, Modifiers};

/// Errors for malformed key notation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    #[error("empty key sequence")]
    Empty,

    #[error("unterminated key notation in `{0}`")]
    Unterminated(String),

    #[error("missing key name in `{0}`")]
    EmptyKeyName(String),

    #[error("unknown modifier `{modifier}` in `{notation}`")]
    UnknownModifier { modifier: char, notation: String },

    #[error("expected a single key in `{notation}`, found {count}")]
    NotSingleKey { notation: String, count: usize },
}

/// Split a notation string into canonical tokens
///
/// ```
/// use keyseq::keymap::split;
///
/// let tokens = split("<leader>f<C-o>").unwrap();
/// let text: Vec<&str> = tokens.iter().map(|t| t.as_str()).collect();
/// assert_eq!(text, ["<leader>", "f", "<C-o>"]);
/// ```
pub fn split(sequence: &str) -> Result<Vec<KeyToken>, NotationError> {
    Ok(split_keystrokes(sequence)?
        .iter()
        .map(Keystroke::token)
        .collect())
}

/// Split a notation string into keystrokes, keeping `<leader>` unresolved
pub fn split_keystrokes(sequence: &str) -> Result<Vec<Keystroke>, NotationError> {
    let chars: Vec<char> = sequence.chars().collect();
    let mut strokes = Vec::with_capacity(chars.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '<' {
            if let Some((stroke, next)) = scan_bracket(sequence, &chars, i)? {
                strokes.push(stroke);
                i = next;
                continue;
            }
        }
        strokes.push(Keystroke::char(chars[i]));
        i += 1;
    }

    Ok(strokes)
}

/// Normalize notation for exactly one key into its canonical token
pub fn normalize(notation: &str) -> Result<KeyToken, NotationError> {
    parse_keystroke(notation).map(|stroke| stroke.token())
}

/// Parse notation for exactly one key
pub fn parse_keystroke(notation: &str) -> Result<Keystroke, NotationError> {
    let mut strokes = split_keystrokes(notation)?;
    match strokes.len() {
        0 => Err(NotationError::Empty),
        1 => Ok(strokes.remove(0)),
        count => Err(NotationError::NotSingleKey {
            notation: notation.to_string(),
            count,
        }),
    }
}

/// Try to read a bracketed key starting at `start` (which holds `<`)
///
/// Returns the keystroke and the index just past the bracket, or `None` when
/// the `<` is a literal key.
fn scan_bracket(
    notation: &str,
    chars: &[char],
    start: usize,
) -> Result<Option<(Keystroke, usize)>, NotationError> {
    let mut close = None;
    for (offset, &c) in chars[start + 1..].iter().enumerate() {
        match c {
            '>' => {
                close = Some(start + 1 + offset);
                break;
            }
            '<' => break,
            c if c.is_whitespace() => break,
            _ => {}
        }
    }

    let Some(close) = close else {
        // `<C-a` is a broken modifier bracket, `<ab` is just a `<` key
        if starts_with_modifier(&chars[start + 1..]) {
            return Err(NotationError::Unterminated(notation.to_string()));
        }
        return Ok(None);
    };

    let inner = &chars[start + 1..close];
    if inner.is_empty() {
        return Ok(None);
    }

    let mut mods = Modifiers::NONE;
    let mut pos = 0;
    while pos + 1 < inner.len() && inner[pos + 1] == '-' && inner[pos].is_ascii_alphabetic() {
        // A single letter followed by `-` is a modifier, unless the `-` is the key itself
        let modifier = Modifiers::from_letter(inner[pos]).ok_or_else(|| {
            NotationError::UnknownModifier {
                modifier: inner[pos],
                notation: notation.to_string(),
            }
        })?;
        mods = mods | modifier;
        pos += 2;
    }

    let name: String = inner[pos..].iter().collect();
    if name.is_empty() {
        // `<C->>` names the `>` key
        if chars.get(close + 1) == Some(&'>') {
            return Ok(Some((
                Keystroke::char_with_mods('>', mods),
                close + 2,
            )));
        }
        return Err(NotationError::EmptyKeyName(notation.to_string()));
    }

    let key = KeyCode::from_name(&name).unwrap_or(KeyCode::Named(name));
    Ok(Some((Keystroke::new(key, mods), close + 1)))
}

fn starts_with_modifier(rest: &[char]) -> bool {
    rest.len() >= 2 && rest[1] == '-' && rest[0].is_ascii_alphabetic()
}
