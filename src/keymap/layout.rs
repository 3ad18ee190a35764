//! Physical keyboard layouts used to remap keys by position

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// When bindings should be matched by physical key position instead of the
/// character the OS produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutPolicy {
    /// Always translate through the active layout
    Force,
    /// Never translate, use the logical key verbatim
    Never,
    /// Translate only when the macOS Option key is held, where it would
    /// otherwise produce diacritics instead of the bound character
    #[default]
    #[serde(alias = "for_macos_option_modifier")]
    Auto,
}

/// Host platform, only relevant for [`LayoutPolicy::Auto`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Other,
}

impl Platform {
    pub fn current() -> Platform {
        if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Other
        }
    }
}

/// Map from physical key code (`KeyA`, `BracketLeft`) to `[unshifted, shifted]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyboardLayout {
    keys: BTreeMap<String, [char; 2]>,
}

impl KeyboardLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the characters for a physical key
    pub fn with_key(mut self, code: impl Into<String>, unshifted: char, shifted: char) -> Self {
        self.keys.insert(code.into(), [unshifted, shifted]);
        self
    }

    /// Character produced by `code`, or `None` for codes the layout lacks
    pub fn translate(&self, code: &str, shift: bool) -> Option<char> {
        self.keys
            .get(code)
            .map(|pair| if shift { pair[1] } else { pair[0] })
    }

    /// Physical key producing `c`, and whether shift is needed
    pub fn code_for(&self, c: char) -> Option<(&str, bool)> {
        self.keys.iter().find_map(|(code, pair)| {
            if pair[0] == c {
                Some((code.as_str(), false))
            } else if pair[1] == c {
                Some((code.as_str(), true))
            } else {
                None
            }
        })
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The builtin US qwerty layout
    pub fn qwerty() -> Self {
        let mut keys = BTreeMap::new();

        for c in 'a'..='z' {
            keys.insert(
                format!("Key{}", c.to_ascii_uppercase()),
                [c, c.to_ascii_uppercase()],
            );
        }

        const DIGITS: [(char, char); 10] = [
            ('0', ')'),
            ('1', '!'),
            ('2', '@'),
            ('3', '#'),
            ('4', '$'),
            ('5', '%'),
            ('6', '^'),
            ('7', '&'),
            ('8', '*'),
            ('9', '('),
        ];
        for (digit, shifted) in DIGITS {
            keys.insert(format!("Digit{}", digit), [digit, shifted]);
        }

        const PUNCTUATION: [(&str, char, char); 12] = [
            ("Minus", '-', '_'),
            ("Equal", '=', '+'),
            ("BracketLeft", '[', '{'),
            ("BracketRight", ']', '}'),
            ("Backslash", '\\', '|'),
            ("Semicolon", ';', ':'),
            ("Quote", '\'', '"'),
            ("Comma", ',', '<'),
            ("Period", '.', '>'),
            ("Slash", '/', '?'),
            ("Backquote", '`', '~'),
            ("Space", ' ', ' '),
        ];
        for (code, unshifted, shifted) in PUNCTUATION {
            keys.insert(code.to_string(), [unshifted, shifted]);
        }

        Self { keys }
    }
}

/// Named layouts, with `qwerty` always present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutRegistry {
    layouts: HashMap<String, KeyboardLayout>,
}

pub const BUILTIN_LAYOUT: &str = "qwerty";

impl Default for LayoutRegistry {
    fn default() -> Self {
        let mut layouts = HashMap::new();
        layouts.insert(BUILTIN_LAYOUT.to_string(), KeyboardLayout::qwerty());
        Self { layouts }
    }
}

impl LayoutRegistry {
    /// Registry with the builtin layout plus `custom` (custom entries win)
    pub fn with_custom<'a>(
        custom: impl IntoIterator<Item = (&'a String, &'a KeyboardLayout)>,
    ) -> Self {
        let mut registry = Self::default();
        for (name, layout) in custom {
            registry.register(name.clone(), layout.clone());
        }
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, layout: KeyboardLayout) {
        self.layouts.insert(name.into(), layout);
    }

    pub fn get(&self, name: &str) -> Option<&KeyboardLayout> {
        self.layouts.get(name)
    }

    /// Sorted layout names
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.layouts.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qwerty_letters_and_digits() {
        let qwerty = KeyboardLayout::qwerty();
        assert_eq!(qwerty.translate("KeyA", false), Some('a'));
        assert_eq!(qwerty.translate("KeyA", true), Some('A'));
        assert_eq!(qwerty.translate("Digit1", true), Some('!'));
        assert_eq!(qwerty.translate("Digit0", true), Some(')'));
    }

    #[test]
    fn test_qwerty_punctuation() {
        let qwerty = KeyboardLayout::qwerty();
        assert_eq!(qwerty.translate("BracketLeft", false), Some('['));
        assert_eq!(qwerty.translate("Backslash", true), Some('|'));
        assert_eq!(qwerty.translate("Comma", true), Some('<'));
        assert_eq!(qwerty.translate("Backquote", true), Some('~'));
    }

    #[test]
    fn test_code_for_reverses_translate() {
        let qwerty = KeyboardLayout::qwerty();
        assert_eq!(qwerty.code_for('e'), Some(("KeyE", false)));
        assert_eq!(qwerty.code_for('!'), Some(("Digit1", true)));
        assert_eq!(qwerty.code_for('щ'), None);
    }

    #[test]
    fn test_unknown_code() {
        assert_eq!(KeyboardLayout::qwerty().translate("Escape", false), None);
    }

    #[test]
    fn test_policy_yaml_names() {
        let policy: LayoutPolicy = serde_yaml::from_str("force").unwrap();
        assert_eq!(policy, LayoutPolicy::Force);
        let policy: LayoutPolicy = serde_yaml::from_str("for_macos_option_modifier").unwrap();
        assert_eq!(policy, LayoutPolicy::Auto);
    }

    #[test]
    fn test_registry_custom_layout() {
        let mut custom = HashMap::new();
        custom.insert(
            "colemak".to_string(),
            KeyboardLayout::new().with_key("KeyE", 'f', 'F'),
        );
        let registry = LayoutRegistry::with_custom(&custom);
        assert_eq!(registry.names(), ["colemak", "qwerty"]);
        assert_eq!(
            registry.get("colemak").unwrap().translate("KeyE", false),
            Some('f')
        );
    }
}
