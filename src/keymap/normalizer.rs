//! Converts raw keyboard events into canonical key tokens

use serde::{Deserialize, Serialize};

use super::layout::{KeyboardLayout, LayoutPolicy, Platform};
use super::types::{KeyCode, KeyToken, Keystroke, Modifiers};

/// A keyboard event as delivered by the host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawKeyEvent {
    /// Logical key value (`"a"`, `"A"`, `"Escape"`, `" "`)
    pub key: String,
    /// Physical key code (`"KeyA"`), if the host knows it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub meta: bool,
}

const MODIFIER_KEYS: [&str; 10] = [
    "Shift", "Control", "Alt", "AltGraph", "Meta", "OS", "Super", "Hyper", "CapsLock", "Fn",
];

impl RawKeyEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_mods(mut self, mods: Modifiers) -> Self {
        self.ctrl = mods.ctrl();
        self.shift = mods.shift();
        self.alt = mods.alt();
        self.meta = mods.meta();
        self
    }

    pub fn mods(&self) -> Modifiers {
        Modifiers::new(self.ctrl, self.shift, self.alt, self.meta)
    }

    /// Whether the event is a bare modifier press (Shift, Control, ...)
    pub fn is_modifier_only(&self) -> bool {
        MODIFIER_KEYS.contains(&self.key.as_str())
    }

    /// Synthesize the event a keyboard would send for `stroke`
    ///
    /// Used to replay notation through the same path as real input.
    pub fn from_keystroke(stroke: &Keystroke) -> Self {
        let key = match &stroke.key {
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Space => " ".to_string(),
            KeyCode::Escape => "Escape".to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Backspace => "Backspace".to_string(),
            KeyCode::Delete => "Delete".to_string(),
            KeyCode::Up => "ArrowUp".to_string(),
            KeyCode::Down => "ArrowDown".to_string(),
            KeyCode::Left => "ArrowLeft".to_string(),
            KeyCode::Right => "ArrowRight".to_string(),
            other => other.notation_name(),
        };

        let mut mods = stroke.mods;
        if let KeyCode::Char(c) = stroke.key {
            if c.is_uppercase() {
                mods = mods | Modifiers::SHIFT;
            }
        }

        RawKeyEvent::new(key).with_mods(mods)
    }
}

/// Normalizes events against one layout and policy
#[derive(Debug, Clone, Copy)]
pub struct KeyNormalizer<'a> {
    layout: Option<&'a KeyboardLayout>,
    policy: LayoutPolicy,
    platform: Platform,
}

impl<'a> KeyNormalizer<'a> {
    pub fn new(layout: Option<&'a KeyboardLayout>, policy: LayoutPolicy) -> Self {
        Self {
            layout,
            policy,
            platform: Platform::current(),
        }
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Keystroke for `event`, translated through the layout when the policy asks for it
    pub fn keystroke(&self, event: &RawKeyEvent) -> Keystroke {
        let mods = event.mods();
        let physical = self
            .use_physical_layout(event)
            .then(|| {
                let code = event.code.as_deref()?;
                self.layout?.translate(code, event.shift)
            })
            .flatten();

        match physical {
            Some(c) => Keystroke::char_with_mods(c, mods),
            None => Keystroke::new(KeyCode::from_key_value(&event.key), mods),
        }
    }

    /// Canonical token for `event`
    pub fn normalize(&self, event: &RawKeyEvent) -> KeyToken {
        self.keystroke(event).token()
    }

    fn use_physical_layout(&self, event: &RawKeyEvent) -> bool {
        match self.policy {
            LayoutPolicy::Force => true,
            LayoutPolicy::Never => false,
            LayoutPolicy::Auto => event.alt && self.platform == Platform::MacOs,
        }
    }
}

/// One-shot normalization
pub fn normalize_event(
    event: &RawKeyEvent,
    layout: Option<&KeyboardLayout>,
    policy: LayoutPolicy,
) -> KeyToken {
    KeyNormalizer::new(layout, policy).normalize(event)
}
