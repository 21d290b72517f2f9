use crossterm::event::{KeyCode, KeyEvent, ModifierKeyCode};

/// Bucket every keypress falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Category {
    Letter,
    Number,
    FunctionKey,
    Other,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Letter,
        Category::Number,
        Category::FunctionKey,
        Category::Other,
    ];

    /// Stable slot used by the counters array
    pub fn index(self) -> usize {
        match self {
            Category::Letter => 0,
            Category::Number => 1,
            Category::FunctionKey => 2,
            Category::Other => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Letter => "Letter Keys",
            Category::Number => "Number Keys",
            Category::FunctionKey => "Function Keys",
            Category::Other => "Other Keys",
        }
    }
}

/// Classify a keypress by its logical `key` value and physical `code`.
///
/// Letters and digits are judged on `key` (exactly one ASCII char), function
/// keys on `code` (`F1` through `F12`). Anything else is `Other`.
pub fn classify(key: &str, code: &str) -> Category {
    if let Some(c) = single_char(key) {
        if c.is_ascii_alphabetic() {
            return Category::Letter;
        }
        if c.is_ascii_digit() {
            return Category::Number;
        }
    }

    if is_function_code(code) {
        return Category::FunctionKey;
    }

    Category::Other
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

fn is_function_code(code: &str) -> bool {
    let Some(digits) = code.strip_prefix('F') else {
        return false;
    };
    // reject "F01", "F+1" and friends before parsing
    if digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    matches!(digits.parse::<u8>(), Ok(1..=12))
}

/// Key descriptor in the shape of a DOM keyboard event: `key` is the produced
/// value, `code` names the physical key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyStroke {
    pub key: String,
    pub code: String,
}

impl KeyStroke {
    pub fn new(key: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            code: code.into(),
        }
    }

    pub fn category(&self) -> Category {
        classify(&self.key, &self.code)
    }
}

impl From<&KeyEvent> for KeyStroke {
    fn from(event: &KeyEvent) -> Self {
        match event.code {
            KeyCode::Char(' ') => KeyStroke::new(" ", "Space"),
            KeyCode::Char(c) if c.is_ascii_alphabetic() => {
                KeyStroke::new(c.to_string(), format!("Key{}", c.to_ascii_uppercase()))
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                KeyStroke::new(c.to_string(), format!("Digit{c}"))
            }
            KeyCode::Char(c) => KeyStroke::new(c.to_string(), c.to_string()),
            KeyCode::F(n) => {
                let name = format!("F{n}");
                KeyStroke::new(name.clone(), name)
            }
            code => {
                let name = named_key(code);
                KeyStroke::new(name, name)
            }
        }
    }
}

fn named_key(code: KeyCode) -> &'static str {
    match code {
        KeyCode::Backspace => "Backspace",
        KeyCode::Enter => "Enter",
        KeyCode::Left => "ArrowLeft",
        KeyCode::Right => "ArrowRight",
        KeyCode::Up => "ArrowUp",
        KeyCode::Down => "ArrowDown",
        KeyCode::Home => "Home",
        KeyCode::End => "End",
        KeyCode::PageUp => "PageUp",
        KeyCode::PageDown => "PageDown",
        KeyCode::Tab | KeyCode::BackTab => "Tab",
        KeyCode::Delete => "Delete",
        KeyCode::Insert => "Insert",
        KeyCode::Esc => "Escape",
        KeyCode::CapsLock => "CapsLock",
        KeyCode::ScrollLock => "ScrollLock",
        KeyCode::NumLock => "NumLock",
        KeyCode::PrintScreen => "PrintScreen",
        KeyCode::Pause => "Pause",
        KeyCode::Menu => "ContextMenu",
        KeyCode::KeypadBegin => "Clear",
        KeyCode::Media(_) => "MediaKey",
        KeyCode::Modifier(m) => modifier_name(m),
        _ => "Unidentified",
    }
}

fn modifier_name(m: ModifierKeyCode) -> &'static str {
    match m {
        ModifierKeyCode::LeftShift | ModifierKeyCode::RightShift => "Shift",
        ModifierKeyCode::LeftControl | ModifierKeyCode::RightControl => "Control",
        ModifierKeyCode::LeftAlt | ModifierKeyCode::RightAlt => "Alt",
        ModifierKeyCode::LeftSuper | ModifierKeyCode::RightSuper => "Super",
        ModifierKeyCode::LeftHyper | ModifierKeyCode::RightHyper => "Hyper",
        ModifierKeyCode::LeftMeta | ModifierKeyCode::RightMeta => "Meta",
        ModifierKeyCode::IsoLevel3Shift => "AltGraph",
        ModifierKeyCode::IsoLevel5Shift => "Level5Shift",
    }
}
