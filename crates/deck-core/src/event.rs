#![forbid(unsafe_code)]

//! Canonical input/event types.
//!
//! Hosts translate their native input (DOM keyboard events, crossterm
//! events, scripted test input) into these types before handing them to the
//! deck. All events derive `Clone`, `PartialEq`, and `Eq` for use in tests
//! and pattern matching.
//!
//! # Design Notes
//!
//! - `KeyEventKind` defaults to `Press` when the host cannot distinguish.
//! - Key identities follow the DOM `KeyboardEvent.key` naming
//!   (`"ArrowRight"`, `"PageDown"`, ...) via [`KeyCode::from_key_name`].
//! - Mouse coordinates are 0-indexed.

use bitflags::bitflags;

/// Canonical input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A keyboard event.
    Key(KeyEvent),

    /// A mouse event (wheel scrolling is the interesting part).
    Mouse(MouseEvent),

    /// The viewport was resized.
    Resize {
        /// New viewport width.
        width: u16,
        /// New viewport height.
        height: u16,
    },
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key code that was pressed.
    pub code: KeyCode,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,

    /// The type of key event (press, repeat, or release).
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// Create a new key event with default modifiers and Press kind.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            kind: KeyEventKind::Press,
        }
    }

    /// Create a key event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Create a key event with a specific kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Build a press event from a DOM key name, if the name is recognized.
    #[must_use]
    pub fn from_key_name(name: &str) -> Option<Self> {
        KeyCode::from_key_name(name).map(Self::new)
    }

    /// Check if this is a specific character key.
    #[must_use]
    pub fn is_char(&self, c: char) -> bool {
        matches!(self.code, KeyCode::Char(ch) if ch == c)
    }

    /// Whether this event corresponds to a DOM `keydown` (press or auto-repeat).
    #[must_use]
    pub const fn is_down(&self) -> bool {
        matches!(self.kind, KeyEventKind::Press | KeyEventKind::Repeat)
    }

    /// Check if Ctrl modifier is held.
    #[must_use]
    pub const fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }

    /// Check if Shift modifier is held.
    #[must_use]
    pub const fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }
}

/// Key codes for keyboard events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A regular character key.
    Char(char),

    /// Enter/Return key.
    Enter,

    /// Escape key.
    Escape,

    /// Backspace key.
    Backspace,

    /// Tab key.
    Tab,

    /// Delete key.
    Delete,

    /// Insert key.
    Insert,

    /// Home key.
    Home,

    /// End key.
    End,

    /// Page Up key.
    PageUp,

    /// Page Down key.
    PageDown,

    /// Up arrow key.
    Up,

    /// Down arrow key.
    Down,

    /// Left arrow key.
    Left,

    /// Right arrow key.
    Right,

    /// Function key (F1-F24).
    F(u8),
}

impl KeyCode {
    /// Parse a DOM `KeyboardEvent.key` identity.
    ///
    /// Recognizes the named keys used by browsers (`"ArrowRight"`,
    /// `"PageUp"`, `"Escape"`, ...), the legacy aliases `"Esc"` and
    /// `"Spacebar"`, function keys `"F1"`..`"F24"`, and any single
    /// character. Returns `None` for everything else.
    ///
    /// ```
    /// use deck_core::event::KeyCode;
    ///
    /// assert_eq!(KeyCode::from_key_name("ArrowRight"), Some(KeyCode::Right));
    /// assert_eq!(KeyCode::from_key_name("q"), Some(KeyCode::Char('q')));
    /// assert_eq!(KeyCode::from_key_name("Hyper"), None);
    /// ```
    #[must_use]
    pub fn from_key_name(name: &str) -> Option<Self> {
        let code = match name {
            "ArrowRight" => Self::Right,
            "ArrowLeft" => Self::Left,
            "ArrowUp" => Self::Up,
            "ArrowDown" => Self::Down,
            "PageUp" => Self::PageUp,
            "PageDown" => Self::PageDown,
            "Home" => Self::Home,
            "End" => Self::End,
            "Enter" => Self::Enter,
            "Escape" | "Esc" => Self::Escape,
            "Tab" => Self::Tab,
            "Backspace" => Self::Backspace,
            "Delete" => Self::Delete,
            "Insert" => Self::Insert,
            "Spacebar" => Self::Char(' '),
            _ => return Self::parse_function_key(name).or_else(|| Self::parse_char(name)),
        };
        Some(code)
    }

    /// The DOM `KeyboardEvent.key` identity for this code.
    #[must_use]
    pub fn key_name(&self) -> String {
        match self {
            Self::Char(c) => c.to_string(),
            Self::Enter => "Enter".into(),
            Self::Escape => "Escape".into(),
            Self::Backspace => "Backspace".into(),
            Self::Tab => "Tab".into(),
            Self::Delete => "Delete".into(),
            Self::Insert => "Insert".into(),
            Self::Home => "Home".into(),
            Self::End => "End".into(),
            Self::PageUp => "PageUp".into(),
            Self::PageDown => "PageDown".into(),
            Self::Up => "ArrowUp".into(),
            Self::Down => "ArrowDown".into(),
            Self::Left => "ArrowLeft".into(),
            Self::Right => "ArrowRight".into(),
            Self::F(n) => format!("F{n}"),
        }
    }

    fn parse_function_key(name: &str) -> Option<Self> {
        let digits = name.strip_prefix('F')?;
        if digits.is_empty() || digits.starts_with('0') {
            return None;
        }
        match digits.parse::<u8>() {
            Ok(n @ 1..=24) => Some(Self::F(n)),
            _ => None,
        }
    }

    fn parse_char(name: &str) -> Option<Self> {
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(Self::Char(c)),
            _ => {
                #[cfg(feature = "tracing")]
                tracing::trace!(key = name, "unrecognized key name");
                None
            }
        }
    }
}

/// The type of key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    /// Key was pressed (default when not distinguishable).
    #[default]
    Press,

    /// Key is being held (repeat event).
    Repeat,

    /// Key was released.
    Release,
}

bitflags! {
    /// Modifier keys that can be held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Super/Meta/Command key.
        const SUPER = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

/// A mouse event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    /// The type of mouse event.
    pub kind: MouseEventKind,

    /// X coordinate (0-indexed).
    pub x: u16,

    /// Y coordinate (0-indexed).
    pub y: u16,
}

impl MouseEvent {
    /// Create a new mouse event.
    #[must_use]
    pub const fn new(kind: MouseEventKind, x: u16, y: u16) -> Self {
        Self { kind, x, y }
    }
}

/// The type of mouse event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseEventKind {
    /// Mouse moved.
    Moved,

    /// Mouse wheel scrolled up.
    ScrollUp,

    /// Mouse wheel scrolled down.
    ScrollDown,
}

// ---------------------------------------------------------------------------
// crossterm mapping
// ---------------------------------------------------------------------------

#[cfg(all(feature = "crossterm", not(target_arch = "wasm32")))]
impl Event {
    /// Map a crossterm event into a canonical event.
    ///
    /// Returns `None` for events the deck has no use for (paste, focus,
    /// mouse buttons, unmapped keys).
    #[must_use]
    pub fn from_crossterm(event: crossterm::event::Event) -> Option<Self> {
        match event {
            crossterm::event::Event::Key(key) => map_key_event(key).map(Event::Key),
            crossterm::event::Event::Mouse(mouse) => map_mouse_event(mouse).map(Event::Mouse),
            crossterm::event::Event::Resize(width, height) => Some(Event::Resize { width, height }),
            _ => None,
        }
    }
}

#[cfg(all(feature = "crossterm", not(target_arch = "wasm32")))]
fn map_key_event(event: crossterm::event::KeyEvent) -> Option<KeyEvent> {
    let code = map_key_code(event.code)?;
    Some(KeyEvent {
        code,
        modifiers: map_modifiers(event.modifiers),
        kind: match event.kind {
            crossterm::event::KeyEventKind::Press => KeyEventKind::Press,
            crossterm::event::KeyEventKind::Repeat => KeyEventKind::Repeat,
            crossterm::event::KeyEventKind::Release => KeyEventKind::Release,
        },
    })
}

#[cfg(all(feature = "crossterm", not(target_arch = "wasm32")))]
fn map_key_code(code: crossterm::event::KeyCode) -> Option<KeyCode> {
    use crossterm::event::KeyCode as Ct;
    match code {
        Ct::Backspace => Some(KeyCode::Backspace),
        Ct::Enter => Some(KeyCode::Enter),
        Ct::Left => Some(KeyCode::Left),
        Ct::Right => Some(KeyCode::Right),
        Ct::Up => Some(KeyCode::Up),
        Ct::Down => Some(KeyCode::Down),
        Ct::Home => Some(KeyCode::Home),
        Ct::End => Some(KeyCode::End),
        Ct::PageUp => Some(KeyCode::PageUp),
        Ct::PageDown => Some(KeyCode::PageDown),
        Ct::Tab => Some(KeyCode::Tab),
        Ct::Delete => Some(KeyCode::Delete),
        Ct::Insert => Some(KeyCode::Insert),
        Ct::F(n) => Some(KeyCode::F(n)),
        Ct::Char(c) => Some(KeyCode::Char(c)),
        Ct::Esc => Some(KeyCode::Escape),
        _ => None,
    }
}

#[cfg(all(feature = "crossterm", not(target_arch = "wasm32")))]
fn map_modifiers(modifiers: crossterm::event::KeyModifiers) -> Modifiers {
    let mut mapped = Modifiers::NONE;
    if modifiers.contains(crossterm::event::KeyModifiers::SHIFT) {
        mapped |= Modifiers::SHIFT;
    }
    if modifiers.contains(crossterm::event::KeyModifiers::ALT) {
        mapped |= Modifiers::ALT;
    }
    if modifiers.contains(crossterm::event::KeyModifiers::CONTROL) {
        mapped |= Modifiers::CTRL;
    }
    if modifiers.contains(crossterm::event::KeyModifiers::SUPER)
        || modifiers.contains(crossterm::event::KeyModifiers::META)
    {
        mapped |= Modifiers::SUPER;
    }
    mapped
}

#[cfg(all(feature = "crossterm", not(target_arch = "wasm32")))]
fn map_mouse_event(event: crossterm::event::MouseEvent) -> Option<MouseEvent> {
    let kind = match event.kind {
        crossterm::event::MouseEventKind::ScrollUp => MouseEventKind::ScrollUp,
        crossterm::event::MouseEventKind::ScrollDown => MouseEventKind::ScrollDown,
        crossterm::event::MouseEventKind::Moved => MouseEventKind::Moved,
        _ => return None,
    };
    Some(MouseEvent::new(kind, event.column, event.row))
}
