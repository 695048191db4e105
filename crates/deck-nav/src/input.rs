#![forbid(unsafe_code)]

//! Keyboard dispatch.
//!
//! | Key                     | Command          | Default action |
//! |-------------------------|------------------|----------------|
//! | `ArrowRight`, `PageDown`| [`NavCommand::Next`] | prevented  |
//! | `ArrowLeft`, `PageUp`   | [`NavCommand::Prev`] | prevented  |
//! | anything else           | none             | host handles it |
//!
//! Bindings come from [`KeyMap`], which defaults to the table above and can
//! be rebuilt from [`KeyBindings`]. Press and repeat events dispatch;
//! releases and modifier state are ignored.

use std::collections::HashMap;

use deck_core::event::{Event, KeyCode};

use crate::config::KeyBindings;
use crate::controller::NavigationController;
use crate::host::ViewportHost;

/// A navigation command produced by a key binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavCommand {
    /// Advance one section.
    Next,
    /// Go back one section.
    Prev,
}

/// Whether an event was handled by the deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    /// Handled; the host's default action must not run.
    Consumed,
    /// Not handled; the host should perform its default action.
    Continue,
}

impl Propagation {
    pub const fn is_consumed(self) -> bool {
        matches!(self, Self::Consumed)
    }
}

/// Key code to command bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMap {
    bindings: HashMap<KeyCode, NavCommand>,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::from_bindings(&KeyBindings::default())
    }
}

impl KeyMap {
    /// An empty map; every key passes through.
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Build from DOM key names. Unrecognized names are skipped.
    ///
    /// If a key appears in both lists, the `prev` binding wins.
    pub fn from_bindings(keys: &KeyBindings) -> Self {
        let mut map = Self::empty();
        for (names, command) in [(&keys.next, NavCommand::Next), (&keys.prev, NavCommand::Prev)] {
            for name in names {
                match KeyCode::from_key_name(name) {
                    Some(code) => map.bind(code, command),
                    None => tracing::trace!(key = %name, "skipping unknown key binding"),
                }
            }
        }
        map
    }

    /// Bind `code` to `command`, replacing any existing binding.
    pub fn bind(&mut self, code: KeyCode, command: NavCommand) {
        self.bindings.insert(code, command);
    }

    /// Command bound to `code`.
    pub fn command_for(&self, code: KeyCode) -> Option<NavCommand> {
        self.bindings.get(&code).copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Routes key events to the controller while installed.
#[derive(Debug, Clone)]
pub struct InputDispatcher {
    keymap: KeyMap,
    installed: bool,
}

impl InputDispatcher {
    /// Install the global key listener on `host`.
    pub fn install<H: ViewportHost + ?Sized>(host: &mut H, keymap: KeyMap) -> Self {
        host.set_key_capture(true);
        tracing::debug!(bindings = keymap.len(), "key listener installed");
        Self {
            keymap,
            installed: true,
        }
    }

    pub fn is_installed(&self) -> bool {
        self.installed
    }

    pub fn keymap(&self) -> &KeyMap {
        &self.keymap
    }

    /// The command an event maps to, if it is a bound key-down.
    pub fn resolve(&self, event: &Event) -> Option<NavCommand> {
        if !self.installed {
            return None;
        }
        match event {
            Event::Key(key) if key.is_down() => self.keymap.command_for(key.code),
            _ => None,
        }
    }

    /// Handle an event. Bound keys run their command and are consumed.
    pub fn dispatch<H: ViewportHost + ?Sized>(
        &self,
        event: &Event,
        controller: &mut NavigationController,
        host: &mut H,
    ) -> Propagation {
        let Some(command) = self.resolve(event) else {
            return Propagation::Continue;
        };
        tracing::debug!(?command, "key command");
        match command {
            NavCommand::Next => controller.go_next(host),
            NavCommand::Prev => controller.go_prev(host),
        }
        Propagation::Consumed
    }

    /// Remove the key listener. Later calls are no-ops.
    pub fn remove<H: ViewportHost + ?Sized>(&mut self, host: &mut H) {
        if std::mem::take(&mut self.installed) {
            host.set_key_capture(false);
            tracing::debug!("key listener removed");
        }
    }
}
