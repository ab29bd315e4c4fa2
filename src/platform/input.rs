//! Keyboard state
//!
//! The windowing layer delivers press/release events; physics asks once per
//! tick whether a key is held. Menus want edges instead, so newly pressed
//! keys are also queued until drained.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Stable key identifier, independent of any windowing backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Printable key, stored lowercase
    Char(char),
    Up,
    Down,
    Left,
    Right,
    Space,
    Enter,
    Escape,
    /// Anything else, by backend keycode
    Code(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub pressed: bool,
}

impl KeyEvent {
    pub fn press(key: Key) -> Self {
        Self { key, pressed: true }
    }

    pub fn release(key: Key) -> Self {
        Self {
            key,
            pressed: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: HashSet<Key>,
    pressed: Vec<Key>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event. Auto-repeat presses of an already held key do not
    /// queue a second edge.
    pub fn apply(&mut self, event: KeyEvent) {
        if event.pressed {
            if self.held.insert(event.key) {
                self.pressed.push(event.key);
            }
        } else {
            self.held.remove(&event.key);
        }
    }

    #[inline]
    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// Take the keys pressed since the last drain, in arrival order
    pub fn drain_pressed(&mut self) -> Vec<Key> {
        std::mem::take(&mut self.pressed)
    }
}
