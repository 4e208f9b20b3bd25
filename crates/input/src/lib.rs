//! Input channels: named booleans driven by key codes and virtual buttons.
//!
//! # Invariants
//! - Input state is an explicit object owned by the session, never a global.
//! - A channel stays pressed while any bound key or virtual press holds it.
//! - Consumers poll. Press/release transitions are only kept once recording
//!   is switched on, and then only until drained.

use std::collections::{BTreeMap, HashSet};

/// Channel names the player controls are read from.
pub const FORWARD: &str = "forward";
pub const BACK: &str = "back";
pub const LEFT: &str = "left";
pub const RIGHT: &str = "right";
pub const FIRE: &str = "fire";

/// Errors from channel definition and explicit lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("input channel name must not be empty")]
    EmptyName,
    #[error("input channel '{0}' already exists")]
    Duplicate(String),
    #[error("input channel '{0}' has no key bindings")]
    NoBindings(String),
    #[error("input channel '{0}' not found")]
    UnknownChannel(String),
}

/// A change in a channel's pressed state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Pressed(String),
    Released(String),
}

#[derive(Debug, Clone, Default)]
struct Channel {
    keys: Vec<u32>,
    /// Held by an on-screen button or similar.
    virtual_held: bool,
    pressed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct InputState {
    channels: BTreeMap<String, Channel>,
    keys_down: HashSet<u32>,
    record: bool,
    transitions: Vec<Transition>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arrow keys / WASD to move, Shift, Ctrl or Space to fire.
    pub fn with_default_bindings() -> Self {
        let mut state = Self::new();
        for (name, keys) in [
            (FORWARD, &[38, 87][..]),
            (BACK, &[40, 83][..]),
            (LEFT, &[37, 65][..]),
            (RIGHT, &[39, 68][..]),
            (FIRE, &[16, 17, 32][..]),
        ] {
            state.channels.insert(
                name.to_owned(),
                Channel {
                    keys: keys.to_vec(),
                    ..Channel::default()
                },
            );
        }
        state
    }

    /// Define a channel bound to one or more key codes.
    pub fn define(&mut self, name: &str, keys: &[u32]) -> Result<(), InputError> {
        if name.is_empty() {
            return Err(InputError::EmptyName);
        }
        if self.channels.contains_key(name) {
            return Err(InputError::Duplicate(name.to_owned()));
        }
        if keys.is_empty() {
            return Err(InputError::NoBindings(name.to_owned()));
        }
        let mut bound = Vec::with_capacity(keys.len());
        for &code in keys {
            if bound.contains(&code) {
                tracing::warn!(code, channel = name, "duplicate key code");
                continue;
            }
            bound.push(code);
        }
        let pressed = bound.iter().any(|k| self.keys_down.contains(k));
        self.channels.insert(
            name.to_owned(),
            Channel {
                keys: bound,
                virtual_held: false,
                pressed,
            },
        );
        Ok(())
    }

    /// Start or stop keeping press/release transitions. Stopping discards
    /// anything not yet drained.
    pub fn record_transitions(&mut self, on: bool) {
        self.record = on;
        if !on {
            self.transitions.clear();
        }
    }

    pub fn pending_transitions(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.channels.contains_key(name)
    }

    pub fn channel_names(&self) -> impl Iterator<Item = &str> {
        self.channels.keys().map(String::as_str)
    }

    /// Pressed state of a channel. Unknown names read as released.
    pub fn pressed(&self, name: &str) -> bool {
        self.channels.get(name).is_some_and(|c| c.pressed)
    }

    pub fn key_down(&mut self, code: u32) {
        if !self.keys_down.insert(code) {
            return;
        }
        for (name, channel) in &mut self.channels {
            if channel.keys.contains(&code) && !channel.pressed {
                channel.pressed = true;
                if self.record {
                    self.transitions.push(Transition::Pressed(name.clone()));
                }
            }
        }
    }

    pub fn key_up(&mut self, code: u32) {
        if !self.keys_down.remove(&code) {
            return;
        }
        for (name, channel) in &mut self.channels {
            if !channel.keys.contains(&code) || !channel.pressed {
                continue;
            }
            let still_held = channel.virtual_held
                || channel.keys.iter().any(|k| self.keys_down.contains(k));
            if !still_held {
                channel.pressed = false;
                if self.record {
                    self.transitions.push(Transition::Released(name.clone()));
                }
            }
        }
    }

    /// Hold a channel from a virtual button.
    pub fn press(&mut self, name: &str) -> Result<(), InputError> {
        let channel = self
            .channels
            .get_mut(name)
            .ok_or_else(|| InputError::UnknownChannel(name.to_owned()))?;
        channel.virtual_held = true;
        if !channel.pressed {
            channel.pressed = true;
            if self.record {
                self.transitions.push(Transition::Pressed(name.to_owned()));
            }
        }
        Ok(())
    }

    /// Let go of a virtual button. Bound keys still down keep the channel pressed.
    pub fn release(&mut self, name: &str) -> Result<(), InputError> {
        let channel = self
            .channels
            .get_mut(name)
            .ok_or_else(|| InputError::UnknownChannel(name.to_owned()))?;
        channel.virtual_held = false;
        let key_held = channel.keys.iter().any(|k| self.keys_down.contains(k));
        if channel.pressed && !key_held {
            channel.pressed = false;
            if self.record {
                self.transitions.push(Transition::Released(name.to_owned()));
            }
        }
        Ok(())
    }

    /// Drop every held key and virtual press, e.g. when focus is lost.
    pub fn release_all(&mut self) {
        self.keys_down.clear();
        for (name, channel) in &mut self.channels {
            channel.virtual_held = false;
            if channel.pressed {
                channel.pressed = false;
                if self.record {
                    self.transitions.push(Transition::Released(name.clone()));
                }
            }
        }
    }

    /// Drain and return transitions recorded since the last drain. Always
    /// empty unless [`InputState::record_transitions`] is on.
    pub fn drain_transitions(&mut self) -> Vec<Transition> {
        std::mem::take(&mut self.transitions)
    }
}

pub fn crate_info() -> &'static str {
    "monkeyshot-input v0.1.0"
}
