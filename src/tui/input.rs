// Key repeat handling for navigation and action keys
//
// Terminals without key-release reporting send a stream of presses while a
// key is held. Action keys (Enter, `d`, `p`, ...) must fire once per press;
// navigation keys repeat, rate-limited. Text entry (palette
// query, path modal) bypasses this entirely so fast typing is never eaten.

use crossterm::event::KeyCode;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Quiet time after which an action key counts as pressed again
const ACTION_REPEAT_GAP: Duration = Duration::from_millis(150);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyBehavior {
    /// Fires once per press; auto-repeat presses are swallowed until the
    /// key has been quiet for a moment
    Action,
    /// Fires on every press, rate-limited to one per `interval`
    Repeat { interval: Duration },
}

impl KeyBehavior {
    pub fn navigation() -> Self {
        Self::Repeat {
            interval: Duration::from_millis(40),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Held {
    last_seen: Instant,
    last_fired: Instant,
}

#[derive(Debug)]
pub struct InputHandler {
    held: HashMap<KeyCode, Held>,
    behaviors: HashMap<KeyCode, KeyBehavior>,
}

impl Default for InputHandler {
    fn default() -> Self {
        let mut handler = Self {
            held: HashMap::new(),
            behaviors: HashMap::new(),
        };
        for key in [
            KeyCode::Up,
            KeyCode::Down,
            KeyCode::Left,
            KeyCode::Right,
            KeyCode::Char('j'),
            KeyCode::Char('k'),
            KeyCode::PageUp,
            KeyCode::PageDown,
            KeyCode::Char('+'),
            KeyCode::Char('='),
            KeyCode::Char('-'),
        ] {
            handler.configure(key, KeyBehavior::navigation());
        }
        handler
    }
}

impl InputHandler {
    pub fn configure(&mut self, key: KeyCode, behavior: KeyBehavior) {
        self.behaviors.insert(key, behavior);
    }

    fn behavior(&self, key: KeyCode) -> KeyBehavior {
        self.behaviors.get(&key).copied().unwrap_or(KeyBehavior::Action)
    }

    /// Whether a press of `key` at `now` should trigger its action
    pub fn press_at(&mut self, key: KeyCode, now: Instant) -> bool {
        let behavior = self.behavior(key);
        let Some(held) = self.held.get_mut(&key) else {
            self.held.insert(
                key,
                Held {
                    last_seen: now,
                    last_fired: now,
                },
            );
            return true;
        };

        let fire = match behavior {
            KeyBehavior::Action => {
                now.saturating_duration_since(held.last_seen) >= ACTION_REPEAT_GAP
            }
            KeyBehavior::Repeat { interval } => {
                now.saturating_duration_since(held.last_fired) >= interval
            }
        };
        held.last_seen = now;
        if fire {
            held.last_fired = now;
        }
        fire
    }

    pub fn release(&mut self, key: KeyCode) {
        self.held.remove(&key);
    }

    /// Forget every held key (focus moved to a modal or text field)
    pub fn reset(&mut self) {
        self.held.clear();
    }
}
