use relay_schema::Millis;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    A,
    S,
    D,
    F,
    Left,
    Down,
    Up,
    Right,
    Space,
    Enter,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    /// Clock reading when the event occurred
    pub timestamp_ms: Millis,
    pub key: Key,
    pub pressed: bool,
}

impl InputEvent {
    pub fn down(key: Key, timestamp_ms: Millis) -> Self {
        Self {
            timestamp_ms,
            key,
            pressed: true,
        }
    }

    pub fn up(key: Key, timestamp_ms: Millis) -> Self {
        Self {
            timestamp_ms,
            key,
            pressed: false,
        }
    }
}
