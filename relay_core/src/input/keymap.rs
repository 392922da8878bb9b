use super::events::Key;
use relay_schema::{Lane, LANE_COUNT};

/// Non-lane keys with a gameplay meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// Start or stop a recording, or start playback, depending on the turn.
    Primary,
    Send,
}

pub fn shortcut_for(key: Key) -> Option<Shortcut> {
    match key {
        Key::Space => Some(Shortcut::Primary),
        Key::Enter => Some(Shortcut::Send),
        _ => None,
    }
}

/// Fixed key to lane binding. Lane `i` is triggered by `lanes[i]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyMap {
    lanes: [Key; LANE_COUNT],
}

impl KeyMap {
    pub fn new(lanes: [Key; LANE_COUNT]) -> Self {
        Self { lanes }
    }

    /// A S D F, shared by both players since they take turns.
    pub fn home_row() -> Self {
        Self::new([Key::A, Key::S, Key::D, Key::F])
    }

    pub fn arrows() -> Self {
        Self::new([Key::Left, Key::Down, Key::Up, Key::Right])
    }

    pub fn lane_for(&self, key: Key) -> Option<Lane> {
        self.lanes
            .iter()
            .position(|&k| k == key)
            .and_then(Lane::new)
    }

    pub fn key_for(&self, lane: Lane) -> Key {
        self.lanes[lane.index()]
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::home_row()
    }
}
