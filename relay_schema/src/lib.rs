use serde::{Deserialize, Serialize};
use std::fmt;

pub type Millis = u64;

/// Number of parallel lanes a note can travel down.
pub const LANE_COUNT: usize = 4;

/// A lane index in `0..LANE_COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Lane(u8);

impl Lane {
    pub fn new(index: usize) -> Option<Self> {
        if index < LANE_COUNT {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<u8> for Lane {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Lane::new(value as usize)
            .ok_or_else(|| format!("lane {value} out of range 0..{LANE_COUNT}"))
    }
}

impl From<Lane> for u8 {
    fn from(lane: Lane) -> Self {
        lane.0
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A key press captured while recording. `timestamp_ms` is measured from the
/// start of the recording and is the moment the note reaches the hit line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedNote {
    pub lane: Lane,
    pub timestamp_ms: Millis,
}

/// Notes in key-press order. Timestamps are non-decreasing in practice but
/// consumers must not rely on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteSequence {
    notes: Vec<RecordedNote>,
}

impl NoteSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, note: RecordedNote) {
        self.notes.push(note);
    }

    pub fn clear(&mut self) {
        self.notes.clear();
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RecordedNote> {
        self.notes.iter()
    }

    pub fn as_slice(&self) -> &[RecordedNote] {
        &self.notes
    }
}

impl From<Vec<RecordedNote>> for NoteSequence {
    fn from(notes: Vec<RecordedNote>) -> Self {
        Self { notes }
    }
}

impl FromIterator<RecordedNote> for NoteSequence {
    fn from_iter<I: IntoIterator<Item = RecordedNote>>(iter: I) -> Self {
        Self {
            notes: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a NoteSequence {
    type Item = &'a RecordedNote;
    type IntoIter = std::slice::Iter<'a, RecordedNote>;

    fn into_iter(self) -> Self::IntoIter {
        self.notes.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerId {
    Player1,
    Player2,
}

impl PlayerId {
    pub fn other(self) -> Self {
        match self {
            PlayerId::Player1 => PlayerId::Player2,
            PlayerId::Player2 => PlayerId::Player1,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            PlayerId::Player1 => 1,
            PlayerId::Player2 => 2,
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.number())
    }
}

/// The most recently sent recording, waiting to be played by the other player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedTake {
    pub notes: NoteSequence,
    pub recorded_by: PlayerId,
}
