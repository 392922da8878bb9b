use relay_schema::{Lane, Millis, RecordedNote};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NoteState {
    #[default]
    Pending,
    Hit,
    Missed,
}

/// A note under replay. Built by value from a [`RecordedNote`], so resolving
/// it never touches the recording it came from. Once resolved, the state is
/// fixed for the lifetime of this copy.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackNote {
    note: RecordedNote,
    state: NoteState,
}

impl PlaybackNote {
    pub fn from_recorded(note: &RecordedNote) -> Self {
        Self {
            note: *note,
            state: NoteState::Pending,
        }
    }

    pub fn lane(&self) -> Lane {
        self.note.lane
    }

    pub fn timestamp_ms(&self) -> Millis {
        self.note.timestamp_ms
    }

    pub fn state(&self) -> NoteState {
        self.state
    }

    pub fn is_hit(&self) -> bool {
        self.state == NoteState::Hit
    }

    pub fn is_missed(&self) -> bool {
        self.state == NoteState::Missed
    }

    pub fn is_resolved(&self) -> bool {
        self.state != NoteState::Pending
    }

    /// Returns false if the note was already resolved.
    pub fn mark_hit(&mut self) -> bool {
        self.resolve(NoteState::Hit)
    }

    /// Returns false if the note was already resolved.
    pub fn mark_missed(&mut self) -> bool {
        self.resolve(NoteState::Missed)
    }

    fn resolve(&mut self, to: NoteState) -> bool {
        if self.is_resolved() {
            return false;
        }
        self.state = to;
        true
    }
}
