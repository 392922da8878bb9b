use super::scroll::{NotePosition, ScrollGeometry};
use log::debug;
use relay_schema::{Lane, Millis, NoteSequence, RecordedNote};

/// Turns key presses into a [`NoteSequence`] timed from the start of the take.
#[derive(Debug, Clone)]
pub struct Recorder {
    notes: NoteSequence,
    start_ms: Millis,
    grace_ms: Millis,
    limit_ms: Option<Millis>,
}

impl Recorder {
    pub fn new(grace_ms: Millis, limit_ms: Option<Millis>) -> Self {
        Self {
            notes: NoteSequence::new(),
            start_ms: 0,
            grace_ms,
            limit_ms,
        }
    }

    /// Discards the previous take and starts timing from `now_ms`.
    pub fn begin(&mut self, now_ms: Millis) {
        self.notes.clear();
        self.start_ms = now_ms;
    }

    pub fn elapsed_ms(&self, now_ms: Millis) -> Millis {
        now_ms.saturating_sub(self.start_ms)
    }

    /// Appends a note unless the press falls inside the lead-in grace period.
    pub fn capture(&mut self, lane: Lane, now_ms: Millis) -> Option<RecordedNote> {
        let elapsed = self.elapsed_ms(now_ms);
        if elapsed < self.grace_ms {
            debug!("dropped press on lane {lane} at {elapsed}ms (grace {}ms)", self.grace_ms);
            return None;
        }
        let note = RecordedNote {
            lane,
            timestamp_ms: elapsed,
        };
        self.notes.push(note);
        Some(note)
    }

    pub fn remaining_ms(&self, now_ms: Millis) -> Option<Millis> {
        self.limit_ms
            .map(|limit| limit.saturating_sub(self.elapsed_ms(now_ms)))
    }

    pub fn limit_reached(&self, now_ms: Millis) -> bool {
        self.remaining_ms(now_ms) == Some(0)
    }

    pub fn notes(&self) -> &NoteSequence {
        &self.notes
    }

    /// Falling previews of what has been recorded so far.
    pub fn preview(&self, now_ms: Millis, geometry: &ScrollGeometry) -> Vec<NotePosition> {
        let elapsed = self.elapsed_ms(now_ms);
        self.notes
            .iter()
            .enumerate()
            .filter_map(|(index, note)| {
                let y = geometry.note_y(note.timestamp_ms, elapsed)?;
                geometry.is_on_screen(y).then_some(NotePosition {
                    index,
                    lane: note.lane,
                    y,
                })
            })
            .collect()
    }
}
