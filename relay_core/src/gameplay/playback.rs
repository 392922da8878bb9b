use super::judge::{find_hit, JudgeWindows, JudgmentResult};
use super::note::PlaybackNote;
use super::scroll::{NotePosition, ScrollGeometry};
use relay_schema::{Lane, Millis, NoteSequence};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackPhase {
    Inactive,
    /// Waiting for the pre-roll to elapse. Key presses are not judged.
    Countdown { until_ms: Millis },
    Running { start_ms: Millis },
}

/// Replays a copied [`NoteSequence`] against the clock.
///
/// The engine never reads time on its own: the host calls [`advance`] every
/// frame and [`try_hit`] on every lane press, passing the current clock
/// reading. Feeding synthetic timestamps makes a replay fully deterministic.
///
/// [`advance`]: PlaybackEngine::advance
/// [`try_hit`]: PlaybackEngine::try_hit
#[derive(Debug, Clone)]
pub struct PlaybackEngine {
    source: NoteSequence,
    notes: Vec<PlaybackNote>,
    phase: PlaybackPhase,
    geometry: ScrollGeometry,
    windows: JudgeWindows,
}

/// Transitions produced by one [`PlaybackEngine::advance`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Advance {
    /// Set when the pre-roll ended during this call.
    pub started_at: Option<Millis>,
    /// Indices of notes that fell past the miss line during this call.
    pub missed: Vec<usize>,
    pub completed: bool,
}

impl PlaybackEngine {
    pub fn new(geometry: ScrollGeometry, windows: JudgeWindows) -> Self {
        Self {
            source: NoteSequence::new(),
            notes: Vec::new(),
            phase: PlaybackPhase::Inactive,
            geometry,
            windows,
        }
    }

    /// Copies `sequence` in as the material for the next playback. Returns
    /// the number of notes loaded.
    pub fn load(&mut self, sequence: &NoteSequence) -> usize {
        self.source = sequence.clone();
        self.notes = Self::fresh_copies(&self.source);
        self.phase = PlaybackPhase::Inactive;
        self.notes.len()
    }

    pub fn is_loaded(&self) -> bool {
        !self.source.is_empty()
    }

    pub fn notes(&self) -> &[PlaybackNote] {
        &self.notes
    }

    pub fn total(&self) -> usize {
        self.notes.len()
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    pub fn is_counting_down(&self) -> bool {
        matches!(self.phase, PlaybackPhase::Countdown { .. })
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, PlaybackPhase::Running { .. })
    }

    /// Rebuilds unresolved copies of the loaded notes and schedules the start
    /// `preroll_ms` from now. Returns false when there is nothing to play.
    pub fn arm(&mut self, now_ms: Millis, preroll_ms: Millis) -> bool {
        if self.source.is_empty() {
            return false;
        }
        self.notes = Self::fresh_copies(&self.source);
        self.phase = if preroll_ms == 0 {
            PlaybackPhase::Running { start_ms: now_ms }
        } else {
            PlaybackPhase::Countdown {
                until_ms: now_ms.saturating_add(preroll_ms),
            }
        };
        true
    }

    pub fn elapsed_ms(&self, now_ms: Millis) -> Option<Millis> {
        match self.phase {
            PlaybackPhase::Running { start_ms } => Some(now_ms.saturating_sub(start_ms)),
            _ => None,
        }
    }

    /// Moves the replay to `now_ms`: ends the pre-roll when due, marks notes
    /// that overshot the hit line as missed, and reports completion. A
    /// completed replay drops back to [`PlaybackPhase::Inactive`].
    pub fn advance(&mut self, now_ms: Millis) -> Advance {
        let mut out = Advance::default();

        if let PlaybackPhase::Countdown { until_ms } = self.phase {
            if now_ms < until_ms {
                return out;
            }
            // Anchor to the deadline so frame jitter does not shift the chart.
            self.phase = PlaybackPhase::Running { start_ms: until_ms };
            out.started_at = Some(until_ms);
        }

        let Some(elapsed) = self.elapsed_ms(now_ms) else {
            return out;
        };

        for (idx, note) in self.notes.iter_mut().enumerate() {
            if note.is_resolved() {
                continue;
            }
            let Some(y) = self.geometry.note_y(note.timestamp_ms(), elapsed) else {
                continue;
            };
            if self.geometry.is_past_miss_line(y) && note.mark_missed() {
                out.missed.push(idx);
            }
        }

        if self.is_complete() {
            self.phase = PlaybackPhase::Inactive;
            out.completed = true;
        }
        out
    }

    /// Judges a press on `lane`. Only active while running; a press that
    /// matches nothing is ignored.
    pub fn try_hit(&mut self, lane: Lane, now_ms: Millis) -> Option<JudgmentResult> {
        let elapsed = self.elapsed_ms(now_ms)?;
        let result = find_hit(&self.notes, lane, elapsed, &self.windows)?;
        self.notes[result.note_index].mark_hit();
        Some(result)
    }

    /// True once every note is either hit or missed.
    pub fn is_complete(&self) -> bool {
        !self.notes.is_empty() && self.notes.iter().all(PlaybackNote::is_resolved)
    }

    /// Visible unresolved notes for the current frame.
    pub fn positions(&self, now_ms: Millis) -> Vec<NotePosition> {
        let Some(elapsed) = self.elapsed_ms(now_ms) else {
            return Vec::new();
        };
        self.notes
            .iter()
            .enumerate()
            .filter(|(_, note)| !note.is_resolved())
            .filter_map(|(index, note)| {
                let y = self.geometry.note_y(note.timestamp_ms(), elapsed)?;
                let visible = self.geometry.is_on_screen(y) && !self.geometry.is_past_miss_line(y);
                visible.then_some(NotePosition {
                    index,
                    lane: note.lane(),
                    y,
                })
            })
            .collect()
    }

    fn fresh_copies(source: &NoteSequence) -> Vec<PlaybackNote> {
        source.iter().map(PlaybackNote::from_recorded).collect()
    }
}
