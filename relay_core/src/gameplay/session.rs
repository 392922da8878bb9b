use super::events::GameEvent;
use super::note::PlaybackNote;
use super::playback::PlaybackEngine;
use super::recorder::Recorder;
use super::score::{ScoreTracker, SessionSummary};
use super::scroll::{NotePosition, ScrollGeometry};
use crate::config::GameConfig;
use log::{debug, info};
use relay_schema::{Lane, Millis, NoteSequence, PlayerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Idle,
    Recording,
    Playback,
}

/// One player's recorder, replay and score. Mode only changes through the
/// explicit start/stop calls and through [`PlayerSession::advance`].
#[derive(Debug, Clone)]
pub struct PlayerSession {
    id: PlayerId,
    mode: Mode,
    recorder: Recorder,
    engine: PlaybackEngine,
    tracker: ScoreTracker,
    geometry: ScrollGeometry,
    track_health: bool,
    /// A finished take that has not been handed to the opponent yet.
    unsent_take: bool,
}

impl PlayerSession {
    pub fn new(id: PlayerId, config: &GameConfig) -> Self {
        let geometry = config.geometry();
        Self {
            id,
            mode: Mode::Idle,
            recorder: Recorder::new(config.recording_grace_ms, config.recording_limit_ms()),
            engine: PlaybackEngine::new(geometry, config.judge_windows()),
            tracker: ScoreTracker::new(),
            geometry,
            track_health: config.track_health,
            unsent_take: false,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn recorded(&self) -> &NoteSequence {
        self.recorder.notes()
    }

    pub fn playback_notes(&self) -> &[PlaybackNote] {
        self.engine.notes()
    }

    pub fn tracker(&self) -> &ScoreTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut ScoreTracker {
        &mut self.tracker
    }

    pub fn is_counting_down(&self) -> bool {
        self.engine.is_counting_down()
    }

    /// Idle and not waiting on a pre-roll.
    pub fn is_ready(&self) -> bool {
        self.mode == Mode::Idle && !self.engine.is_counting_down()
    }

    pub fn summary(&self) -> SessionSummary {
        self.tracker.summary(self.track_health)
    }

    pub fn start_recording(&mut self, now_ms: Millis, events: &mut Vec<GameEvent>) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.mode = Mode::Recording;
        self.unsent_take = false;
        self.recorder.begin(now_ms);
        info!("{}: recording started", self.id);
        events.push(GameEvent::RecordingStarted { player: self.id });
        true
    }

    pub fn stop_recording(&mut self, timed_out: bool, events: &mut Vec<GameEvent>) -> bool {
        if self.mode != Mode::Recording {
            return false;
        }
        self.mode = Mode::Idle;
        let notes = self.recorder.notes().len();
        self.unsent_take = notes > 0;
        info!("{}: recording stopped with {notes} notes", self.id);
        events.push(GameEvent::RecordingStopped {
            player: self.id,
            notes,
            timed_out,
        });
        true
    }

    pub fn recording_time_remaining(&self, now_ms: Millis) -> Option<Millis> {
        if self.mode != Mode::Recording {
            return None;
        }
        self.recorder.remaining_ms(now_ms)
    }

    /// Loads a copy of `sequence` for the next playback and snapshots the
    /// note count used for health.
    pub fn prepare_playback(&mut self, sequence: &NoteSequence) {
        let total = self.engine.load(sequence);
        self.tracker.set_total_notes(total);
    }

    /// Loads this session's own recording for playback.
    pub fn prepare_own_recording(&mut self) {
        let total = self.engine.load(self.recorder.notes());
        self.tracker.set_total_notes(total);
    }

    pub fn has_unsent_take(&self) -> bool {
        self.mode == Mode::Idle && self.unsent_take
    }

    /// Hands out a copy of the latest finished take, once. The recording
    /// itself stays visible until the next one starts.
    pub fn take_unsent(&mut self) -> Option<NoteSequence> {
        if !self.has_unsent_take() {
            return None;
        }
        self.unsent_take = false;
        Some(self.recorder.notes().clone())
    }

    /// Arms playback of the prepared notes, falling back to `fallback` when
    /// nothing is prepared. With a pre-roll the session stays idle until
    /// [`advance`](Self::advance) passes the deadline.
    pub fn start_playback(
        &mut self,
        now_ms: Millis,
        preroll_ms: Millis,
        fallback: Option<&NoteSequence>,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        if !self.is_ready() {
            return false;
        }
        if !self.engine.is_loaded() {
            match fallback {
                Some(seq) if !seq.is_empty() => self.prepare_playback(seq),
                _ => return false,
            }
        }
        if !self.engine.arm(now_ms, preroll_ms) {
            return false;
        }
        self.tracker.restore_health();

        if self.engine.is_running() {
            self.enter_playback(events);
        } else {
            let until_ms = now_ms.saturating_add(preroll_ms);
            info!("{}: playback starts at {until_ms}ms", self.id);
            events.push(GameEvent::CountdownStarted {
                player: self.id,
                until_ms,
            });
        }
        true
    }

    fn enter_playback(&mut self, events: &mut Vec<GameEvent>) {
        self.mode = Mode::Playback;
        self.tracker.begin_playback();
        info!("{}: playback started ({} notes)", self.id, self.engine.total());
        events.push(GameEvent::PlaybackStarted {
            player: self.id,
            notes: self.engine.total(),
        });
    }

    /// Routes a lane press to the recorder or the judge depending on mode.
    /// Returns true if the press produced a note or a hit.
    pub fn key_down(&mut self, lane: Lane, now_ms: Millis, events: &mut Vec<GameEvent>) -> bool {
        match self.mode {
            Mode::Recording => match self.recorder.capture(lane, now_ms) {
                Some(note) => {
                    events.push(GameEvent::NoteRecorded {
                        player: self.id,
                        note,
                    });
                    true
                }
                None => false,
            },
            Mode::Playback => {
                let Some(result) = self.engine.try_hit(lane, now_ms) else {
                    return false;
                };
                let points = self.tracker.record_hit(result.judgment);
                debug!(
                    "{}: hit note {} ({:?}, {:+}ms, +{points})",
                    self.id, result.note_index, result.judgment, result.delta_ms
                );
                events.push(GameEvent::NoteHit {
                    player: self.id,
                    note_index: result.note_index,
                    lane,
                    judgment: result.judgment,
                    delta_ms: result.delta_ms,
                    points,
                    combo: self.tracker.combo(),
                });
                true
            }
            Mode::Idle => false,
        }
    }

    /// Per-frame update. Returns true when a playback finished during this
    /// call.
    pub fn advance(&mut self, now_ms: Millis, events: &mut Vec<GameEvent>) -> bool {
        if self.mode == Mode::Recording {
            if self.recorder.limit_reached(now_ms) {
                self.stop_recording(true, events);
            }
            return false;
        }

        let step = self.engine.advance(now_ms);
        if step.started_at.is_some() {
            self.enter_playback(events);
        }
        if self.mode != Mode::Playback {
            return false;
        }

        for idx in step.missed {
            self.tracker.record_miss();
            let lane = self.engine.notes()[idx].lane();
            debug!("{}: missed note {idx} on lane {lane}", self.id);
            events.push(GameEvent::NoteMissed {
                player: self.id,
                note_index: idx,
                lane,
            });
        }

        if step.completed {
            self.mode = Mode::Idle;
            let summary = self.summary();
            info!("{}: playback finished, {summary}", self.id);
            events.push(GameEvent::PlaybackFinished {
                player: self.id,
                summary,
            });
            return true;
        }
        false
    }

    pub fn positions(&self, now_ms: Millis) -> Vec<NotePosition> {
        match self.mode {
            Mode::Recording => self.recorder.preview(now_ms, &self.geometry),
            Mode::Playback => self.engine.positions(now_ms),
            Mode::Idle => Vec::new(),
        }
    }
}
