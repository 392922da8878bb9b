use super::events::GameEvent;
use super::score::SessionSummary;
use super::scroll::NotePosition;
use super::session::{Mode, PlayerSession};
use crate::config::GameConfig;
use crate::input::events::InputEvent;
use crate::input::keymap::KeyMap;
use relay_schema::{Lane, Millis, PlayerId, LANE_COUNT};

/// Single-player variant: one session records a take and then replays it.
pub struct SoloGame {
    config: GameConfig,
    keymap: KeyMap,
    session: PlayerSession,
    held: [bool; LANE_COUNT],
    events: Vec<GameEvent>,
}

impl SoloGame {
    pub fn new(config: GameConfig) -> Self {
        Self::with_keymap(config, KeyMap::arrows())
    }

    pub fn with_keymap(config: GameConfig, keymap: KeyMap) -> Self {
        let session = PlayerSession::new(PlayerId::Player1, &config);
        Self {
            config,
            keymap,
            session,
            held: [false; LANE_COUNT],
            events: Vec::new(),
        }
    }

    pub fn session(&self) -> &PlayerSession {
        &self.session
    }

    pub fn mode(&self) -> Mode {
        self.session.mode()
    }

    pub fn start_recording(&mut self, now_ms: Millis) -> bool {
        self.session.start_recording(now_ms, &mut self.events)
    }

    pub fn stop_recording(&mut self) -> bool {
        self.session.stop_recording(false, &mut self.events)
    }

    /// Replays the latest take from the beginning with a fresh score.
    pub fn start_playback(&mut self, now_ms: Millis) -> bool {
        if !self.session.is_ready() || self.session.recorded().is_empty() {
            return false;
        }
        self.session.prepare_own_recording();
        self.session.tracker_mut().clear_score();
        self.session
            .start_playback(now_ms, self.config.preroll_ms, None, &mut self.events)
    }

    pub fn key_down(&mut self, lane: Lane, now_ms: Millis) -> bool {
        self.held[lane.index()] = true;
        self.session.key_down(lane, now_ms, &mut self.events)
    }

    pub fn key_up(&mut self, lane: Lane) {
        self.held[lane.index()] = false;
    }

    /// Lane keys only; the solo layout has no shortcuts.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        let Some(lane) = self.keymap.lane_for(event.key) else {
            return false;
        };
        if event.pressed {
            self.key_down(lane, event.timestamp_ms)
        } else {
            self.key_up(lane);
            false
        }
    }

    pub fn is_lane_held(&self, lane: Lane) -> bool {
        self.held[lane.index()]
    }

    pub fn advance(&mut self, now_ms: Millis) {
        self.session.advance(now_ms, &mut self.events);
    }

    pub fn positions(&self, now_ms: Millis) -> Vec<NotePosition> {
        self.session.positions(now_ms)
    }

    pub fn summary(&self) -> SessionSummary {
        self.session.summary()
    }

    pub fn reset(&mut self) {
        self.session = PlayerSession::new(PlayerId::Player1, &self.config);
        self.held = [false; LANE_COUNT];
        self.events.clear();
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
