use super::events::GameEvent;
use super::scroll::NotePosition;
use super::session::{Mode, PlayerSession};
use crate::config::GameConfig;
use crate::input::events::InputEvent;
use crate::input::keymap::{shortcut_for, KeyMap, Shortcut};
use log::info;
use relay_schema::{Lane, Millis, PlayerId, SharedTake, LANE_COUNT};
use std::fmt;

/// What the player whose turn it is should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Record,
    Play,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPrompt {
    Record { player: PlayerId, round: u32 },
    Play { player: PlayerId, round: u32 },
    /// Recording, counting down, playing, or waiting for the hand-off.
    Busy,
}

impl fmt::Display for TurnPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnPrompt::Record { player, round } => {
                write!(f, "Round {round} - {player}'s turn to record!")
            }
            TurnPrompt::Play { player, round } => {
                write!(f, "Round {round} - {player}'s turn to play!")
            }
            TurnPrompt::Busy => Ok(()),
        }
    }
}

/// Two-player match. One player records, sends the take, and the other plays
/// it back; the player who just played records next.
///
/// ```text
/// P1 records -> P2 plays -> P2 records -> P1 plays -> P1 records -> ...
/// ```
///
/// The round advances whenever the turn passes from player 2 back to
/// player 1. All timing is driven by the `now_ms` arguments; nothing here
/// reads a clock.
pub struct Match {
    config: GameConfig,
    keymap: KeyMap,
    player1: PlayerSession,
    player2: PlayerSession,
    current_turn: PlayerId,
    round: u32,
    shared: Option<SharedTake>,
    /// Deadline for switching to the next recorder after a playback.
    handoff_at: Option<Millis>,
    held: [bool; LANE_COUNT],
    events: Vec<GameEvent>,
}

impl Match {
    pub fn new(config: GameConfig) -> Self {
        Self::with_keymap(config, KeyMap::home_row())
    }

    pub fn with_keymap(config: GameConfig, keymap: KeyMap) -> Self {
        Self {
            player1: PlayerSession::new(PlayerId::Player1, &config),
            player2: PlayerSession::new(PlayerId::Player2, &config),
            config,
            keymap,
            current_turn: PlayerId::Player1,
            round: 1,
            shared: None,
            handoff_at: None,
            held: [false; LANE_COUNT],
            events: Vec::new(),
        }
    }

    pub fn current_turn(&self) -> PlayerId {
        self.current_turn
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn shared_take(&self) -> Option<&SharedTake> {
        self.shared.as_ref()
    }

    pub fn is_handoff_pending(&self) -> bool {
        self.handoff_at.is_some()
    }

    pub fn session(&self, id: PlayerId) -> &PlayerSession {
        match id {
            PlayerId::Player1 => &self.player1,
            PlayerId::Player2 => &self.player2,
        }
    }

    fn session_mut(&mut self, id: PlayerId) -> &mut PlayerSession {
        match id {
            PlayerId::Player1 => &mut self.player1,
            PlayerId::Player2 => &mut self.player2,
        }
    }

    pub fn current_session(&self) -> &PlayerSession {
        self.session(self.current_turn)
    }

    /// The current player plays when the shared take came from the opponent.
    pub fn role(&self) -> Role {
        match &self.shared {
            Some(take) if take.recorded_by == self.current_turn.other() => Role::Play,
            _ => Role::Record,
        }
    }

    pub fn prompt(&self) -> TurnPrompt {
        if !self.current_session().is_ready() || self.handoff_at.is_some() {
            return TurnPrompt::Busy;
        }
        let player = self.current_turn;
        let round = self.round;
        match self.role() {
            Role::Record => TurnPrompt::Record { player, round },
            Role::Play => TurnPrompt::Play { player, round },
        }
    }

    pub fn start_recording(&mut self, now_ms: Millis) -> bool {
        if self.role() != Role::Record || self.handoff_at.is_some() {
            return false;
        }
        self.with_current(|session, events| session.start_recording(now_ms, events))
    }

    pub fn stop_recording(&mut self) -> bool {
        self.with_current(|session, events| session.stop_recording(false, events))
    }

    /// Publishes the current player's take to the opponent and passes the
    /// turn. Requires a finished, non-empty recording made this turn; a take
    /// can only be sent once.
    pub fn send_notes(&mut self) -> bool {
        if self.role() != Role::Record || self.handoff_at.is_some() {
            return false;
        }
        let from = self.current_turn;
        let Some(notes) = self.session_mut(from).take_unsent() else {
            return false;
        };
        let count = notes.len();
        self.session_mut(from.other()).prepare_playback(&notes);
        self.shared = Some(SharedTake {
            notes,
            recorded_by: from,
        });
        info!("{from}: sent {count} notes");
        self.events.push(GameEvent::NotesSent { from, notes: count });

        self.switch_turn();
        true
    }

    pub fn start_playback(&mut self, now_ms: Millis) -> bool {
        if self.role() != Role::Play || self.handoff_at.is_some() {
            return false;
        }
        let preroll_ms = self.config.preroll_ms;
        let fallback = self.shared.as_ref().map(|take| take.notes.clone());
        self.with_current(|session, events| {
            session.start_playback(now_ms, preroll_ms, fallback.as_ref(), events)
        })
    }

    /// Lane press from the shared key map. Always updates the held state;
    /// returns true if it recorded a note or hit one.
    pub fn key_down(&mut self, lane: Lane, now_ms: Millis) -> bool {
        self.held[lane.index()] = true;
        self.with_current(|session, events| session.key_down(lane, now_ms, events))
    }

    pub fn key_up(&mut self, lane: Lane) {
        self.held[lane.index()] = false;
    }

    pub fn is_lane_held(&self, lane: Lane) -> bool {
        self.held[lane.index()]
    }

    /// Routes a raw key event: lane keys go to [`key_down`](Self::key_down)
    /// and [`key_up`](Self::key_up), Space performs the primary action for the
    /// turn and Enter sends the take.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        if let Some(lane) = self.keymap.lane_for(event.key) {
            if event.pressed {
                return self.key_down(lane, event.timestamp_ms);
            }
            self.key_up(lane);
            return false;
        }
        if !event.pressed {
            return false;
        }
        match shortcut_for(event.key) {
            Some(Shortcut::Primary) => self.primary_action(event.timestamp_ms),
            Some(Shortcut::Send) => self.send_notes(),
            None => false,
        }
    }

    fn primary_action(&mut self, now_ms: Millis) -> bool {
        match self.current_session().mode() {
            Mode::Recording => self.stop_recording(),
            Mode::Playback => false,
            Mode::Idle => match self.role() {
                Role::Record => self.start_recording(now_ms),
                Role::Play => self.start_playback(now_ms),
            },
        }
    }

    /// Per-frame update: recording time limit, pre-roll, misses, playback
    /// completion and the delayed hand-off to the next recorder.
    pub fn advance(&mut self, now_ms: Millis) {
        let finished = self.with_current(|session, events| session.advance(now_ms, events));

        if finished {
            self.handoff_at = Some(now_ms.saturating_add(self.config.handoff_delay_ms));
        }
        if let Some(deadline) = self.handoff_at {
            if now_ms >= deadline {
                self.handoff_at = None;
                self.switch_to_next_recording_player();
            }
        }
    }

    pub fn positions(&self, now_ms: Millis) -> Vec<NotePosition> {
        self.current_session().positions(now_ms)
    }

    pub fn recording_time_remaining(&self, now_ms: Millis) -> Option<Millis> {
        self.current_session().recording_time_remaining(now_ms)
    }

    /// True while recording with little time left on the clock.
    pub fn timer_warning(&self, now_ms: Millis) -> bool {
        self.recording_time_remaining(now_ms)
            .is_some_and(|left| left <= self.config.timer_warning_ms)
    }

    /// Back to round 1 with player 1 to record. Safe at any point, including
    /// during a pre-roll or a pending hand-off.
    pub fn reset(&mut self) {
        self.player1 = PlayerSession::new(PlayerId::Player1, &self.config);
        self.player2 = PlayerSession::new(PlayerId::Player2, &self.config);
        self.current_turn = PlayerId::Player1;
        self.round = 1;
        self.shared = None;
        self.handoff_at = None;
        self.held = [false; LANE_COUNT];
        self.events.clear();
        info!("match reset");
        self.events.push(GameEvent::MatchReset);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn with_current<R>(
        &mut self,
        f: impl FnOnce(&mut PlayerSession, &mut Vec<GameEvent>) -> R,
    ) -> R {
        let Self {
            player1,
            player2,
            current_turn,
            events,
            ..
        } = self;
        let session = match current_turn {
            PlayerId::Player1 => player1,
            PlayerId::Player2 => player2,
        };
        f(session, events)
    }

    fn switch_turn(&mut self) {
        self.set_turn(self.current_turn.other());
    }

    /// The player who just finished playing records next.
    fn switch_to_next_recording_player(&mut self) {
        self.shared = None;
        self.set_turn(self.current_turn);
    }

    fn set_turn(&mut self, next: PlayerId) {
        if self.current_turn == PlayerId::Player2 && next == PlayerId::Player1 {
            self.round += 1;
        }
        self.current_turn = next;
        info!("round {}: {next}'s turn", self.round);
        self.events.push(GameEvent::TurnChanged {
            turn: next,
            round: self.round,
        });
    }
}
