use relay_core::input::events::InputEvent;
use relay_core::input::InputQueue;
use relay_core::time::clock::{Clock, ManualClock};
use relay_core::{GameConfig, GameEvent, Match, SoloGame, TurnPrompt};
use relay_schema::{Millis, PlayerId};

use crate::script::{Action, Script, StepKind};

/// How long to keep ticking after the last step before giving up on the game
/// settling.
const SETTLE_LIMIT_MS: Millis = 60_000;

/// Common surface of the solo game and the two-player match, as seen by the
/// simulator.
pub trait Table {
    fn apply(&mut self, action: Action, now_ms: Millis) -> bool;
    fn input(&mut self, event: &InputEvent) -> bool;
    fn advance(&mut self, now_ms: Millis);
    fn drain_events(&mut self) -> Vec<GameEvent>;
    /// Nothing is recording, counting down, playing or pending.
    fn is_settled(&self) -> bool;
    fn status(&self) -> Vec<String>;
}

impl Table for Match {
    fn apply(&mut self, action: Action, now_ms: Millis) -> bool {
        match action {
            Action::Record => self.start_recording(now_ms),
            Action::Stop => self.stop_recording(),
            Action::Send => self.send_notes(),
            Action::Play => self.start_playback(now_ms),
            Action::Reset => {
                self.reset();
                true
            }
        }
    }

    fn input(&mut self, event: &InputEvent) -> bool {
        self.handle_input(event)
    }

    fn advance(&mut self, now_ms: Millis) {
        Match::advance(self, now_ms)
    }

    fn drain_events(&mut self) -> Vec<GameEvent> {
        Match::drain_events(self)
    }

    fn is_settled(&self) -> bool {
        self.current_session().is_ready() && !self.is_handoff_pending()
    }

    fn status(&self) -> Vec<String> {
        let mut lines: Vec<String> = [PlayerId::Player1, PlayerId::Player2]
            .into_iter()
            .map(|id| format!("{id}: {}", self.session(id).summary()))
            .collect();
        match self.prompt() {
            TurnPrompt::Busy => lines.push(format!("{} is busy", self.current_turn())),
            prompt => lines.push(prompt.to_string()),
        }
        lines
    }
}

impl Table for SoloGame {
    fn apply(&mut self, action: Action, now_ms: Millis) -> bool {
        match action {
            Action::Record => self.start_recording(now_ms),
            Action::Stop => self.stop_recording(),
            Action::Send => false,
            Action::Play => self.start_playback(now_ms),
            Action::Reset => {
                self.reset();
                true
            }
        }
    }

    fn input(&mut self, event: &InputEvent) -> bool {
        self.handle_input(event)
    }

    fn advance(&mut self, now_ms: Millis) {
        SoloGame::advance(self, now_ms)
    }

    fn drain_events(&mut self) -> Vec<GameEvent> {
        SoloGame::drain_events(self)
    }

    fn is_settled(&self) -> bool {
        self.session().is_ready()
    }

    fn status(&self) -> Vec<String> {
        vec![format!("{}", self.summary())]
    }
}

fn log_events(table: &mut dyn Table, at: Millis, lines: &mut Vec<String>) {
    for event in table.drain_events() {
        lines.push(format!("[{at:>7}ms] {event}"));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationReport {
    pub lines: Vec<String>,
    pub status: Vec<String>,
    pub end_ms: Millis,
}

pub fn new_table(solo: bool, config: GameConfig) -> Box<dyn Table> {
    if solo {
        Box::new(SoloGame::new(config))
    } else {
        Box::new(Match::new(config))
    }
}

/// Plays `script` against `table` on a simulated clock that ticks every
/// `tick_ms`. Key steps go through an [`InputQueue`] and keep their exact
/// timestamps; the game is advanced to each step's time before it applies.
pub fn run_simulation(table: &mut dyn Table, script: &Script, tick_ms: Millis) -> SimulationReport {
    let tick_ms = tick_ms.max(1);
    let clock = ManualClock::new(0);
    let queue = InputQueue::new();
    let mut lines = Vec::new();
    let mut steps = script.steps.iter().peekable();

    let deadline = script.end_ms() + SETTLE_LIMIT_MS;
    loop {
        let now = clock.now_ms();

        while let Some(step) = steps.next_if(|s| s.at_ms <= now) {
            table.advance(step.at_ms);
            log_events(table, step.at_ms, &mut lines);
            match step.kind {
                StepKind::Key { key, pressed } => queue.push(InputEvent {
                    timestamp_ms: step.at_ms,
                    key,
                    pressed,
                }),
                StepKind::Action { action } => {
                    for event in queue.drain() {
                        table.input(&event);
                    }
                    if !table.apply(action, step.at_ms) {
                        lines.push(format!("[{:>7}ms] ignored {action:?}", step.at_ms));
                    }
                }
            }
            for event in queue.drain() {
                table.input(&event);
            }
            log_events(table, step.at_ms, &mut lines);
        }

        table.advance(now);
        log_events(table, now, &mut lines);

        let done = steps.peek().is_none() && table.is_settled();
        if done || now >= deadline {
            return SimulationReport {
                lines,
                status: table.status(),
                end_ms: now,
            };
        }
        clock.advance(tick_ms);
    }
}
