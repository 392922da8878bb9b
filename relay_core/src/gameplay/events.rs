use super::judge::Judgment;
use super::score::SessionSummary;
use relay_schema::{Lane, Millis, PlayerId, RecordedNote};
use std::fmt;

/// Everything the engine reports to its collaborators (sound, effects, status
/// text). Hosts drain these after each call.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    RecordingStarted {
        player: PlayerId,
    },
    NoteRecorded {
        player: PlayerId,
        note: RecordedNote,
    },
    RecordingStopped {
        player: PlayerId,
        notes: usize,
        timed_out: bool,
    },
    NotesSent {
        from: PlayerId,
        notes: usize,
    },
    CountdownStarted {
        player: PlayerId,
        until_ms: Millis,
    },
    PlaybackStarted {
        player: PlayerId,
        notes: usize,
    },
    NoteHit {
        player: PlayerId,
        note_index: usize,
        lane: Lane,
        judgment: Judgment,
        delta_ms: i64,
        points: u64,
        combo: u32,
    },
    NoteMissed {
        player: PlayerId,
        note_index: usize,
        lane: Lane,
    },
    PlaybackFinished {
        player: PlayerId,
        summary: SessionSummary,
    },
    TurnChanged {
        turn: PlayerId,
        round: u32,
    },
    MatchReset,
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEvent::RecordingStarted { player } => write!(f, "{player}: recording started"),
            GameEvent::NoteRecorded { player, note } => write!(
                f,
                "{player}: recorded lane {} at {}ms",
                note.lane, note.timestamp_ms
            ),
            GameEvent::RecordingStopped {
                player,
                notes,
                timed_out,
            } => {
                write!(f, "{player}: recorded {notes} notes")?;
                if *timed_out {
                    write!(f, " (time limit)")?;
                }
                Ok(())
            }
            GameEvent::NotesSent { from, notes } => write!(f, "{from}: sent {notes} notes"),
            GameEvent::CountdownStarted { player, until_ms } => {
                write!(f, "{player}: get ready (starts at {until_ms}ms)")
            }
            GameEvent::PlaybackStarted { player, notes } => {
                write!(f, "{player}: playback started ({notes} notes)")
            }
            GameEvent::NoteHit {
                player,
                note_index,
                lane,
                judgment,
                delta_ms,
                points,
                combo,
            } => {
                write!(f, "{player}: hit #{note_index} lane {lane} {judgment:?} ")?;
                write!(f, "{delta_ms:+}ms +{points} (combo {combo})")
            }
            GameEvent::NoteMissed {
                player,
                note_index,
                lane,
            } => write!(f, "{player}: miss #{note_index} lane {lane}"),
            GameEvent::PlaybackFinished { player, summary } => {
                write!(f, "{player}: finished! {summary}")
            }
            GameEvent::TurnChanged { turn, round } => write!(f, "round {round}: {turn}'s turn"),
            GameEvent::MatchReset => write!(f, "match reset"),
        }
    }
}
