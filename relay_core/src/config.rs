use crate::gameplay::judge::JudgeWindows;
use crate::gameplay::scroll::ScrollGeometry;
use relay_schema::Millis;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("C1001: note_speed must be positive and finite (got {0})")]
    NoteSpeed(f64),

    #[error("C1002: hit_line_y must be positive and finite (got {0})")]
    HitLine(f64),

    #[error("C1003: hit_window_ms must be greater than zero")]
    ZeroHitWindow,

    #[error("C1004: perfect_window_ms ({perfect}) exceeds hit_window_ms ({hit})")]
    PerfectWiderThanHit { perfect: Millis, hit: Millis },

    #[error("C1005: recording_time_limit_s must be greater than zero")]
    ZeroTimeLimit,

    #[error("C1006: {field} must be non-negative and finite (got {value})")]
    Geometry { field: &'static str, value: f64 },
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::NoteSpeed(_) => "C1001",
            ConfigError::HitLine(_) => "C1002",
            ConfigError::ZeroHitWindow => "C1003",
            ConfigError::PerfectWiderThanHit { .. } => "C1004",
            ConfigError::ZeroTimeLimit => "C1005",
            ConfigError::Geometry { .. } => "C1006",
        }
    }
}

/// Tunables for recording, playback and judging.
///
/// Distances are in pixels measured downward from the top of the play field,
/// times in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Fall speed in pixels per millisecond.
    pub note_speed: f64,
    pub hit_window_ms: Millis,
    pub perfect_window_ms: Millis,
    pub hit_line_y: f64,
    pub note_height: f64,
    /// Height of the visible play field, used to cull off-screen notes.
    pub view_height: f64,
    /// How far past the hit line a note may fall before it counts as missed.
    pub miss_margin_px: f64,
    /// Key presses earlier than this into a recording are dropped.
    pub recording_grace_ms: Millis,
    pub recording_time_limit_s: Option<u64>,
    /// "Get ready" delay between requesting playback and the first frame.
    pub preroll_ms: Millis,
    /// Delay between a finished playback and the next recording turn.
    pub handoff_delay_ms: Millis,
    pub track_health: bool,
    pub timer_warning_ms: Millis,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            note_speed: 0.3,
            hit_window_ms: 150,
            perfect_window_ms: 50,
            hit_line_y: 450.0,
            note_height: 40.0,
            view_height: 550.0,
            miss_margin_px: 50.0,
            recording_grace_ms: 1000,
            recording_time_limit_s: None,
            preroll_ms: 0,
            handoff_delay_ms: 0,
            track_health: false,
            timer_warning_ms: 3000,
        }
    }
}

impl GameConfig {
    /// One player records and replays their own take.
    pub fn solo() -> Self {
        Self::default()
    }

    /// Two players alternate, with a countdown before each playback and a
    /// pause before the next recording turn.
    pub fn versus() -> Self {
        Self {
            recording_time_limit_s: Some(10),
            preroll_ms: 2000,
            handoff_delay_ms: 2000,
            track_health: true,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.note_speed.is_finite() && self.note_speed > 0.0) {
            return Err(ConfigError::NoteSpeed(self.note_speed));
        }
        if !(self.hit_line_y.is_finite() && self.hit_line_y > 0.0) {
            return Err(ConfigError::HitLine(self.hit_line_y));
        }
        if self.hit_window_ms == 0 {
            return Err(ConfigError::ZeroHitWindow);
        }
        if self.perfect_window_ms > self.hit_window_ms {
            return Err(ConfigError::PerfectWiderThanHit {
                perfect: self.perfect_window_ms,
                hit: self.hit_window_ms,
            });
        }
        if self.recording_time_limit_s == Some(0) {
            return Err(ConfigError::ZeroTimeLimit);
        }
        for (field, value) in [
            ("note_height", self.note_height),
            ("view_height", self.view_height),
            ("miss_margin_px", self.miss_margin_px),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Geometry { field, value });
            }
        }
        Ok(())
    }

    pub fn geometry(&self) -> ScrollGeometry {
        ScrollGeometry {
            hit_line_y: self.hit_line_y,
            note_speed: self.note_speed,
            miss_margin_px: self.miss_margin_px,
            note_height: self.note_height,
            view_height: self.view_height,
        }
    }

    pub fn judge_windows(&self) -> JudgeWindows {
        JudgeWindows {
            perfect_ms: self.perfect_window_ms,
            hit_ms: self.hit_window_ms,
        }
    }

    pub fn recording_limit_ms(&self) -> Option<Millis> {
        self.recording_time_limit_s.map(|s| s.saturating_mul(1000))
    }
}
