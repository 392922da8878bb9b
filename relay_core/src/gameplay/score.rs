use super::judge::{JudgeWindows, Judgment};
use relay_schema::Millis;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const PERFECT_POINTS: u64 = 100;
pub const GOOD_POINTS: u64 = 50;

pub fn base_points(judgment: Judgment) -> u64 {
    match judgment {
        Judgment::Perfect => PERFECT_POINTS,
        Judgment::Good => GOOD_POINTS,
    }
}

/// Points for a hit `offset_ms` away from its note, where `combo` already
/// includes this hit. Offsets outside the hit window score nothing.
pub fn award_points(offset_ms: Millis, combo: u32, windows: &JudgeWindows) -> u64 {
    match windows.classify(offset_ms) {
        Some(judgment) => scaled_points(base_points(judgment), combo),
        None => 0,
    }
}

fn scaled_points(base: u64, combo: u32) -> u64 {
    (base as f64 * (1.0 + combo as f64 * 0.1)).floor() as u64
}

/// Per-player running totals.
///
/// `score` accumulates across playbacks; combo, hits and misses restart with
/// each playback. Health is only meaningful when the owner tracks it.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreTracker {
    score: u64,
    combo: u32,
    max_combo: u32,
    hits: u32,
    misses: u32,
    total_notes: u32,
    health: f64,
}

impl Default for ScoreTracker {
    fn default() -> Self {
        Self {
            score: 0,
            combo: 0,
            max_combo: 0,
            hits: 0,
            misses: 0,
            total_notes: 0,
            health: 100.0,
        }
    }
}

impl ScoreTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn max_combo(&self) -> u32 {
        self.max_combo
    }

    pub fn hits(&self) -> u32 {
        self.hits
    }

    pub fn misses(&self) -> u32 {
        self.misses
    }

    pub fn total_notes(&self) -> u32 {
        self.total_notes
    }

    pub fn health(&self) -> f64 {
        self.health
    }

    pub fn set_total_notes(&mut self, total: usize) {
        self.total_notes = total as u32;
    }

    pub fn restore_health(&mut self) {
        self.health = 100.0;
    }

    /// Clears the streak counters at the start of a playback.
    pub fn begin_playback(&mut self) {
        self.combo = 0;
        self.max_combo = 0;
        self.hits = 0;
        self.misses = 0;
    }

    pub fn clear_score(&mut self) {
        self.score = 0;
    }

    /// Registers a hit and returns the points awarded.
    pub fn record_hit(&mut self, judgment: Judgment) -> u64 {
        self.hits += 1;
        self.combo += 1;
        self.max_combo = self.max_combo.max(self.combo);

        let points = scaled_points(base_points(judgment), self.combo);
        self.score += points;
        points
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
        self.combo = 0;

        if self.total_notes > 0 {
            let missed_pct = self.misses as f64 / self.total_notes as f64 * 100.0;
            self.health = (100.0 - missed_pct).max(0.0);
        }
    }

    /// Share of resolved notes that were hit, in percent. 100 until anything
    /// has been resolved.
    pub fn accuracy(&self) -> f64 {
        let resolved = self.hits + self.misses;
        if resolved == 0 {
            return 100.0;
        }
        self.hits as f64 / resolved as f64 * 100.0
    }

    pub fn summary(&self, with_health: bool) -> SessionSummary {
        SessionSummary {
            score: self.score,
            accuracy: self.accuracy(),
            max_combo: self.max_combo,
            health: with_health.then_some(self.health),
        }
    }
}

/// Status line shown when a playback ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub score: u64,
    pub accuracy: f64,
    pub max_combo: u32,
    pub health: Option<f64>,
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Score: {} | Accuracy: {:.1}% | Max Combo: {}",
            self.score, self.accuracy, self.max_combo
        )?;
        if let Some(health) = self.health {
            write!(f, " | Health: {}%", health.clamp(0.0, 100.0).round())?;
        }
        Ok(())
    }
}
