use super::note::PlaybackNote;
use relay_schema::{Lane, Millis};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Judgment {
    Perfect,
    Good,
}

/// Half-width timing windows around a note's arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JudgeWindows {
    pub perfect_ms: Millis,
    /// Capture window; presses further away than this are ignored.
    pub hit_ms: Millis,
}

impl JudgeWindows {
    pub fn classify(&self, offset_ms: Millis) -> Option<Judgment> {
        if offset_ms <= self.perfect_ms {
            Some(Judgment::Perfect)
        } else if offset_ms <= self.hit_ms {
            Some(Judgment::Good)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JudgmentResult {
    pub note_index: usize,
    pub judgment: Judgment,
    /// Press time minus note time. Positive means late.
    pub delta_ms: i64,
}

impl JudgmentResult {
    pub fn offset_ms(&self) -> Millis {
        self.delta_ms.unsigned_abs()
    }
}

/// Picks the unresolved note in `lane` closest to `elapsed_ms`, provided it is
/// inside the hit window.
///
/// Notes are scanned linearly, so the sequence does not need to be sorted.
/// When two candidates are equally close the earlier timestamp wins, then the
/// lower index.
pub fn find_hit(
    notes: &[PlaybackNote],
    lane: Lane,
    elapsed_ms: Millis,
    windows: &JudgeWindows,
) -> Option<JudgmentResult> {
    let mut best: Option<(usize, Millis, Millis)> = None;

    for (idx, note) in notes.iter().enumerate() {
        if note.lane() != lane || note.is_resolved() {
            continue;
        }
        let offset = elapsed_ms.abs_diff(note.timestamp_ms());
        if offset > windows.hit_ms {
            continue;
        }
        let closer = match best {
            None => true,
            Some((_, best_offset, best_ts)) => {
                offset < best_offset || (offset == best_offset && note.timestamp_ms() < best_ts)
            }
        };
        if closer {
            best = Some((idx, offset, note.timestamp_ms()));
        }
    }

    let (note_index, offset, timestamp) = best?;
    let judgment = windows.classify(offset)?;
    Some(JudgmentResult {
        note_index,
        judgment,
        delta_ms: elapsed_ms as i64 - timestamp as i64,
    })
}
