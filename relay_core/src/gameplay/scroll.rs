use relay_schema::{Lane, Millis};

/// Vertical layout of the play field. Notes enter at y = 0 and fall at a
/// constant speed so that they cross `hit_line_y` exactly at their timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollGeometry {
    pub hit_line_y: f64,
    /// Pixels per millisecond.
    pub note_speed: f64,
    pub miss_margin_px: f64,
    pub note_height: f64,
    pub view_height: f64,
}

impl ScrollGeometry {
    /// Time a note needs to fall from the top to the hit line.
    pub fn travel_time_ms(&self) -> f64 {
        self.hit_line_y / self.note_speed
    }

    /// Position of a note at `elapsed_ms` into the phase, or `None` if it has
    /// not entered the field yet.
    pub fn note_y(&self, timestamp_ms: Millis, elapsed_ms: Millis) -> Option<f64> {
        let appear_time = timestamp_ms as f64 - self.travel_time_ms();
        let now = elapsed_ms as f64;
        if now < appear_time {
            return None;
        }
        Some((now - appear_time) * self.note_speed)
    }

    pub fn is_past_miss_line(&self, y: f64) -> bool {
        y > self.hit_line_y + self.miss_margin_px
    }

    pub fn is_on_screen(&self, y: f64) -> bool {
        y > -self.note_height && y < self.view_height
    }
}

/// Where to draw a note this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NotePosition {
    pub index: usize,
    pub lane: Lane,
    pub y: f64,
}
