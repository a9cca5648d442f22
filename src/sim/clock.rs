//! Frame clock
//!
//! Converts wall-clock timestamps from the host driver into a dimensionless
//! `dt_ratio` relative to the 60 Hz reference frame.

use crate::consts::{MAX_DT_RATIO, REFERENCE_FRAME_MS};

#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_time_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { last_time_ms: None }
    }

    /// Advance to `now_ms` and return the normalized step.
    ///
    /// The first frame, and any non-positive or non-finite delta, count as one
    /// nominal frame. Long stalls are clamped to `MAX_DT_RATIO`.
    pub fn tick(&mut self, now_ms: f64) -> f32 {
        let delta = match self.last_time_ms {
            Some(last) => now_ms - last,
            None => REFERENCE_FRAME_MS,
        };
        if now_ms.is_finite() {
            self.last_time_ms = Some(now_ms);
        }

        let delta = if delta.is_finite() && delta > 0.0 {
            delta
        } else {
            log::warn!("Degenerate frame delta {delta}, using nominal frame");
            REFERENCE_FRAME_MS
        };

        ((delta / REFERENCE_FRAME_MS) as f32).min(MAX_DT_RATIO)
    }

    /// Forget the time base so the next tick is a nominal frame (used on resume)
    pub fn realign(&mut self) {
        self.last_time_ms = None;
    }
}
