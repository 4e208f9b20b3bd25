/// Turns host timestamps into sanitized frame deltas.
///
/// A frame that arrives after a long pause (suspended tab, debugger) is
/// clamped to `max_step_ms`; the rest of the gap is dropped, not replayed.
#[derive(Debug, Clone)]
pub struct FrameClock {
    prev_ms: Option<f64>,
    max_step_ms: f64,
}

impl FrameClock {
    pub fn new(max_step_ms: f64) -> Self {
        assert!(
            max_step_ms.is_finite() && max_step_ms > 0.0,
            "max step must be positive, got {max_step_ms}"
        );
        Self {
            prev_ms: None,
            max_step_ms,
        }
    }

    pub fn start(&mut self, now_ms: f64) {
        self.prev_ms = Some(now_ms);
    }

    pub fn is_started(&self) -> bool {
        self.prev_ms.is_some()
    }

    /// Delta to simulate for a frame at `now_ms`, or `None` when the frame
    /// should skip update and render.
    pub fn advance(&mut self, now_ms: f64) -> Option<f64> {
        let prev = self.prev_ms.replace(now_ms)?;
        let dt = now_ms - prev;
        if dt.is_nan() || dt <= 0.0 {
            return None;
        }
        Some(dt.min(self.max_step_ms))
    }
}
