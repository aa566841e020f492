use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

pub const STROKE_WIDTH: f64 = 20.0;
pub const STROKE_COLOR: &str = "#000";
pub const BACKGROUND_COLOR: &str = "#fff";

pub const PLACEHOLDER_TEXT: &str = "Predicción en tiempo real: -";
pub const PREDICT_ERROR_TEXT: &str = "Error al procesar predicción";
pub const BATCH_ERROR_TEXT: &str = "Error al procesar archivos";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Copy)]
pub enum StrokeMode {
    Idle,
    Drawing { last: Point },
}

/// Orders prediction responses by request issue order. A response is applied
/// only if no newer request has already been applied, so a slow reply can
/// never overwrite a fresher prediction.
#[derive(Default)]
pub struct SeqGuard {
    next: u64,
    applied: u64,
}

impl SeqGuard {
    /// Reserves the sequence number for a new request.
    pub fn begin(&mut self) -> u64 {
        self.next += 1;
        self.next
    }

    /// Records this response as the newest one if it still is.
    pub fn try_apply(&mut self, seq: u64) -> bool {
        if seq > self.applied {
            self.applied = seq;
            true
        } else {
            false
        }
    }

    /// Drops every request currently in flight. Used by the clear action.
    pub fn invalidate_pending(&mut self) {
        self.applied = self.next;
    }
}

pub struct State {
    pub canvas: HtmlCanvasElement,
    pub ctx: CanvasRenderingContext2d,
    pub mode: StrokeMode,
    pub seq: SeqGuard,
}

impl State {
    pub fn new(canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d) -> Self {
        Self {
            canvas,
            ctx,
            mode: StrokeMode::Idle,
            seq: SeqGuard::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_response_wins_over_slower_older_one() {
        let mut guard = SeqGuard::default();
        let first = guard.begin();
        let second = guard.begin();
        assert!(guard.try_apply(second));
        assert!(!guard.try_apply(first));
    }

    #[test]
    fn responses_in_order_all_apply() {
        let mut guard = SeqGuard::default();
        let first = guard.begin();
        let second = guard.begin();
        assert!(guard.try_apply(first));
        assert!(guard.try_apply(second));
    }

    #[test]
    fn duplicate_response_is_discarded() {
        let mut guard = SeqGuard::default();
        let seq = guard.begin();
        assert!(guard.try_apply(seq));
        assert!(!guard.try_apply(seq));
    }

    #[test]
    fn clear_discards_in_flight_responses() {
        let mut guard = SeqGuard::default();
        let pending = guard.begin();
        guard.invalidate_pending();
        assert!(!guard.try_apply(pending));
        let fresh = guard.begin();
        assert!(guard.try_apply(fresh));
    }
}
