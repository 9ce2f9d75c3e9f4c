//! Pointer gesture state machine: Idle -> Down -> Dragging -> Idle.
//!
//! A press only becomes a drag once the pointer has travelled further than
//! the threshold, so small jitter during a click never extends a selection.

use super::hit::HitTarget;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerPhase {
    Idle,
    Down { x: f64, y: f64 },
    Dragging,
}

#[derive(Debug, Clone)]
pub struct PointerTracker {
    phase: PointerPhase,
    /// Target under the pointer when it went down
    origin: HitTarget,
    threshold: f64,
}

impl PointerTracker {
    pub fn new(threshold: f64) -> Self {
        Self {
            phase: PointerPhase::Idle,
            origin: HitTarget::None,
            threshold: threshold.max(0.0),
        }
    }

    pub fn phase(&self) -> PointerPhase {
        self.phase
    }

    pub fn origin(&self) -> HitTarget {
        self.origin
    }

    pub fn is_dragging(&self) -> bool {
        self.phase == PointerPhase::Dragging
    }

    pub fn set_threshold(&mut self, threshold: f64) {
        self.threshold = threshold.max(0.0);
    }

    pub fn down(&mut self, x: f64, y: f64, target: HitTarget) {
        self.phase = PointerPhase::Down { x, y };
        self.origin = target;
    }

    /// Feed a move. Returns `true` while the gesture is a drag.
    pub fn move_to(&mut self, x: f64, y: f64) -> bool {
        match self.phase {
            PointerPhase::Idle => false,
            PointerPhase::Dragging => true,
            PointerPhase::Down { x: x0, y: y0 } => {
                if (x - x0).hypot(y - y0) > self.threshold {
                    log::trace!("pointer: drag started from {:?}", self.origin);
                    self.phase = PointerPhase::Dragging;
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Release. Returns the press target when the gesture was a click.
    pub fn up(&mut self) -> Option<HitTarget> {
        let phase = std::mem::replace(&mut self.phase, PointerPhase::Idle);
        let origin = std::mem::replace(&mut self.origin, HitTarget::None);
        match phase {
            PointerPhase::Down { .. } => Some(origin),
            PointerPhase::Idle | PointerPhase::Dragging => None,
        }
    }

    pub fn cancel(&mut self) {
        self.phase = PointerPhase::Idle;
        self.origin = HitTarget::None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellPoint;

    const CELL: HitTarget = HitTarget::Cell(CellPoint::new(1, 1));

    #[test]
    fn test_jitter_stays_a_click() {
        let mut p = PointerTracker::new(5.0);
        p.down(10.0, 10.0, CELL);
        assert!(!p.move_to(13.0, 13.0));
        assert_eq!(p.up(), Some(CELL));
        assert_eq!(p.phase(), PointerPhase::Idle);
    }

    #[test]
    fn test_drag_after_threshold() {
        let mut p = PointerTracker::new(5.0);
        p.down(10.0, 10.0, CELL);
        assert!(p.move_to(20.0, 10.0));
        // Stays a drag even when moving back.
        assert!(p.move_to(10.0, 10.0));
        assert_eq!(p.up(), None);
    }

    #[test]
    fn test_moves_without_press_are_ignored() {
        let mut p = PointerTracker::new(5.0);
        assert!(!p.move_to(100.0, 100.0));
        assert_eq!(p.up(), None);
    }
}
