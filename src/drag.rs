// Per-hand drag state machine.
//
// Each hand is either idle or dragging one vertex. The vertex being dragged is
// captured at grab time and never re-picked mid-drag, so a drag cannot jump to
// a different corner when the pointer passes near it.

use std::fmt;

use crate::geometry::{nearest_vertex_index, point_in_circle};
use crate::hands::HandLabel;
use crate::polygon::Polygon;
use crate::types::{Offset, Point};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragPhase {
    #[default]
    Idle,
    Dragging {
        vertex: usize,
        /// pointer - vertex at the moment of the grab
        grab_offset: Offset,
    },
}

/// What happened to a hand this frame (for logging/HUD).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandEvent {
    Grabbed { hand: HandLabel, vertex: usize, grab_offset: Offset },
    Moved { hand: HandLabel, vertex: usize, to: Point },
    Released { hand: HandLabel, vertex: usize },
}

impl fmt::Display for HandEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandEvent::Grabbed { hand, vertex, grab_offset } => write!(
                f,
                "{hand} grabbed vertex {vertex} (offset {},{})",
                grab_offset.dx, grab_offset.dy
            ),
            HandEvent::Moved { hand, vertex, to } => {
                write!(f, "{hand} moved vertex {vertex} to ({},{})", to.x, to.y)
            }
            HandEvent::Released { hand, vertex } => write!(f, "{hand} released vertex {vertex}"),
        }
    }
}

/// Drag state for one hand; lives for the whole session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DragState {
    phase: DragPhase,
    // last frame's pinch result, for hysteresis
    pinching: bool,
}

impl DragState {
    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging { .. })
    }

    pub fn is_pinching(&self) -> bool {
        self.pinching
    }

    /// Vertex currently held by this hand, if any.
    pub fn target(&self) -> Option<usize> {
        match self.phase {
            DragPhase::Dragging { vertex, .. } => Some(vertex),
            DragPhase::Idle => None,
        }
    }

    /// Advance one frame for a hand that was detected.
    ///
    /// `hit_radius` is handle radius plus padding. Writes at most one vertex.
    pub fn update(
        &mut self,
        hand: HandLabel,
        pinching: bool,
        pointer: Point,
        polygon: &mut Polygon,
        hit_radius: i32,
    ) -> Option<HandEvent> {
        self.pinching = pinching;
        if !pinching {
            return self.release(hand);
        }

        match self.phase {
            DragPhase::Dragging { vertex, grab_offset } => {
                let to = pointer - grab_offset;
                let moved = polygon.get(vertex) != Some(to);
                polygon.set(vertex, to);
                moved.then_some(HandEvent::Moved { hand, vertex, to })
            }
            DragPhase::Idle => {
                let idx = nearest_vertex_index(polygon.vertices(), pointer)?;
                let v = polygon.get(idx)?;
                // rewrite in place: pinching off-handle leaves the vertex where it is
                polygon.set(idx, v);

                if !point_in_circle(v, hit_radius, pointer) {
                    return None;
                }
                let grab_offset = pointer - v;
                self.phase = DragPhase::Dragging { vertex: idx, grab_offset };
                Some(HandEvent::Grabbed { hand, vertex: idx, grab_offset })
            }
        }
    }

    /// Drop any grab. Used for an open hand and for a hand missing this frame.
    pub fn release(&mut self, hand: HandLabel) -> Option<HandEvent> {
        let held = self.target();
        self.phase = DragPhase::Idle;
        held.map(|vertex| HandEvent::Released { hand, vertex })
    }

    /// Forget everything, including the hysteresis memory.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HIT: i32 = 50;

    #[test]
    fn test_grab_inside_handle() {
        let mut poly = Polygon::default();
        let mut s = DragState::default();
        let ev = s.update(HandLabel::Right, true, Point::new(305, 305), &mut poly, HIT);
        assert_eq!(
            ev,
            Some(HandEvent::Grabbed {
                hand: HandLabel::Right,
                vertex: 0,
                grab_offset: Offset { dx: 5, dy: 5 }
            })
        );
        assert_eq!(s.target(), Some(0));
        // engaging does not move the vertex
        assert_eq!(poly, Polygon::default());
    }

    #[test]
    fn test_pinch_outside_handle_stays_idle() {
        let mut poly = Polygon::default();
        let mut s = DragState::default();
        let ev = s.update(HandLabel::Left, true, Point::new(600, 600), &mut poly, HIT);
        assert_eq!(ev, None);
        assert_eq!(s.phase(), DragPhase::Idle);
        assert_eq!(poly, Polygon::default());
    }

    #[test]
    fn test_grab_on_hit_radius_boundary() {
        let mut poly = Polygon::default();
        let mut s = DragState::default();
        // 30-40-50 triangle: exactly on the boundary counts
        s.update(HandLabel::Left, true, Point::new(330, 340), &mut poly, HIT);
        assert!(s.is_dragging());

        let mut s = DragState::default();
        s.update(HandLabel::Left, true, Point::new(351, 300), &mut poly, HIT);
        assert!(!s.is_dragging());
    }

    #[test]
    fn test_drag_keeps_offset_and_target() {
        let mut poly = Polygon::default();
        let mut s = DragState::default();
        s.update(HandLabel::Right, true, Point::new(305, 305), &mut poly, HIT);

        s.update(HandLabel::Right, true, Point::new(400, 400), &mut poly, HIT);
        assert_eq!(poly.get(0), Some(Point::new(395, 395)));

        // Sweep right past vertex 1; vertex 0 follows, vertex 1 untouched.
        let ev = s.update(HandLabel::Right, true, Point::new(1490, 310), &mut poly, HIT);
        assert_eq!(
            ev,
            Some(HandEvent::Moved { hand: HandLabel::Right, vertex: 0, to: Point::new(1485, 305) })
        );
        assert_eq!(poly.get(1), Some(Point::new(1500, 300)));
        assert_eq!(s.target(), Some(0));
    }

    #[test]
    fn test_drag_without_motion_reports_nothing() {
        let mut poly = Polygon::default();
        let mut s = DragState::default();
        s.update(HandLabel::Right, true, Point::new(305, 305), &mut poly, HIT);
        assert_eq!(s.update(HandLabel::Right, true, Point::new(305, 305), &mut poly, HIT), None);
        assert!(s.is_dragging());
    }

    #[test]
    fn test_release_and_fresh_offset() {
        let mut poly = Polygon::default();
        let mut s = DragState::default();
        s.update(HandLabel::Left, true, Point::new(305, 305), &mut poly, HIT);
        s.update(HandLabel::Left, true, Point::new(400, 400), &mut poly, HIT);

        let ev = s.update(HandLabel::Left, false, Point::new(500, 500), &mut poly, HIT);
        assert_eq!(ev, Some(HandEvent::Released { hand: HandLabel::Left, vertex: 0 }));
        assert_eq!(s.phase(), DragPhase::Idle);
        assert_eq!(poly.get(0), Some(Point::new(395, 395)));

        // Re-grab from the other side: new offset, not the old (5,5).
        let ev = s.update(HandLabel::Left, true, Point::new(390, 380), &mut poly, HIT);
        assert_eq!(
            ev,
            Some(HandEvent::Grabbed {
                hand: HandLabel::Left,
                vertex: 0,
                grab_offset: Offset { dx: -5, dy: -15 }
            })
        );
    }

    #[test]
    fn test_release_when_idle_is_silent() {
        let mut s = DragState::default();
        assert_eq!(s.release(HandLabel::Left), None);
    }
}
