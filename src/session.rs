// The controller session: one polygon, one drag state per hand.
//
// Everything here runs on the frame thread. `step()` is called once per frame
// with that frame's samples and mutates the polygon in place.

use crate::drag::{DragState, HandEvent};
use crate::hands::{HandLabel, HandSample};
use crate::pinch::PinchClassifier;
use crate::polygon::Polygon;

pub const DEFAULT_HANDLE_RADIUS: i32 = 30;
pub const DEFAULT_HANDLE_PADDING: i32 = 20;

/// Tunables for the drag controller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControllerConfig {
    /// Drawn radius of a vertex handle (pixels).
    pub handle_radius: i32,
    /// Extra grab tolerance around a handle (pixels).
    pub padding: i32,
    pub pinch: PinchClassifier,
}

impl ControllerConfig {
    pub fn hit_radius(&self) -> i32 {
        self.handle_radius.saturating_add(self.padding)
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            handle_radius: DEFAULT_HANDLE_RADIUS,
            padding: DEFAULT_HANDLE_PADDING,
            pinch: PinchClassifier::default(),
        }
    }
}

pub struct Session {
    polygon: Polygon,
    left: DragState,
    right: DragState,
    config: ControllerConfig,
}

impl Session {
    pub fn new(polygon: Polygon, config: ControllerConfig) -> Self {
        Self {
            polygon,
            left: DragState::default(),
            right: DragState::default(),
            config,
        }
    }

    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn drag_state(&self, hand: HandLabel) -> &DragState {
        match hand {
            HandLabel::Left => &self.left,
            HandLabel::Right => &self.right,
        }
    }

    /// Advance one frame.
    ///
    /// Hands are processed in [`HandLabel::ALL`] order. A hand without a sample
    /// is released. If several samples share a label the last one is used.
    pub fn step(&mut self, samples: &[HandSample]) -> Vec<HandEvent> {
        let mut events = Vec::new();
        for hand in HandLabel::ALL {
            let sample = samples.iter().rev().find(|s| s.label == hand);
            let state = match hand {
                HandLabel::Left => &mut self.left,
                HandLabel::Right => &mut self.right,
            };

            let event = match sample {
                Some(s) => {
                    let pinching = self.config.pinch.classify(s.pinch_distance, state.is_pinching());
                    state.update(hand, pinching, s.pointer, &mut self.polygon, self.config.hit_radius())
                }
                None => {
                    let ev = state.release(hand);
                    state.reset();
                    ev
                }
            };
            events.extend(event);
        }
        events
    }

    /// Put the polygon back and drop every grab.
    pub fn reset(&mut self, polygon: Polygon) {
        self.polygon = polygon;
        self.left.reset();
        self.right.reset();
    }
}

/// Quad spanned by two hands' thumb and index tips (Left hand first).
/// `None` unless both hands are present.
pub fn fingertip_quad(samples: &[HandSample]) -> Option<Polygon> {
    let find = |hand| samples.iter().rev().find(|s| s.label == hand);
    let a = find(HandLabel::Left)?;
    let b = find(HandLabel::Right)?;
    Some(Polygon::from_fingertip_pairs((a.thumb, a.index), (b.thumb, b.index)))
}
