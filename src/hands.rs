// Hand detections and the per-frame samples the controller consumes.
//
// A detector reports hands in the *unflipped* camera image. The window shows
// the image mirrored (selfie view), so labels and x coordinates are flipped
// here, once, before anything else looks at them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry;
use crate::types::Point;

/// Landmarks per hand in the MediaPipe hand model.
pub const LANDMARK_COUNT: usize = 21;
pub const THUMB_TIP: usize = 4;
pub const INDEX_TIP: usize = 8;

/// Which hand, as the user sees it on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandLabel {
    Left,
    Right,
}

impl HandLabel {
    /// Fixed processing order. When both hands write the same vertex in one
    /// frame, the later label (`Right`) wins.
    pub const ALL: [HandLabel; 2] = [HandLabel::Left, HandLabel::Right];

    /// The other hand; applied to detector labels to undo the display flip.
    pub fn mirrored(self) -> Self {
        match self {
            HandLabel::Left => HandLabel::Right,
            HandLabel::Right => HandLabel::Left,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HandLabel::Left => "Left",
            HandLabel::Right => "Right",
        }
    }
}

impl fmt::Display for HandLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One landmark in normalized `[0,1]` image coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }
}

/// A hand exactly as the detector reported it (unflipped image, raw label).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub label: HandLabel,
    pub landmarks: Vec<Landmark>,
}

impl Detection {
    pub fn thumb_tip(&self) -> Option<Landmark> {
        self.landmarks.get(THUMB_TIP).copied()
    }

    pub fn index_tip(&self) -> Option<Landmark> {
        self.landmarks.get(INDEX_TIP).copied()
    }
}

/// Per-frame input for one hand, in display space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandSample {
    /// Label after mirror correction.
    pub label: HandLabel,
    /// Thumb tip in display pixels.
    pub thumb: Point,
    /// Index tip in display pixels.
    pub index: Point,
    /// Thumb-to-index distance in normalized units.
    pub pinch_distance: f32,
    /// Midpoint between the two tips, mirrored to match the display.
    pub pointer: Point,
}

impl HandSample {
    /// Convert a raw detection for a `width` x `height` frame.
    /// `None` when the detection lacks the thumb or index tip.
    pub fn from_detection(det: &Detection, width: usize, height: usize) -> Option<Self> {
        let thumb = det.thumb_tip()?;
        let index = det.index_tip()?;
        let (w, h) = (width as f32, height as f32);
        let w_px = width as i32;

        let thumb_px = Point::new((thumb.x * w) as i32, (thumb.y * h) as i32);
        let index_px = Point::new((index.x * w) as i32, (index.y * h) as i32);

        // Midpoint is taken in camera space, then flipped.
        // i64 because replayed landmarks can sit far outside the frame.
        let mid_x = (thumb_px.x as i64 + index_px.x as i64) / 2;
        let mid_y = (thumb_px.y as i64 + index_px.y as i64) / 2;
        let flip = |x: i64| clamp_i32(w_px as i64 - x);

        Some(Self {
            label: det.label.mirrored(),
            thumb: Point::new(flip(thumb_px.x as i64), thumb_px.y),
            index: Point::new(flip(index_px.x as i64), index_px.y),
            pinch_distance: geometry::distance([thumb.x, thumb.y], [index.x, index.y]),
            pointer: Point::new(flip(mid_x), clamp_i32(mid_y)),
        })
    }
}

fn clamp_i32(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Samples for one frame, at most one per label.
/// If the detector reports the same label twice, the later detection wins.
pub fn samples_from_detections(dets: &[Detection], width: usize, height: usize) -> Vec<HandSample> {
    let mut out: Vec<HandSample> = Vec::with_capacity(2);
    for det in dets {
        let Some(sample) = HandSample::from_detection(det, width, height) else {
            log::warn!("Dropping {} hand with {} landmarks", det.label, det.landmarks.len());
            continue;
        };
        match out.iter_mut().find(|s| s.label == sample.label) {
            Some(existing) => *existing = sample,
            None => out.push(sample),
        }
    }
    out
}
