// Hand detector implementations.
//
// The landmark model itself lives outside this crate. Anything that can turn
// a frame into `Detection`s plugs in through `HandDetector`; two sources
// ship here:
//
// * `ReplayDetector` plays back recorded detections from a JSON-lines file.
// * `PointerDetector` lets the mouse stand in for one hand.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::Error;
use crate::hands::{Detection, HandLabel, INDEX_TIP, LANDMARK_COUNT, Landmark, THUMB_TIP};
use crate::types::FrameBuffer;

/// Turns a raw (unflipped) frame into hand detections.
pub trait HandDetector {
    fn detect(&mut self, frame: &FrameBuffer) -> Vec<Detection>;
}

/// One line of a replay file: `{"hands": [{"label": "Left", "landmarks": [{"x":..,"y":..}, ...]}]}`.
#[derive(Debug, Deserialize)]
struct ReplayFrame {
    #[serde(default)]
    hands: Vec<Detection>,
}

/// Plays back recorded detections, one line per frame.
/// Once the recording runs out every frame reports no hands.
pub struct ReplayDetector {
    frames: Vec<Vec<Detection>>,
    cursor: usize,
}

impl ReplayDetector {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::ReplayIo {
            path: path.to_path_buf(),
            source,
        })?;
        let det = Self::parse(&text)?;
        log::info!("Loaded {} replay frames from {}", det.len(), path.display());
        Ok(det)
    }

    /// Parse JSON lines. Blank lines are skipped.
    pub fn parse(text: &str) -> Result<Self, Error> {
        let mut frames = Vec::new();
        for (i, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let frame: ReplayFrame = serde_json::from_str(line)
                .map_err(|source| Error::ReplayParse { line: i + 1, source })?;
            frames.push(frame.hands);
        }
        Ok(Self { frames, cursor: 0 })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.frames.len()
    }
}

impl HandDetector for ReplayDetector {
    fn detect(&mut self, _frame: &FrameBuffer) -> Vec<Detection> {
        match self.frames.get(self.cursor) {
            Some(hands) => {
                self.cursor += 1;
                hands.clone()
            }
            None => Vec::new(),
        }
    }
}

/// Half the thumb-to-index gap of an open (not pinching) synthetic hand.
const OPEN_HALF_GAP: f32 = 0.05;

/// Mouse-driven stand-in for a single hand.
///
/// The cursor is in display space; landmarks are produced in camera space
/// (un-mirrored) so they go through the same correction as real detections.
/// Left button held = pinch, released = open hand.
pub struct PointerDetector {
    pointer: Option<(usize, usize)>,
    pressed: bool,
}

impl PointerDetector {
    pub fn new() -> Self {
        Self { pointer: None, pressed: false }
    }

    /// Feed the latest mouse state (call once per frame before `detect`).
    pub fn update(&mut self, pointer: Option<(usize, usize)>, pressed: bool) {
        self.pointer = pointer;
        self.pressed = pressed;
    }
}

impl Default for PointerDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl HandDetector for PointerDetector {
    fn detect(&mut self, frame: &FrameBuffer) -> Vec<Detection> {
        let Some((mx, my)) = self.pointer else {
            return Vec::new();
        };
        if frame.width == 0 || frame.height == 0 {
            return Vec::new();
        }
        let (w, h) = (frame.width as f32, frame.height as f32);

        // Pixel centres, so truncation lands back on the cursor pixel.
        let x = (frame.width.saturating_sub(mx)) as f32 + 0.5;
        let x = x / w;
        let y = (my as f32 + 0.5) / h;

        let mut landmarks = vec![Landmark::new(x, y); LANDMARK_COUNT];
        if !self.pressed {
            landmarks[THUMB_TIP] = Landmark::new(x, y - OPEN_HALF_GAP);
            landmarks[INDEX_TIP] = Landmark::new(x, y + OPEN_HALF_GAP);
        }

        // Reported as the camera sees it; shows up as the right hand on screen.
        vec![Detection { label: HandLabel::Left, landmarks }]
    }
}
