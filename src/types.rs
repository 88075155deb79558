// Core types shared by capture, the controller and the compositor.

use std::ops::{Add, Sub};

use image::{ImageBuffer, Rgb};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    pub width: usize,     // how wide the frame is on screen (pixels)
    pub height: usize,    // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>, // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    /// A black frame of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }

    /// Pack tightly packed RGB8 bytes into 0x00RRGGBB pixels.
    pub fn from_rgb_bytes(width: usize, height: usize, rgb: &[u8]) -> Self {
        let pixels = rgb
            .chunks_exact(3)
            .take(width * height)
            .map(|p| ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | p[2] as u32)
            .collect();
        Self { width, height, pixels }
    }

    /// Pack an RGB image into 0x00RRGGBB pixels.
    pub fn from_rgb_image(img: &ImageBuffer<Rgb<u8>, Vec<u8>>) -> Self {
        let (w, h) = img.dimensions();
        Self::from_rgb_bytes(w as usize, h as usize, img.as_raw())
    }

    /// Copy of this frame flipped left-to-right.
    /// Visual: the selfie view; raising your right hand moves the right side of the screen.
    pub fn mirrored(&self) -> Self {
        let mut out = Vec::with_capacity(self.pixels.len());
        for row in self.pixels.chunks_exact(self.width.max(1)) {
            out.extend(row.iter().rev());
        }
        Self { width: self.width, height: self.height, pixels: out }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.width + x]
    }
}

/// Binary coverage mask; `true` = pixel belongs to the region.
#[derive(Clone, Debug)]
pub struct Mask {
    pub width: usize,
    pub height: usize,
    pub covered: Vec<bool>, // length = width * height
}

impl Mask {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, covered: vec![false; width * height] }
    }

    pub fn is_empty(&self) -> bool {
        !self.covered.iter().any(|&c| c)
    }
}

/// Integer pixel position in display (post-mirror) space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Difference between two points; the grab offset of a drag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Offset {
    pub dx: i32,
    pub dy: i32,
}

impl Sub for Point {
    type Output = Offset;

    fn sub(self, rhs: Point) -> Offset {
        Offset { dx: self.x - rhs.x, dy: self.y - rhs.y }
    }
}

impl Sub<Offset> for Point {
    type Output = Point;

    fn sub(self, rhs: Offset) -> Point {
        Point::new(self.x - rhs.dx, self.y - rhs.dy)
    }
}

impl Add<Offset> for Point {
    type Output = Point;

    fn add(self, rhs: Offset) -> Point {
        Point::new(self.x + rhs.dx, self.y + rhs.dy)
    }
}
