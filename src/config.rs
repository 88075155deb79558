// Command-line configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::pinch::{PINCH_THRESHOLD, PinchClassifier};
use crate::polygon::Polygon;
use crate::session::{ControllerConfig, DEFAULT_HANDLE_PADDING, DEFAULT_HANDLE_RADIUS};
use crate::vision::{DEFAULT_BLUR_RADIUS, MAX_BLUR_RADIUS};

/// What the hands control.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Pinch near a corner to drag it.
    Drag,
    /// Two hands: the thumb and index tips span the blurred quad.
    Outline,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::Drag => Mode::Outline,
            Mode::Outline => Mode::Drag,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Drag => "drag",
            Mode::Outline => "outline",
        }
    }
}

/// Pinch Blur - reshape a blurred region of your webcam feed with pinch gestures
#[derive(Parser, Debug, Clone)]
#[command(name = "pinch-blur")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Camera index (0 = default webcam)
    #[arg(long, default_value_t = 0)]
    pub camera: u32,

    /// Requested capture width
    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    /// Requested capture height
    #[arg(long, default_value_t = 720)]
    pub height: u32,

    /// Use a still image instead of the camera
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Replay hand detections from a JSON-lines file instead of using the mouse
    #[arg(long)]
    pub replay: Option<PathBuf>,

    /// Interaction mode
    #[arg(long, value_enum, default_value_t = Mode::Drag)]
    pub mode: Mode,

    /// Initial quad as "x,y;x,y;x,y;x,y"
    #[arg(long, default_value = "300,300;1500,300;1500,900;300,900")]
    pub vertices: Polygon,

    /// Vertex handle radius (pixels)
    #[arg(long, default_value_t = DEFAULT_HANDLE_RADIUS)]
    pub handle_radius: i32,

    /// Extra grab tolerance around a handle (pixels)
    #[arg(long, default_value_t = DEFAULT_HANDLE_PADDING)]
    pub padding: i32,

    /// Gaussian blur radius inside the quad (0 to 200)
    #[arg(long, default_value_t = DEFAULT_BLUR_RADIUS, value_parser = parse_blur_radius)]
    pub blur_radius: f32,

    /// Normalized thumb-index distance at or below which a hand pinches
    #[arg(long, default_value_t = PINCH_THRESHOLD)]
    pub pinch_threshold: f32,

    /// Distance at which an ongoing pinch lets go (defaults to the pinch threshold)
    #[arg(long)]
    pub release_threshold: Option<f32>,
}

fn parse_blur_radius(s: &str) -> Result<f32, String> {
    let radius: f32 = s.parse().map_err(|e| format!("{e}"))?;
    if !(0.0..=MAX_BLUR_RADIUS).contains(&radius) {
        return Err(format!("must be between 0 and {MAX_BLUR_RADIUS}, got {s}"));
    }
    Ok(radius)
}

impl Args {
    pub fn controller_config(&self) -> ControllerConfig {
        let release = self.release_threshold.unwrap_or(self.pinch_threshold);
        ControllerConfig {
            handle_radius: self.handle_radius,
            padding: self.padding,
            pinch: PinchClassifier::new(self.pinch_threshold, release),
        }
    }
}
