// Pinch Blur - reshape a blurred quad in a live camera feed with pinch gestures.
//
// Each frame: hand detections become per-hand samples (mirror corrected),
// the `Session` runs one drag state machine per hand against a four-vertex
// `Polygon`, and `RegionBlur` blurs the polygon interior of the frame.

pub mod camera;
pub mod config;
pub mod detector;
pub mod drag;
pub mod draw;
pub mod error;
pub mod geometry;
pub mod hands;
pub mod pinch;
pub mod pipeline;
pub mod polygon;
pub mod session;
pub mod types;
pub mod vision;

pub use error::Error;
pub use polygon::Polygon;
pub use session::{ControllerConfig, Session};
pub use vision::RegionBlur;
