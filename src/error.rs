// The crate error type.
// Every variant states *where* things went wrong.
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Window init error: {0}")]
    WindowInit(String), // Creating the window failed
    #[error("Window update error: {0}")]
    WindowUpdate(String), // Updating the window buffer failed
    #[error("Camera init error: {0}")]
    CameraInit(String), // Opening/starting the camera failed
    #[error("Camera frame error: {0}")]
    CameraFrame(String), // Grabbing/decoding a frame failed
    #[error("Frame size mismatch: {0}")]
    SizeMismatch(String), // Two buffers that must line up do not

    #[error("Image load error ({path}): {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Replay read error ({path}): {source}")]
    ReplayIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Replay parse error on line {line}: {source}")]
    ReplayParse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid polygon: {0}")]
    InvalidPolygon(String),
}
