// Frame sources: the live camera, or a still image standing in for one.
// Visual expectation: when main.rs calls `next_frame()`, you get a frame of
// 0x00RRGGBB pixels exactly as the camera sees it (not yet mirrored).

use std::path::Path;

use crate::error::Error;
use crate::types::FrameBuffer;

// Bring in nokhwa types for camera control.
use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    },
};

/// Anything that hands the main loop one raw frame at a time.
pub trait FrameSource {
    /// Block until the next frame. `Ok(None)` means no frame this tick.
    fn next_frame(&mut self) -> Result<Option<FrameBuffer>, Error>;

    /// Size of the frames this source delivers.
    fn resolution(&self) -> (u32, u32);
}

// A small wrapper around nokhwa::Camera so our main loop stays clean.
pub struct CameraCapture {
    cam: Camera,
    width: u32,
    height: u32,
}

impl CameraCapture {
    /// Open camera `index` at a target resolution (falls back to the closest the device offers).
    pub fn new(index: u32, width: u32, height: u32) -> Result<Self, Error> {
        let idx = CameraIndex::Index(index);

        let fmt = CameraFormat::new(
            Resolution::new(width, height),
            FrameFormat::YUYV, // uncompressed; cheap to convert to RGB
            30,                // target FPS
        );

        // Ask for RGB frames, closest to our request.
        let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

        let mut cam = Camera::new(idx, req)
            .map_err(|e| Error::CameraInit(format!("Create camera: {e}")))?;

        cam.open_stream()
            .map_err(|e| Error::CameraInit(format!("Open stream: {e}")))?;

        // The actual stream might choose a slightly different resolution.
        let actual = cam.resolution();
        log::info!(
            "Camera {index} opened at {}x{} (requested {width}x{height})",
            actual.width(),
            actual.height()
        );

        Ok(Self {
            cam,
            width: actual.width(),
            height: actual.height(),
        })
    }
}

impl FrameSource for CameraCapture {
    /// Grab one frame (this blocks until the camera has one) and pack it as 0x00RRGGBB.
    fn next_frame(&mut self) -> Result<Option<FrameBuffer>, Error> {
        let frame = self
            .cam
            .frame()
            .map_err(|e| Error::CameraFrame(format!("Fetch frame: {e}")))?;

        let rgb_img = frame
            .decode_image::<RgbFormat>() // ImageBuffer<Rgb<u8>, Vec<u8>>
            .map_err(|e| Error::CameraFrame(format!("Decode RGB: {e}")))?;

        // Go through raw bytes: nokhwa may be built against a different `image` release.
        let (w, h) = rgb_img.dimensions();
        let fb = FrameBuffer::from_rgb_bytes(w as usize, h as usize, rgb_img.as_raw());
        if fb.pixels.len() != fb.width * fb.height {
            return Err(Error::CameraFrame(format!("Short frame: {}x{}", w, h)));
        }
        Ok(Some(fb))
    }

    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// A single picture served as every frame. Handy without a webcam.
pub struct StillImage {
    frame: FrameBuffer,
}

impl StillImage {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let img = image::open(path)
            .map_err(|source| Error::ImageLoad { path: path.to_path_buf(), source })?
            .to_rgb8();
        log::info!("Loaded still image {} ({}x{})", path.display(), img.width(), img.height());
        Ok(Self::from_frame(FrameBuffer::from_rgb_image(&img)))
    }

    pub fn from_frame(frame: FrameBuffer) -> Self {
        Self { frame }
    }
}

impl FrameSource for StillImage {
    fn next_frame(&mut self) -> Result<Option<FrameBuffer>, Error> {
        Ok(Some(self.frame.clone()))
    }

    fn resolution(&self) -> (u32, u32) {
        (self.frame.width as u32, self.frame.height as u32)
    }
}
