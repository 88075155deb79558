// What you SEE:
// • The mirrored camera feed with a purple quad; everything inside it is blurred.
// • Pinch (thumb + index) near a corner handle and move: the corner follows.
//   Without a hand tracker the mouse stands in: hold LMB to pinch.
// • M switches to outline mode (two hands span the blurred quad) and back.
// • R puts the quad back where it started. ESC quits.

use std::time::{Duration, Instant};

use clap::Parser;

use pinch_blur::camera::{CameraCapture, FrameSource, StillImage};
use pinch_blur::config::Args;
use pinch_blur::detector::{HandDetector, PointerDetector, ReplayDetector};
use pinch_blur::draw::Drawer;
use pinch_blur::pipeline::{Pipeline, Tick};
use pinch_blur::{Error, RegionBlur, Session};

/// Where hand detections come from this run.
enum Input {
    Pointer(PointerDetector),
    Replay(ReplayDetector),
}

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    log::info!("Pinch Blur v{}", env!("CARGO_PKG_VERSION"));

    /* --- Frame source + window setup --- */
    let mut source: Box<dyn FrameSource> = match &args.image {
        Some(path) => Box::new(StillImage::open(path)?),
        None => Box::new(CameraCapture::new(args.camera, args.width, args.height)?),
    };
    let (w, h) = source.resolution();
    let mut drawer = Drawer::new("Pinch Blur", w as usize, h as usize)?;

    let mut input = match &args.replay {
        Some(path) => Input::Replay(ReplayDetector::open(path)?),
        None => {
            log::info!("No replay file given; hold the left mouse button to pinch");
            Input::Pointer(PointerDetector::new())
        }
    };

    /* --- Controller + compositor --- */
    let initial = args.vertices;
    let session = Session::new(initial, args.controller_config());
    let compositor = RegionBlur::new(args.blur_radius);
    let mut pipeline = Pipeline::new(session, compositor, args.mode, w as usize, h as usize);

    /* --- FPS --- */
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut hud_fps_text = String::from("FPS: 0.0");

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        if drawer.m_pressed_once() {
            let mode = pipeline.toggle_mode();
            log::info!("Mode: {}", mode.as_str());
        }
        if drawer.r_pressed_once() {
            pipeline.reset(initial);
            log::info!("Quad reset to {initial}");
        }

        /* 1) Grab a raw frame and pick this run's hand source. */
        let frame = source.next_frame();
        let detector: &mut dyn HandDetector = match &mut input {
            Input::Pointer(pointer) => {
                pointer.update(drawer.mouse_pos(), drawer.left_mouse_down());
                pointer
            }
            Input::Replay(replay) => replay,
        };

        /* 2) Controller step, blur, overlay. A missing frame keeps the last screen. */
        let tick = pipeline.tick(frame, detector, &hud_fps_text)?;

        /* 3) Present (the previous screen again if this tick was skipped). */
        drawer.present(pipeline.screen())?;
        if tick == Tick::Skipped {
            continue;
        }

        /* 4) FPS counter (log + HUD once per second) */
        frames_this_second += 1;
        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            let fps = frames_this_second as f32 / secs;
            log::info!("FPS: {:.1}", fps);
            hud_fps_text = format!("FPS: {:.1}", fps);
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    log::info!("Exiting");
    Ok(())
}
