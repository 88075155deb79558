// One tick of the app without the window: raw frame in, controller step,
// blurred and annotated screen out.
// Visual expectation: after each `tick()`, `screen()` is what the window shows.
// A tick without a camera frame keeps showing the previous screen, but every
// grab is let go (nobody can be seen pinching).

use crate::config::Mode;
use crate::detector::HandDetector;
use crate::draw::{
    FINGERTIP_COLOR, HUD_COLOR, OUTLINE_COLOR, draw_circle, draw_polygon, draw_text_5x7,
};
use crate::error::Error;
use crate::hands::{HandSample, samples_from_detections};
use crate::polygon::Polygon;
use crate::session::{Session, fingertip_quad};
use crate::types::FrameBuffer;
use crate::vision::RegionBlur;

const OUTLINE_THICKNESS: i32 = 5;
const FINGERTIP_RADIUS: i32 = 30;

/// What a tick did with its frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    /// A new frame was processed and the screen redrawn.
    Fresh,
    /// No usable frame; the screen is the previous one.
    Skipped,
}

pub struct Pipeline {
    session: Session,
    compositor: RegionBlur,
    mode: Mode,
    screen: FrameBuffer,
}

impl Pipeline {
    /// Starts with a black screen of the given size.
    pub fn new(session: Session, compositor: RegionBlur, mode: Mode, width: usize, height: usize) -> Self {
        Self { session, compositor, mode, screen: FrameBuffer::new(width, height) }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn screen(&self) -> &FrameBuffer {
        &self.screen
    }

    pub fn toggle_mode(&mut self) -> Mode {
        self.mode = self.mode.toggled();
        self.mode
    }

    /// Put the quad back and drop every grab.
    pub fn reset(&mut self, polygon: Polygon) {
        self.session.reset(polygon);
    }

    /// Run one frame. `frame` is whatever the frame source returned; a missing
    /// frame and a capture error both count as a tick with no hands.
    /// `status` is appended to the HUD line.
    pub fn tick(
        &mut self,
        frame: Result<Option<FrameBuffer>, Error>,
        detector: &mut dyn HandDetector,
        status: &str,
    ) -> Result<Tick, Error> {
        let raw = match frame {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                self.step(&[]);
                return Ok(Tick::Skipped);
            }
            Err(e) => {
                log::warn!("Ignoring empty camera frame: {e}");
                self.step(&[]);
                return Ok(Tick::Skipped);
            }
        };

        /* Hands, in display space. */
        let detections = detector.detect(&raw);
        let samples = samples_from_detections(&detections, raw.width, raw.height);

        /* Update the quad. */
        let region = match self.mode {
            Mode::Drag => {
                self.step(&samples);
                Some(*self.session.polygon())
            }
            Mode::Outline => {
                // corners are not draggable here; let go of any grab
                self.step(&[]);
                fingertip_quad(&samples)
            }
        };

        /* Mirror, blur inside the quad, draw overlays. */
        let display = raw.mirrored();
        self.screen = match &region {
            Some(poly) => self.compositor.apply(&display, poly)?,
            None => display,
        };
        let handle_radius = self.session.config().handle_radius;
        draw_overlay(&mut self.screen, self.mode, region.as_ref(), &samples, handle_radius);

        let labels: Vec<&str> = samples.iter().map(|s| s.label.as_str()).collect();
        let hud = format!("{} | HANDS: [{}] | {}", self.mode.as_str(), labels.join(", "), status);
        draw_text_5x7(&mut self.screen, 16, 16, &hud, HUD_COLOR, 3);

        Ok(Tick::Fresh)
    }

    fn step(&mut self, samples: &[HandSample]) {
        for event in self.session.step(samples) {
            log::debug!("{event}");
        }
    }
}

fn draw_overlay(
    screen: &mut FrameBuffer,
    mode: Mode,
    region: Option<&Polygon>,
    samples: &[HandSample],
    handle_radius: i32,
) {
    if let Some(poly) = region {
        draw_polygon(screen, poly.vertices(), OUTLINE_THICKNESS, OUTLINE_COLOR);
        if mode == Mode::Drag {
            for &v in poly.vertices() {
                draw_circle(screen, v, handle_radius, OUTLINE_THICKNESS, OUTLINE_COLOR);
            }
        }
    }
    for s in samples {
        draw_circle(screen, s.thumb, FINGERTIP_RADIUS, OUTLINE_THICKNESS, FINGERTIP_COLOR);
        draw_circle(screen, s.index, FINGERTIP_RADIUS, OUTLINE_THICKNESS, FINGERTIP_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hands::{Detection, HandLabel, INDEX_TIP, LANDMARK_COUNT, Landmark, THUMB_TIP};
    use crate::session::ControllerConfig;
    use crate::types::Point;

    const W: usize = 200;
    const H: usize = 100;

    /// Reports the same detections every frame.
    struct Fixed(Vec<Detection>);

    impl HandDetector for Fixed {
        fn detect(&mut self, _frame: &FrameBuffer) -> Vec<Detection> {
            self.0.clone()
        }
    }

    /// A raw Left hand (Right after mirroring) pinched at display pixel `at`.
    fn pinched_at(at: Point) -> Detection {
        let x = ((W as i32 - at.x) as f32 + 0.5) / W as f32;
        let y = (at.y as f32 + 0.5) / H as f32;
        let mut landmarks = vec![Landmark::default(); LANDMARK_COUNT];
        landmarks[THUMB_TIP] = Landmark::new(x, y);
        landmarks[INDEX_TIP] = Landmark::new(x, y);
        Detection { label: HandLabel::Left, landmarks }
    }

    fn striped() -> FrameBuffer {
        let mut frame = FrameBuffer::new(W, H);
        for (i, p) in frame.pixels.iter_mut().enumerate() {
            *p = if (i % W / 3) % 2 == 0 { 0x00FFFFFF } else { 0x00000000 };
        }
        frame
    }

    fn pipeline(mode: Mode) -> Pipeline {
        let quad = Polygon::new([
            Point::new(20, 20),
            Point::new(150, 20),
            Point::new(150, 80),
            Point::new(20, 80),
        ]);
        let session = Session::new(quad, ControllerConfig::default());
        Pipeline::new(session, RegionBlur::new(3.0), mode, W, H)
    }

    #[test]
    fn test_fresh_tick_grabs_and_redraws() {
        let mut p = pipeline(Mode::Drag);
        let mut hand = Fixed(vec![pinched_at(Point::new(20, 20))]);
        let tick = p.tick(Ok(Some(striped())), &mut hand, "").unwrap();
        assert_eq!(tick, Tick::Fresh);
        assert_eq!(p.session().drag_state(HandLabel::Right).target(), Some(0));
        assert_ne!(p.screen(), &FrameBuffer::new(W, H));
    }

    #[test]
    fn test_missing_frame_releases_and_keeps_screen() {
        let mut p = pipeline(Mode::Drag);
        let mut hand = Fixed(vec![pinched_at(Point::new(20, 20))]);
        p.tick(Ok(Some(striped())), &mut hand, "").unwrap();
        let shown = p.screen().clone();

        let tick = p.tick(Ok(None), &mut hand, "").unwrap();
        assert_eq!(tick, Tick::Skipped);
        assert_eq!(p.screen(), &shown);
        assert!(!p.session().drag_state(HandLabel::Right).is_dragging());
    }

    #[test]
    fn test_capture_error_is_skipped_not_fatal() {
        let mut p = pipeline(Mode::Drag);
        let mut hand = Fixed(vec![pinched_at(Point::new(20, 20))]);
        p.tick(Ok(Some(striped())), &mut hand, "").unwrap();
        let shown = p.screen().clone();

        let err = Error::CameraFrame("Fetch frame: timeout".into());
        assert_eq!(p.tick(Err(err), &mut hand, "").unwrap(), Tick::Skipped);
        assert_eq!(p.screen(), &shown);
        assert!(!p.session().drag_state(HandLabel::Right).is_dragging());

        // the next good frame grabs again
        assert_eq!(p.tick(Ok(Some(striped())), &mut hand, "").unwrap(), Tick::Fresh);
        assert!(p.session().drag_state(HandLabel::Right).is_dragging());
    }

    #[test]
    fn test_outline_mode_does_not_drag() {
        let mut p = pipeline(Mode::Drag);
        let mut hand = Fixed(vec![pinched_at(Point::new(20, 20))]);
        p.tick(Ok(Some(striped())), &mut hand, "").unwrap();
        assert_eq!(p.toggle_mode(), Mode::Outline);

        let mut moved = Fixed(vec![pinched_at(Point::new(60, 60))]);
        p.tick(Ok(Some(striped())), &mut moved, "").unwrap();
        assert!(!p.session().drag_state(HandLabel::Right).is_dragging());
        assert_eq!(p.session().polygon().get(0), Some(Point::new(20, 20)));
    }

    #[test]
    fn test_reset_restores_quad() {
        let mut p = pipeline(Mode::Drag);
        p.tick(Ok(Some(striped())), &mut Fixed(vec![pinched_at(Point::new(20, 20))]), "").unwrap();
        p.tick(Ok(Some(striped())), &mut Fixed(vec![pinched_at(Point::new(40, 30))]), "").unwrap();
        assert_eq!(p.session().polygon().get(0), Some(Point::new(40, 30)));

        p.reset(Polygon::default());
        assert_eq!(p.session().polygon(), &Polygon::default());
        assert!(!p.session().drag_state(HandLabel::Right).is_dragging());
    }
}
