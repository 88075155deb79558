// Replayed detections driving a session, as the binary does with `--replay`.

use std::io::Write;

use pinch_blur::Error;
use pinch_blur::detector::{HandDetector, ReplayDetector};
use pinch_blur::hands::{HandLabel, INDEX_TIP, LANDMARK_COUNT, THUMB_TIP, samples_from_detections};
use pinch_blur::types::{FrameBuffer, Point};
use pinch_blur::{ControllerConfig, Polygon, Session};

/// One JSON line with a single raw hand; thumb and index given in normalized camera space.
fn frame_line(raw_label: &str, thumb: (f32, f32), index: (f32, f32)) -> String {
    let mut landmarks = Vec::with_capacity(LANDMARK_COUNT);
    for i in 0..LANDMARK_COUNT {
        let (x, y) = match i {
            THUMB_TIP => thumb,
            INDEX_TIP => index,
            _ => (0.5, 0.5),
        };
        landmarks.push(format!("{{\"x\":{x},\"y\":{y}}}"));
    }
    format!(
        "{{\"hands\":[{{\"label\":\"{raw_label}\",\"landmarks\":[{}]}}]}}",
        landmarks.join(",")
    )
}

#[test]
fn test_replay_file_drives_drag() {
    // 1000x1000 frame; vertex 0 of the default quad is at display (300,300),
    // i.e. camera x = 700.
    let pinched = frame_line("Left", (0.7005, 0.3005), (0.7005, 0.3005));
    let moved = frame_line("Left", (0.6005, 0.4005), (0.6005, 0.4005));
    let open = frame_line("Left", (0.6, 0.35), (0.6, 0.45));
    // display (900,600): over 500px from the nearest vertex
    let far = frame_line("Left", (0.1005, 0.6005), (0.1005, 0.6005));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hands.jsonl");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "{pinched}").unwrap();
    writeln!(file, "{moved}").unwrap();
    writeln!(file, "{open}").unwrap();
    writeln!(file, "{far}").unwrap();
    drop(file);

    let mut detector = ReplayDetector::open(&path).unwrap();
    assert_eq!(detector.len(), 4);

    let frame = FrameBuffer::new(1000, 1000);
    let mut session = Session::new(Polygon::default(), ControllerConfig::default());
    let run = |detector: &mut ReplayDetector, session: &mut Session| {
        let dets = detector.detect(&frame);
        let samples = samples_from_detections(&dets, frame.width, frame.height);
        session.step(&samples);
    };

    run(&mut detector, &mut session);
    assert_eq!(session.drag_state(HandLabel::Right).target(), Some(0));

    run(&mut detector, &mut session);
    assert_eq!(session.polygon().get(0), Some(Point::new(400, 400)));

    run(&mut detector, &mut session);
    assert!(!session.drag_state(HandLabel::Right).is_dragging());

    // Pinching again away from any handle does not move anything.
    run(&mut detector, &mut session);
    assert!(!session.drag_state(HandLabel::Right).is_dragging());
    assert_eq!(session.polygon().get(0), Some(Point::new(400, 400)));

    // Recording exhausted: no hands, nothing held.
    assert!(detector.is_finished());
    run(&mut detector, &mut session);
    assert!(!session.drag_state(HandLabel::Right).is_dragging());
}

#[test]
fn test_replay_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = ReplayDetector::open(dir.path().join("nope.jsonl")).err().unwrap();
    assert!(matches!(err, Error::ReplayIo { .. }), "got {err}");
}

#[test]
fn test_replay_bad_label() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.jsonl");
    std::fs::write(&path, "{\"hands\":[{\"label\":\"Middle\",\"landmarks\":[]}]}\n").unwrap();
    assert!(matches!(ReplayDetector::open(&path), Err(Error::ReplayParse { line: 1, .. })));
}
