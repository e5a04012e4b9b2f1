use std::cell::Cell;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;
use std::sync::atomic::AtomicBool;

use approx::assert_relative_eq;
use speedtrack_rs::integration::MemorySink;
use speedtrack_rs::{
    ActionKind, ActionSink, Detection, DetectionSource, DistanceMetric, Error, FrameSource,
    PipelineConfig, Point, Rect, ReferenceWidths, SpeedEstimator, TrackRegistry, TrackerKind,
    TrackerPipeline, VisualTracker,
};

fn square_at(cx: i32, cy: i32) -> Rect {
    Rect::new(cx - 10, cy - 10, 20, 20)
}

#[test]
fn test_walking_person_speed() {
    let mut speed = SpeedEstimator::new(ReferenceWidths::default(), DistanceMetric::Euclidean);
    speed.observe(0, Rect::new(-50, -50, 100, 100), "person");
    speed.observe(0, Rect::new(0, -50, 100, 100), "person");

    let speeds = speed.estimate_all(10.0);
    assert_relative_eq!(speeds[&0], 9.0, epsilon = 1e-9);
}

#[test]
fn test_first_detections_get_ids_in_order() {
    let mut registry = TrackRegistry::new(50, DistanceMetric::Euclidean);
    let out = registry.update(&[square_at(100, 100), square_at(10, 10)]);

    assert_eq!(out.keys().copied().collect::<Vec<_>>(), vec![0, 1]);
    assert_eq!(out[&0], Point::new(100, 100));
    assert_eq!(out[&1], Point::new(10, 10));
}

#[test]
fn test_track_evicted_on_first_frame_past_threshold() {
    let max_disappeared = 4;
    let mut registry = TrackRegistry::new(max_disappeared, DistanceMetric::Euclidean);
    registry.update(&[square_at(50, 50)]);

    for frame in 1..=max_disappeared {
        let out = registry.update(&[]);
        assert!(out.contains_key(&0), "evicted early on frame {frame}");
        assert_eq!(registry.get(0).unwrap().disappearance_count, frame);
    }
    assert!(registry.update(&[]).is_empty());
}

#[test]
fn test_tie_goes_to_older_track() {
    let mut registry = TrackRegistry::new(50, DistanceMetric::Euclidean);
    registry.update(&[square_at(0, 0), square_at(100, 0)]);

    let out = registry.update(&[square_at(50, 0)]);
    assert_eq!(out[&0], Point::new(50, 0));
    assert_eq!(out[&1], Point::new(100, 0));
    assert_eq!(registry.get(0).unwrap().disappearance_count, 0);
    assert_eq!(registry.get(1).unwrap().disappearance_count, 1);
}

#[test]
fn test_ids_strictly_increase_across_evictions() {
    let mut registry = TrackRegistry::new(1, DistanceMetric::Euclidean);
    let mut seen = Vec::new();

    for round in 0..5 {
        let out = registry.update(&[square_at(round * 500, 0)]);
        seen.extend(out.keys().copied());
        registry.update(&[]);
        registry.update(&[]);
        assert!(registry.is_empty());
    }

    assert_eq!(seen, vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_greedy_matching_is_deterministic() {
    let frames = [
        vec![square_at(0, 0), square_at(40, 0), square_at(80, 0)],
        vec![square_at(20, 0), square_at(60, 0)],
        vec![square_at(21, 0), square_at(59, 0), square_at(200, 200)],
    ];

    let run = || {
        let mut registry = TrackRegistry::new(10, DistanceMetric::Euclidean);
        frames
            .iter()
            .map(|rects| registry.update(rects))
            .collect::<Vec<_>>()
    };

    assert_eq!(run(), run());
}

// Pipeline end to end. Frames carry the boxes the "world" shows on them, so
// the mock detector and the mock primitive read positions straight off the
// frame.

#[derive(Clone)]
struct Frame {
    objects: Vec<(i32, Rect)>,
}

struct Scene {
    frames: VecDeque<Frame>,
}

impl FrameSource for Scene {
    type Frame = Frame;

    fn read_frame(&mut self) -> speedtrack_rs::Result<Frame> {
        self.frames.pop_front().ok_or(Error::FrameUnavailable)
    }
}

struct Oracle;

impl DetectionSource<Frame> for Oracle {
    type Error = Infallible;

    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>, Infallible> {
        Ok(frame
            .objects
            .iter()
            .map(|&(class_id, bbox)| Detection::new(class_id, 0.9, bbox))
            .collect())
    }
}

/// Follows the object whose box center lies in its current box; loses it
/// (quality 0) when none does.
struct Follower {
    bbox: Rect,
}

impl VisualTracker<Frame> for Follower {
    type Error = Infallible;

    fn init(&mut self, _frame: &Frame, bbox: Rect) -> Result<(), Infallible> {
        self.bbox = bbox;
        Ok(())
    }

    fn update(&mut self, frame: &Frame) -> Result<(Rect, f64), Infallible> {
        match frame
            .objects
            .iter()
            .find(|(_, bbox)| self.bbox.mutually_contains(bbox))
        {
            Some(&(_, bbox)) => {
                self.bbox = bbox;
                Ok((bbox, 10.0))
            }
            None => Ok((self.bbox, 0.0)),
        }
    }
}

fn follower(_kind: TrackerKind) -> Follower {
    Follower {
        bbox: Rect::default(),
    }
}

fn car_moving(frames: usize, step: i32) -> VecDeque<Frame> {
    (0..frames as i32)
        .map(|i| Frame {
            objects: vec![(7, Rect::new(i * step, 100, 160, 80))],
        })
        .collect()
}

struct Counting(Rc<Cell<usize>>, MemorySink);

impl ActionSink for Counting {
    fn insert(&mut self, action: &speedtrack_rs::Action) -> speedtrack_rs::Result<()> {
        if action.kind == ActionKind::Removed {
            self.0.set(self.0.get() + 1);
        }
        self.1.insert(action)
    }
}

#[test]
fn test_run_until_frames_exhausted() {
    let mut config = PipelineConfig::default();
    config.frame_rate = Some(25.0);
    config.tracker.detection_interval = 5;

    let mut pipeline = TrackerPipeline::new(
        config,
        Oracle,
        follower as fn(TrackerKind) -> Follower,
    )
    .unwrap();
    let mut scene = Scene {
        frames: car_moving(12, 8),
    };

    let mut last_speed = None;
    let mut ids = Vec::new();
    let processed = pipeline
        .run(&mut scene, &AtomicBool::new(false), |_, snapshot| {
            ids.extend(snapshot.tracks.keys().copied());
            if let Some(entry) = snapshot.get(0) {
                last_speed = entry.speed_km_h;
                assert_eq!(entry.label, "car");
            }
        })
        .unwrap();

    assert_eq!(processed, 12);
    ids.dedup();
    assert_eq!(ids, vec![0]);
    // 8 px per frame, 160 px wide car of 1.6 m: 0.08 m * 25 fps * 3.6.
    assert_relative_eq!(last_speed.unwrap(), 7.2, epsilon = 1e-9);
}

#[test]
fn test_lost_object_is_removed_and_recorded() {
    let mut frames = car_moving(3, 4);
    // The car teleports away: the primitive loses it and the next
    // detection round starts a fresh track.
    frames.extend((0..3).map(|_| Frame {
        objects: vec![(7, Rect::new(900, 600, 160, 80))],
    }));

    let mut config = PipelineConfig::default();
    config.frame_rate = Some(30.0);
    config.tracker.detection_interval = 4;

    let removed = Rc::new(Cell::new(0));
    let mut pipeline = TrackerPipeline::new(
        config,
        Oracle,
        follower as fn(TrackerKind) -> Follower,
    )
    .unwrap()
    .with_sink(Counting(removed.clone(), MemorySink::new()));

    let mut scene = Scene { frames };
    let mut last = None;
    pipeline
        .run(&mut scene, &AtomicBool::new(false), |_, snapshot| {
            last = Some(snapshot.clone());
        })
        .unwrap();

    assert_eq!(removed.get(), 1);
    let last = last.unwrap();
    assert!(last.get(0).is_none());
    assert_eq!(last.get(1).unwrap().bbox, Rect::new(900, 600, 160, 80));
}

#[test]
fn test_stop_flag_ends_loop() {
    let mut pipeline = TrackerPipeline::new(
        PipelineConfig::default(),
        Oracle,
        follower as fn(TrackerKind) -> Follower,
    )
    .unwrap();
    let mut scene = Scene {
        frames: car_moving(5, 1),
    };

    let processed = pipeline
        .run(&mut scene, &AtomicBool::new(true), |_, _| {})
        .unwrap();
    assert_eq!(processed, 0);
    assert_eq!(scene.frames.len(), 5);
}

#[test]
fn test_unavailable_source_aborts() {
    struct Offline;
    impl FrameSource for Offline {
        type Frame = Frame;
        fn read_frame(&mut self) -> speedtrack_rs::Result<Frame> {
            Err(Error::SourceUnavailable("camera offline".to_string()))
        }
    }

    let mut pipeline = TrackerPipeline::new(
        PipelineConfig::default(),
        Oracle,
        follower as fn(TrackerKind) -> Follower,
    )
    .unwrap();
    let result = pipeline.run(&mut Offline, &AtomicBool::new(false), |_, _| {});
    assert!(matches!(result, Err(Error::SourceUnavailable(_))));
}

#[test]
fn test_unknown_tracker_kind_is_fatal() {
    let mut config = PipelineConfig::default();
    config.tracker.tracker_kind = "median_flow".to_string();

    let result = TrackerPipeline::new(config, Oracle, follower as fn(TrackerKind) -> Follower);
    assert!(matches!(result, Err(Error::UnknownTrackerKind(_))));
}
