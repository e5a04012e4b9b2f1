//! # speedtrack-rs
//!
//! Stable object identities and per-object speed estimates from per-frame
//! detections.
//!
//! Two association strategies are provided:
//!
//! - [`TrackRegistry`]: detection-only tracking. Every frame's boxes are
//!   matched to live tracks by greedy centroid distance.
//! - [`MultiTracker`]: each object is followed by its own visual tracking
//!   primitive; periodic detections only discover new objects.
//!
//! [`SpeedEstimator`] converts the displacement between a track's two most
//! recent positions into km/h using the apparent width of the object and a
//! per-class reference width. [`TrackerPipeline`] ties a detector, the
//! multi-object tracker and the estimator into a frame loop.
//!
//! ## Example
//!
//! ```rust,ignore
//! use speedtrack_rs::{PipelineConfig, TrackerPipeline};
//!
//! let config = PipelineConfig::from_json_str(r#"{ "frame_rate": 25.0 }"#)?;
//! let mut pipeline = TrackerPipeline::new(config, my_detector, |kind| MyTracker::new(kind))?;
//!
//! let snapshot = pipeline.process_frame(&frame);
//! for (id, entry) in &snapshot.tracks {
//!     println!("{id} {} {:?}", entry.label, entry.speed_text());
//! }
//! ```

pub mod calibration;
pub mod config;
pub mod error;
pub mod integration;
pub mod speed;
pub mod tracker;

pub use calibration::{ClassCatalog, ReferenceWidths};
pub use config::{PipelineConfig, TrackerConfig};
pub use error::{Error, Result};
pub use integration::{
    Action, ActionKind, ActionSink, DetectionBuilder, DetectionFilter, DetectionSource,
    FrameSource, Snapshot, SnapshotEntry, TrackerPipeline,
};
pub use speed::SpeedEstimator;
pub use tracker::{
    Detection, DistanceMetric, MultiTracker, Point, PrimitiveFactory, Rect, Track,
    TrackRegistry, TrackState, TrackerKind, VisualTracker,
};
