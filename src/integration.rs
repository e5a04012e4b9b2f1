//! Integration module for connecting detectors, frame sources, renderers and
//! persistence with the trackers.
//!
//! This module provides the traits for the external collaborators and the
//! frame loop that drives them.

mod builder;
mod detector;
mod events;
mod pipeline;
mod snapshot;

pub use builder::DetectionBuilder;
pub use detector::{DetectionFilter, DetectionSource};
pub use events::{Action, ActionKind, ActionSink, JsonLinesSink, MemorySink};
pub use pipeline::{FrameSource, TrackerPipeline};
pub use snapshot::{Snapshot, SnapshotEntry};
