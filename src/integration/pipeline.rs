//! TrackerPipeline for combining detection, tracking and speed estimation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use tracing::{info, warn};

use crate::calibration::{ClassCatalog, UNKNOWN_LABEL};
use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::speed::SpeedEstimator;
use crate::tracker::{MultiTracker, PrimitiveFactory};

use super::events::{Action, ActionKind, ActionSink};
use super::snapshot::Snapshot;
use super::{DetectionFilter, DetectionSource};

/// Pull-based source of frames.
pub trait FrameSource {
    type Frame;

    /// Read the next frame.
    ///
    /// Return [`Error::FrameUnavailable`] when the stream is exhausted or a
    /// read fails; the pipeline treats it as the end of the run. Any other
    /// error aborts the run.
    fn read_frame(&mut self) -> Result<Self::Frame>;
}

/// Bundles a detector, the tracker-backed multi-object tracker and the speed
/// estimator into a frame-at-a-time loop.
///
/// Each frame: every track is advanced by its primitive, then on every
/// `detection_interval`-th frame (starting with the first) the detector runs
/// and its filtered output is reconciled, then tracked positions feed the
/// speed estimator and a [`Snapshot`] is produced.
pub struct TrackerPipeline<Fr, D: DetectionSource<Fr>, F: PrimitiveFactory<Fr>> {
    detector: D,
    tracker: MultiTracker<Fr, F>,
    speed: SpeedEstimator,
    filter: DetectionFilter,
    detection_interval: u32,
    frame_rate: Option<f64>,
    source: String,
    sink: Option<Box<dyn ActionSink>>,
    frame_index: u64,
}

impl<Fr, D: DetectionSource<Fr>, F: PrimitiveFactory<Fr>> TrackerPipeline<Fr, D, F> {
    /// Create a pipeline, validating the configuration first.
    pub fn new(config: PipelineConfig, detector: D, factory: F) -> Result<Self> {
        config.validate()?;
        let tracker = MultiTracker::new(&config.tracker, ClassCatalog::voc(), factory)?;
        let speed = SpeedEstimator::new(config.reference_widths(), config.tracker.distance);

        Ok(Self {
            detector,
            tracker,
            speed,
            filter: config.detection,
            detection_interval: config.tracker.detection_interval,
            frame_rate: config.frame_rate,
            source: config.source,
            sink: None,
            frame_index: 0,
        })
    }

    /// Record track creation and removal in `sink`.
    pub fn with_sink(mut self, sink: impl ActionSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Process a single frame and return the resulting snapshot.
    pub fn process_frame(&mut self, frame: &Fr) -> Snapshot {
        let started = Instant::now();
        let index = self.frame_index;

        let report = self.tracker.tick(frame);
        for &id in &report.evicted {
            self.speed.forget(id);
            self.record(id, ActionKind::Removed);
        }
        // Consecutive samples must be one frame apart.
        for &id in &report.missed {
            self.speed.forget(id);
        }

        for id in self.maybe_reconcile(frame) {
            self.record(id, ActionKind::Created);
        }

        for (id, bbox) in report.updated {
            let label = self
                .tracker
                .get(id)
                .and_then(|track| track.label.as_deref())
                .unwrap_or(UNKNOWN_LABEL);
            self.speed.observe(id, bbox, label);
        }

        let fps = self.frame_rate.unwrap_or_else(|| {
            let secs = started.elapsed().as_secs_f64();
            1.0 / secs.max(1e-6)
        });
        let speeds = self.speed.estimate_all(fps);

        self.frame_index += 1;
        Snapshot::from_tracks(index, fps, self.tracker.tracks(), &speeds)
    }

    /// Run the detector and reconcile its output if this frame is due.
    /// Returns the ids of the tracks created.
    ///
    /// A failing detector skips reconciliation for this frame only.
    pub fn maybe_reconcile(&mut self, frame: &Fr) -> Vec<u64> {
        if self.frame_index % u64::from(self.detection_interval) != 0 {
            return Vec::new();
        }

        match self.detector.detect(frame) {
            Ok(detections) => {
                let detections = self.filter.apply(detections);
                self.tracker.reconcile(frame, &detections)
            }
            Err(err) => {
                warn!(frame = self.frame_index, error = %err, "detection failed");
                Vec::new()
            }
        }
    }

    /// Process frames until the source runs dry or `stop` is raised, handing
    /// every frame and its snapshot to `on_frame`. Returns the number of
    /// frames processed.
    pub fn run<S>(
        &mut self,
        frames: &mut S,
        stop: &AtomicBool,
        mut on_frame: impl FnMut(&Fr, &Snapshot),
    ) -> Result<u64>
    where
        S: FrameSource<Frame = Fr>,
    {
        info!(source = %self.source, kind = %self.tracker.kind(), "starting tracking loop");
        let mut processed = 0;

        loop {
            if stop.load(Ordering::Relaxed) {
                info!(processed, "stop requested");
                break;
            }
            let frame = match frames.read_frame() {
                Ok(frame) => frame,
                Err(Error::FrameUnavailable) => {
                    info!(processed, "no more frames");
                    break;
                }
                Err(err) => return Err(err),
            };

            let snapshot = self.process_frame(&frame);
            on_frame(&frame, &snapshot);
            processed += 1;
        }

        Ok(processed)
    }

    fn record(&mut self, id: u64, kind: ActionKind) {
        let Some(sink) = self.sink.as_mut() else {
            return;
        };
        let action = Action {
            id,
            source: self.source.clone(),
            kind,
        };
        if let Err(err) = sink.insert(&action) {
            warn!(id, error = %err, "failed to record action");
        }
    }

    /// Index of the next frame to be processed.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Get a reference to the underlying detector.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Get a mutable reference to the underlying detector.
    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    /// Get a reference to the underlying tracker.
    pub fn tracker(&self) -> &MultiTracker<Fr, F> {
        &self.tracker
    }

    pub fn speed_estimator(&self) -> &SpeedEstimator {
        &self.speed
    }
}
