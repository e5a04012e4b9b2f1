//! Multi-object tracker backed by one visual tracking primitive per track.

use std::collections::BTreeMap;
use std::marker::PhantomData;

use tracing::{debug, warn};

use crate::calibration::ClassCatalog;
use crate::config::TrackerConfig;
use crate::error::Result;
use crate::tracker::matching::Detection;
use crate::tracker::primitive::{PrimitiveFactory, TrackerKind, VisualTracker};
use crate::tracker::rect::Rect;
use crate::tracker::track::{Track, TrackIdAllocator};

/// Outcome of one [`MultiTracker::tick`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Tracks whose primitive produced a usable box, in ascending id order.
    pub updated: Vec<(u64, Rect)>,
    /// Tracks whose primitive failed this frame but are still live.
    pub missed: Vec<u64>,
    /// Tracks evicted at the end of the tick.
    pub evicted: Vec<u64>,
}

/// Follows every object with its own visual tracking primitive and uses
/// periodic detections only to discover new objects.
///
/// Position authority belongs to the primitives: `tick` moves tracks every
/// frame, while `reconcile` never moves an existing track. Tracks are stored
/// by ascending id and every pass visits them in that order.
///
/// The per-track primitive update dominates the cost of a frame and runs
/// sequentially. Spreading it over workers would mean sharding tracks by
/// count and exchanging updates over channels, with this struct remaining
/// the only writer of the track map.
pub struct MultiTracker<Fr, F: PrimitiveFactory<Fr>> {
    tracks: BTreeMap<u64, Track<F::Tracker>>,
    ids: TrackIdAllocator,
    factory: F,
    kind: TrackerKind,
    catalog: ClassCatalog,
    min_quality: f64,
    max_disappeared: u32,
    _frame: PhantomData<fn(&Fr)>,
}

impl<Fr, F: PrimitiveFactory<Fr>> MultiTracker<Fr, F> {
    /// Build a tracker, rejecting an unknown `tracker_kind` up front.
    pub fn new(config: &TrackerConfig, catalog: ClassCatalog, factory: F) -> Result<Self> {
        config.validate()?;
        let kind = config.tracker_kind.parse::<TrackerKind>()?;
        Ok(Self {
            tracks: BTreeMap::new(),
            ids: TrackIdAllocator::new(),
            factory,
            kind,
            catalog,
            min_quality: config.min_quality,
            max_disappeared: config.max_disappeared,
            _frame: PhantomData,
        })
    }

    pub fn kind(&self) -> TrackerKind {
        self.kind
    }

    pub fn get(&self, id: u64) -> Option<&Track<F::Tracker>> {
        self.tracks.get(&id)
    }

    /// Live tracks in ascending id order.
    pub fn tracks(&self) -> impl Iterator<Item = &Track<F::Tracker>> {
        self.tracks.values()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Advance every live track onto `frame`.
    ///
    /// A track whose primitive reports a quality below `min_quality`, or no
    /// usable quality at all, is evicted. A track whose primitive fails keeps its last box and counts
    /// the frame as unmatched. Evictions happen after every track has been
    /// visited.
    pub fn tick(&mut self, frame: &Fr) -> TickReport {
        let mut report = TickReport::default();

        for (&id, track) in self.tracks.iter_mut() {
            match track.primitive.update(frame) {
                Ok((bbox, quality)) => {
                    track.quality = quality;
                    if quality.is_nan() || quality < self.min_quality {
                        debug!(id, quality, "tracking quality too low");
                        report.evicted.push(id);
                    } else {
                        track.bbox = bbox;
                        track.mark_matched();
                        report.updated.push((id, bbox));
                    }
                }
                Err(err) => {
                    warn!(id, error = %err, "primitive update failed, skipping track");
                    if track.mark_missed(self.max_disappeared) {
                        report.evicted.push(id);
                    } else {
                        report.missed.push(id);
                    }
                }
            }
        }

        for id in &report.evicted {
            if let Some(mut track) = self.tracks.remove(id) {
                track.mark_removed();
                debug!(id, "removed track");
            }
        }

        report
    }

    /// Fold fresh detections into the tracker and return the ids of the
    /// tracks created for them.
    ///
    /// A detection belongs to a track when each box contains the other's
    /// center. When several tracks qualify the highest id, the last one
    /// visited, wins. Matching only refreshes the track's disappearance
    /// count; unmatched detections start a new primitive.
    pub fn reconcile(&mut self, frame: &Fr, detections: &[Detection]) -> Vec<u64> {
        let mut created = Vec::new();

        for det in detections {
            let matched = self
                .tracks
                .iter()
                .filter(|(_, track)| track.bbox.mutually_contains(&det.bbox))
                .map(|(&id, _)| id)
                .last();

            if let Some(id) = matched {
                if let Some(track) = self.tracks.get_mut(&id) {
                    track.mark_matched();
                }
                continue;
            }

            let mut primitive = self.factory.create(self.kind);
            if let Err(err) = primitive.init(frame, det.bbox) {
                warn!(bbox = ?det.bbox, error = %err, "failed to start tracker");
                continue;
            }

            let id = self.ids.allocate();
            let label = self.catalog.label(det.class_id).to_string();
            debug!(id, label = %label, bbox = ?det.bbox, "created tracker");
            self.tracks
                .insert(id, Track::new(id, det.bbox, Some(label), primitive));
            created.push(id);
        }

        created
    }
}
