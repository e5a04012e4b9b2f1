//! Centroid-based track registry with greedy association.

use std::collections::BTreeMap;

use tracing::debug;

use crate::tracker::distance::DistanceMetric;
use crate::tracker::matching::{self, AssignmentResult};
use crate::tracker::rect::{Point, Rect};
use crate::tracker::track::{Track, TrackIdAllocator};

/// Owns the live tracks of a detection-only tracker and associates each
/// frame's boxes with them by centroid distance.
///
/// Tracks are kept in a `BTreeMap`, so "existing tracks" always means
/// ascending id order. That order is the row order of the distance matrix and
/// therefore the tie-break: on equal distances the oldest track wins.
#[derive(Debug, Clone)]
pub struct TrackRegistry {
    tracks: BTreeMap<u64, Track>,
    ids: TrackIdAllocator,
    max_disappeared: u32,
    metric: DistanceMetric,
    evicted: Vec<u64>,
}

impl TrackRegistry {
    pub fn new(max_disappeared: u32, metric: DistanceMetric) -> Self {
        Self {
            tracks: BTreeMap::new(),
            ids: TrackIdAllocator::new(),
            max_disappeared,
            metric,
            evicted: Vec::new(),
        }
    }

    /// Start tracking a new object and return its id.
    pub fn register(&mut self, bbox: Rect) -> u64 {
        let id = self.ids.allocate();
        debug!(id, centroid = ?bbox.center(), "registered track");
        self.tracks.insert(id, Track::new(id, bbox, None, ()));
        id
    }

    /// Stop tracking `id`. Returns the removed track, if it was live.
    pub fn deregister(&mut self, id: u64) -> Option<Track> {
        let mut track = self.tracks.remove(&id)?;
        track.mark_removed();
        debug!(id, "deregistered track");
        self.evicted.push(id);
        Some(track)
    }

    pub fn get(&self, id: u64) -> Option<&Track> {
        self.tracks.get(&id)
    }

    /// Live tracks in ascending id order.
    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.values()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// The id the next registered track will receive.
    pub fn next_id(&self) -> u64 {
        self.ids.peek()
    }

    /// Ids evicted during the most recent `update`.
    pub fn evicted(&self) -> &[u64] {
        &self.evicted
    }

    /// Associate this frame's boxes with the live tracks and return the
    /// centroid of every track still alive afterwards.
    pub fn update(&mut self, rects: &[Rect]) -> BTreeMap<u64, Point> {
        self.evicted.clear();

        if rects.is_empty() {
            let ids: Vec<u64> = self.tracks.keys().copied().collect();
            for id in ids {
                self.miss(id);
            }
            return self.centroids();
        }

        if self.tracks.is_empty() {
            for rect in rects {
                self.register(*rect);
            }
            return self.centroids();
        }

        let track_ids: Vec<u64> = self.tracks.keys().copied().collect();
        let track_centroids: Vec<Point> = self.tracks.values().map(Track::centroid).collect();
        let input_centroids: Vec<Point> = rects.iter().map(Rect::center).collect();

        let dists = self
            .metric
            .distance_matrix(&track_centroids, &input_centroids);

        let AssignmentResult {
            matches,
            unmatched_rows,
            unmatched_cols,
        } = matching::greedy_assignment(&dists);

        for (row, col) in matches {
            if let Some(track) = self.tracks.get_mut(&track_ids[row]) {
                track.bbox = rects[col];
                track.mark_matched();
            }
        }

        if track_ids.len() > rects.len() {
            for row in unmatched_rows {
                self.miss(track_ids[row]);
            }
        } else {
            for col in unmatched_cols {
                self.register(rects[col]);
            }
        }

        self.centroids()
    }

    fn miss(&mut self, id: u64) {
        let expired = match self.tracks.get_mut(&id) {
            Some(track) => track.mark_missed(self.max_disappeared),
            None => return,
        };
        if expired {
            self.deregister(id);
        }
    }

    fn centroids(&self) -> BTreeMap<u64, Point> {
        self.tracks
            .iter()
            .map(|(&id, track)| (id, track.centroid()))
            .collect()
    }
}
