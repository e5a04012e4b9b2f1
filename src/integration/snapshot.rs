//! Read-only per-frame view of the tracker, for renderers and exporters.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::calibration::UNKNOWN_LABEL;
use crate::tracker::{Rect, Track};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotEntry {
    pub bbox: Rect,
    pub label: String,
    /// Absent until the track has two observations.
    pub speed_km_h: Option<f64>,
}

impl SnapshotEntry {
    /// Whole km/h, the way overlays print it.
    pub fn speed_text(&self) -> Option<String> {
        self.speed_km_h
            .map(|speed| format!("{} km/h", speed.trunc() as i64))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    pub frame_index: u64,
    /// Frame rate the speeds were computed with.
    pub fps: f64,
    pub tracks: BTreeMap<u64, SnapshotEntry>,
}

impl Snapshot {
    pub fn from_tracks<'a, P: 'a>(
        frame_index: u64,
        fps: f64,
        tracks: impl IntoIterator<Item = &'a Track<P>>,
        speeds: &BTreeMap<u64, f64>,
    ) -> Self {
        let tracks = tracks
            .into_iter()
            .map(|track| {
                let entry = SnapshotEntry {
                    bbox: track.bbox,
                    label: track
                        .label
                        .clone()
                        .unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
                    speed_km_h: speeds.get(&track.id).copied(),
                };
                (track.id, entry)
            })
            .collect();

        Self {
            frame_index,
            fps,
            tracks,
        }
    }

    pub fn get(&self, id: u64) -> Option<&SnapshotEntry> {
        self.tracks.get(&id)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
