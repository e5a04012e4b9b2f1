//! Speed estimation from consecutive track positions.
//!
//! Pixel displacement between the two most recent observations of a track is
//! converted to meters using the apparent width of the object's box and the
//! assumed real-world width of its class.

use std::collections::{BTreeMap, HashMap, VecDeque};

use crate::calibration::ReferenceWidths;
use crate::tracker::{DistanceMetric, Point, Rect};

/// Observations kept per track.
const WINDOW: usize = 2;

const MPS_TO_KMH: f64 = 3.6;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Sample {
    centroid: Point,
    bbox: Rect,
    reference_width: f64,
}

#[derive(Debug, Clone)]
pub struct SpeedEstimator {
    windows: HashMap<u64, VecDeque<Sample>>,
    widths: ReferenceWidths,
    metric: DistanceMetric,
}

impl SpeedEstimator {
    pub fn new(widths: ReferenceWidths, metric: DistanceMetric) -> Self {
        Self {
            windows: HashMap::new(),
            widths,
            metric,
        }
    }

    /// Record the current box of track `id`, dropping its oldest sample once
    /// the window is full.
    pub fn observe(&mut self, id: u64, bbox: Rect, label: &str) {
        let sample = Sample {
            centroid: bbox.center(),
            bbox,
            reference_width: self.widths.width_for(label),
        };
        let window = self
            .windows
            .entry(id)
            .or_insert_with(|| VecDeque::with_capacity(WINDOW));
        if window.len() == WINDOW {
            window.pop_front();
        }
        window.push_back(sample);
    }

    /// Drop everything known about track `id`.
    pub fn forget(&mut self, id: u64) {
        self.windows.remove(&id);
    }

    pub fn sample_count(&self, id: u64) -> usize {
        self.windows.get(&id).map_or(0, VecDeque::len)
    }

    /// Speed of track `id` in km/h, if it has a full window.
    ///
    /// The newer sample's box width sets the pixels-per-meter scale; a box
    /// without positive width yields no estimate.
    pub fn estimate(&self, id: u64, fps: f64) -> Option<f64> {
        let window = self.windows.get(&id)?;
        let (old, new) = match (window.front(), window.back()) {
            (Some(old), Some(new)) if window.len() == WINDOW => (old, new),
            _ => return None,
        };
        if new.bbox.width <= 0 {
            return None;
        }

        let d_px = self.metric.distance(&old.centroid, &new.centroid);
        let pixels_per_meter = f64::from(new.bbox.width) / new.reference_width;
        let d_m = d_px / pixels_per_meter;
        Some(d_m * fps * MPS_TO_KMH)
    }

    /// Speed in km/h of every track with a full window. Tracks with fewer
    /// samples are left out rather than reported as zero.
    pub fn estimate_all(&self, fps: f64) -> BTreeMap<u64, f64> {
        self.windows
            .keys()
            .filter_map(|&id| self.estimate(id, fps).map(|speed| (id, speed)))
            .collect()
    }
}
