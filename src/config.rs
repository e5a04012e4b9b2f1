//! Pipeline configuration.
//!
//! Everything the core consumes is gathered here and validated once, before
//! any frame is processed. Configurations can be built in code or read from
//! JSON.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::calibration::{ReferenceWidths, default_reference_widths};
use crate::error::{Error, Result};
use crate::integration::DetectionFilter;
use crate::tracker::DistanceMetric;

/// Configuration for the track registry and the multi-object tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Consecutive unmatched frames a track survives before eviction.
    pub max_disappeared: u32,
    /// Primitive quality below which a track is evicted.
    pub min_quality: f64,
    /// Run the detector on every n-th frame.
    pub detection_interval: u32,
    /// Visual tracking primitive to create per track. Parsed when the
    /// tracker is built; see [`crate::tracker::TrackerKind`].
    pub tracker_kind: String,
    /// Distance used for association and speed.
    pub distance: DistanceMetric,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_disappeared: 50,
            min_quality: 7.0,
            detection_interval: 10,
            tracker_kind: "correlation".to_string(),
            distance: DistanceMetric::Euclidean,
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.min_quality.is_finite() {
            return Err(Error::Configuration(format!(
                "min_quality must be finite, got {}",
                self.min_quality
            )));
        }
        if self.detection_interval == 0 {
            return Err(Error::Configuration(
                "detection_interval must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Complete configuration of a tracking pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub tracker: TrackerConfig,
    pub detection: DetectionFilter,
    /// Assumed real-world width in meters per class label.
    pub reference_widths: BTreeMap<String, f64>,
    /// Frame rate used for speed conversion. `None` measures it from the
    /// processing time of each frame.
    pub frame_rate: Option<f64>,
    /// Identifier of the video source, attached to lifecycle actions.
    pub source: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tracker: TrackerConfig::default(),
            detection: DetectionFilter::default(),
            reference_widths: default_reference_widths(),
            frame_rate: None,
            source: String::new(),
        }
    }
}

impl PipelineConfig {
    /// Parse and validate a JSON configuration. Missing fields take their
    /// default values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.tracker.validate()?;
        self.detection.validate()?;
        if let Some(fps) = self.frame_rate {
            if !(fps.is_finite() && fps > 0.0) {
                return Err(Error::Configuration(format!(
                    "frame_rate must be positive, got {fps}"
                )));
            }
        }
        for (label, width) in &self.reference_widths {
            if !(width.is_finite() && *width > 0.0) {
                return Err(Error::Configuration(format!(
                    "reference width for {label:?} must be positive, got {width}"
                )));
            }
        }
        Ok(())
    }

    pub fn reference_widths(&self) -> ReferenceWidths {
        ReferenceWidths::new(self.reference_widths.clone())
    }

    /// Builder-style override of the class allow-list.
    pub fn with_classes(mut self, classes: impl IntoIterator<Item = i32>) -> Self {
        self.detection.class_allow_list = classes.into_iter().collect::<BTreeSet<_>>();
        self
    }
}
