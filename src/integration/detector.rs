//! Trait for object detection inference backends and the filter applied to
//! their output.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::tracker::Detection;

/// Trait for object detection inference backends.
///
/// Implement this trait to connect any detection model to the tracker.
///
/// # Example
///
/// ```ignore
/// use speedtrack_rs::{DetectionSource, Detection};
///
/// struct MyDetector {
///     // Your model here
/// }
///
/// impl DetectionSource<MyFrame> for MyDetector {
///     type Error = std::io::Error;
///
///     fn detect(&mut self, frame: &MyFrame) -> Result<Vec<Detection>, Self::Error> {
///         // Run inference and return detections
///         Ok(vec![])
///     }
/// }
/// ```
pub trait DetectionSource<Fr> {
    /// Error type for detection failures.
    type Error: fmt::Display;

    /// Run inference on a frame and return every detection, unfiltered.
    fn detect(&mut self, frame: &Fr) -> std::result::Result<Vec<Detection>, Self::Error>;
}

/// Confidence and class filter applied to raw detector output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionFilter {
    /// Detections must score strictly above this, in (0, 1).
    pub confidence_threshold: f64,
    /// Class ids to keep. Empty keeps every class.
    pub class_allow_list: BTreeSet<i32>,
}

impl Default for DetectionFilter {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.5,
            // bicycle, bus, car, motorbike, person, train
            class_allow_list: [2, 6, 7, 14, 15, 19].into_iter().collect(),
        }
    }
}

impl DetectionFilter {
    pub fn new(confidence_threshold: f64, classes: impl IntoIterator<Item = i32>) -> Result<Self> {
        let filter = Self {
            confidence_threshold,
            class_allow_list: classes.into_iter().collect(),
        };
        filter.validate()?;
        Ok(filter)
    }

    pub fn validate(&self) -> Result<()> {
        let t = self.confidence_threshold;
        if !(t > 0.0 && t < 1.0) {
            return Err(Error::Configuration(format!(
                "confidence_threshold must be in (0, 1), got {t}"
            )));
        }
        Ok(())
    }

    pub fn accepts(&self, detection: &Detection) -> bool {
        detection.confidence > self.confidence_threshold
            && (self.class_allow_list.is_empty()
                || self.class_allow_list.contains(&detection.class_id))
    }

    pub fn apply(&self, detections: Vec<Detection>) -> Vec<Detection> {
        detections.into_iter().filter(|d| self.accepts(d)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::Rect;

    fn det(class_id: i32, confidence: f64) -> Detection {
        Detection::new(class_id, confidence, Rect::new(0, 0, 10, 10))
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let filter = DetectionFilter::new(0.5, [15]).unwrap();
        assert!(!filter.accepts(&det(15, 0.5)));
        assert!(filter.accepts(&det(15, 0.51)));
    }

    #[test]
    fn test_allow_list() {
        let filter = DetectionFilter::new(0.2, [7, 15]).unwrap();
        let kept = filter.apply(vec![det(7, 0.9), det(8, 0.9), det(15, 0.3), det(15, 0.1)]);
        assert_eq!(kept, vec![det(7, 0.9), det(15, 0.3)]);
    }

    #[test]
    fn test_empty_allow_list_keeps_all_classes() {
        let filter = DetectionFilter::new(0.2, []).unwrap();
        assert!(filter.accepts(&det(42, 0.9)));
    }

    #[test]
    fn test_invalid_threshold() {
        assert!(DetectionFilter::new(0.0, [15]).is_err());
        assert!(DetectionFilter::new(1.0, [15]).is_err());
        assert!(DetectionFilter::new(f64::NAN, [15]).is_err());
    }
}
