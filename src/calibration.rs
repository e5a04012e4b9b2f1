//! Class labels and real-world reference widths.
//!
//! Both tables are plain immutable values: build them once and hand them to
//! the components that need them.

use std::collections::BTreeMap;

use tracing::debug;

/// Label reported for class ids missing from the catalog.
pub const UNKNOWN_LABEL: &str = "unknown";

/// Width assumed for labels without a calibrated width. A millimeter wide
/// object maps to a very large pixels-per-meter scale, so an uncalibrated
/// object reports a speed close to zero instead of a spike.
pub const DEFAULT_REFERENCE_WIDTH_M: f64 = 0.001;

/// The 21 classes of the Pascal VOC trained MobileNet-SSD detector, indexed
/// by class id.
pub const VOC_CLASSES: [&str; 21] = [
    "background",
    "aeroplane",
    "bicycle",
    "bird",
    "boat",
    "bottle",
    "bus",
    "car",
    "cat",
    "chair",
    "cow",
    "diningtable",
    "dog",
    "horse",
    "motorbike",
    "person",
    "pottedplant",
    "sheep",
    "sofa",
    "train",
    "tvmonitor",
];

/// Class id to label mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassCatalog {
    labels: BTreeMap<i32, String>,
}

impl Default for ClassCatalog {
    fn default() -> Self {
        Self::voc()
    }
}

impl ClassCatalog {
    pub fn new(labels: BTreeMap<i32, String>) -> Self {
        Self { labels }
    }

    pub fn voc() -> Self {
        let labels = VOC_CLASSES
            .iter()
            .enumerate()
            .map(|(id, name)| (id as i32, name.to_string()))
            .collect();
        Self { labels }
    }

    /// Label for `class_id`, or [`UNKNOWN_LABEL`].
    pub fn label(&self, class_id: i32) -> &str {
        match self.labels.get(&class_id) {
            Some(label) => label.as_str(),
            None => {
                debug!(class_id, "class id missing from catalog");
                UNKNOWN_LABEL
            }
        }
    }

    /// Reverse lookup, used to build allow-lists from names. The lowest id
    /// wins when several share a label.
    pub fn class_id(&self, label: &str) -> Option<i32> {
        self.labels
            .iter()
            .find(|(_, name)| name.as_str() == label)
            .map(|(&id, _)| id)
    }
}

pub fn default_reference_widths() -> BTreeMap<String, f64> {
    [
        ("person", 0.5),
        ("bicycle", 0.6),
        ("motorbike", 0.8),
        ("car", 1.6),
        ("bus", 2.5),
        ("train", 3.0),
    ]
    .into_iter()
    .map(|(label, width)| (label.to_string(), width))
    .collect()
}

/// Label to assumed real-world width (meters).
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceWidths {
    widths: BTreeMap<String, f64>,
}

impl Default for ReferenceWidths {
    fn default() -> Self {
        Self::new(default_reference_widths())
    }
}

impl ReferenceWidths {
    pub fn new(widths: BTreeMap<String, f64>) -> Self {
        Self { widths }
    }

    /// Width for `label`, or [`DEFAULT_REFERENCE_WIDTH_M`].
    pub fn width_for(&self, label: &str) -> f64 {
        match self.widths.get(label) {
            Some(&width) => width,
            None => {
                debug!(label, "no reference width, using default");
                DEFAULT_REFERENCE_WIDTH_M
            }
        }
    }
}
