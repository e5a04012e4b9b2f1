//! Builder for creating Detection objects from various input formats.

use crate::tracker::Detection;

/// Builder for creating `Detection` objects from various input formats.
#[derive(Debug, Clone, Default)]
pub struct DetectionBuilder {
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    class_id: i32,
    confidence: f64,
}

impl DetectionBuilder {
    /// Create a new detection builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set bounding box in TLBR format (x1, y1, x2, y2).
    pub fn tlbr(mut self, x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        self.x1 = x1;
        self.y1 = y1;
        self.x2 = x2;
        self.y2 = y2;
        self
    }

    /// Set bounding box in XYWH format (center_x, center_y, width, height).
    pub fn xywh(mut self, cx: i32, cy: i32, w: i32, h: i32) -> Self {
        self.x1 = cx - w / 2;
        self.y1 = cy - h / 2;
        self.x2 = self.x1 + w;
        self.y2 = self.y1 + h;
        self
    }

    /// Set bounding box in TLWH format (left, top, width, height).
    pub fn tlwh(mut self, x: i32, y: i32, w: i32, h: i32) -> Self {
        self.x1 = x;
        self.y1 = y;
        self.x2 = x + w;
        self.y2 = y + h;
        self
    }

    /// Set bounding box from corners normalized to [0, 1], as SSD-style
    /// heads emit them, scaled to a frame of `width` x `height` pixels.
    pub fn normalized_tlbr(
        self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        width: u32,
        height: u32,
    ) -> Self {
        let (w, h) = (f64::from(width), f64::from(height));
        self.tlbr(
            (x1 * w) as i32,
            (y1 * h) as i32,
            (x2 * w) as i32,
            (y2 * h) as i32,
        )
    }

    pub fn class_id(mut self, class_id: i32) -> Self {
        self.class_id = class_id;
        self
    }

    /// Set the confidence score.
    pub fn confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Build the final `Detection`.
    pub fn build(self) -> Detection {
        Detection::from_tlbr(
            self.class_id,
            self.confidence,
            self.x1,
            self.y1,
            self.x2,
            self.y2,
        )
    }
}
