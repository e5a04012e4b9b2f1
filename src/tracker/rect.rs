//! Integer bounding box and point types with the containment tests used by
//! the trackers.
//!
//! Coordinates are pixels with the origin at the top-left of the frame.
//! Boxes are stored as TLWH: Top-Left X, Top-Left Y, Width, Height.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// A pixel position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[inline]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Displacement from `self` to `other` as a float vector.
    #[inline]
    pub fn displacement_to(&self, other: &Point) -> Vector2<f64> {
        Vector2::new(
            f64::from(other.x) - f64::from(self.x),
            f64::from(other.y) - f64::from(self.y),
        )
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left x coordinate
    pub x: i32,
    /// Top-left y coordinate
    pub y: i32,
    /// Width of the bounding box
    pub width: i32,
    /// Height of the bounding box
    pub height: i32,
}

impl Rect {
    /// Create a new Rect from top-left coordinates and dimensions (TLWH format).
    #[inline]
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a Rect from TLBR format (top-left x, top-left y, bottom-right x, bottom-right y).
    #[inline]
    pub fn from_tlbr(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self {
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
        }
    }

    /// Convert to TLBR format: (x1, y1, x2, y2).
    #[inline]
    pub fn to_tlbr(&self) -> [i32; 4] {
        [self.x, self.y, self.right(), self.bottom()]
    }

    /// Convert to TLWH format: (x, y, width, height).
    #[inline]
    pub fn to_tlwh(&self) -> [i32; 4] {
        [self.x, self.y, self.width, self.height]
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Center of the box, truncated to whole pixels.
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    #[inline]
    pub fn area(&self) -> i64 {
        i64::from(self.width) * i64::from(self.height)
    }

    /// Whether `point` lies inside the box, edges included.
    #[inline]
    pub fn contains(&self, point: &Point) -> bool {
        let inside_x = self.x <= point.x && point.x <= self.right();
        let inside_y = self.y <= point.y && point.y <= self.bottom();
        inside_x && inside_y
    }

    /// Bidirectional containment: each box holds the other's center.
    pub fn mutually_contains(&self, other: &Rect) -> bool {
        self.contains(&other.center()) && other.contains(&self.center())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_conversions() {
        let rect = Rect::new(10, 20, 30, 40);

        assert_eq!(rect.to_tlwh(), [10, 20, 30, 40]);
        assert_eq!(rect.to_tlbr(), [10, 20, 40, 60]);
        assert_eq!(rect.area(), 1200);
    }

    #[test]
    fn test_from_tlbr() {
        let rect = Rect::from_tlbr(10, 20, 40, 60);
        assert_eq!(rect.to_tlwh(), [10, 20, 30, 40]);
    }

    #[test]
    fn test_center_truncates() {
        assert_eq!(Rect::new(0, 0, 5, 7).center(), Point::new(2, 3));
        assert_eq!(Rect::new(-50, -50, 100, 100).center(), Point::new(0, 0));
    }

    #[test]
    fn test_contains_edges() {
        let rect = Rect::new(0, 0, 10, 10);
        assert!(rect.contains(&Point::new(0, 0)));
        assert!(rect.contains(&Point::new(10, 10)));
        assert!(!rect.contains(&Point::new(11, 5)));
        assert!(!rect.contains(&Point::new(5, -1)));
    }

    #[test]
    fn test_mutual_containment() {
        let a = Rect::new(0, 0, 100, 100);
        let b = Rect::new(10, 10, 100, 100);
        assert!(a.mutually_contains(&b));
        assert!(b.mutually_contains(&a));
    }

    #[test]
    fn test_one_sided_containment_is_not_enough() {
        // The small box sits inside the large one, but the large box's
        // center (100, 100) is outside the small box.
        let large = Rect::new(0, 0, 200, 200);
        let small = Rect::new(0, 0, 20, 20);
        assert!(large.contains(&small.center()));
        assert!(!large.mutually_contains(&small));
    }

    #[test]
    fn test_displacement() {
        let d = Point::new(1, 2).displacement_to(&Point::new(4, 6));
        assert_eq!(d, Vector2::new(3.0, 4.0));
    }
}
