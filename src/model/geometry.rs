//! Geometry primitives in PDF user space (origin bottom-left, y grows up).

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
    pub top: f32,
}

impl BBox {
    /// Build a box from two corners given in any order.
    pub fn from_corners(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            left: x0.min(x1),
            bottom: y0.min(y1),
            right: x0.max(x1),
            top: y0.max(y1),
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }

    /// Whether the point lies inside the box, edges included.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left && x <= self.right && y >= self.bottom && y <= self.top
    }

    /// Smallest box covering both.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            left: self.left.min(other.left),
            bottom: self.bottom.min(other.bottom),
            right: self.right.max(other.right),
            top: self.top.max(other.top),
        }
    }
}

/// Orientation of a ruling line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// A painted horizontal or vertical line segment.
///
/// Coordinates are normalized so that `x0 <= x1` and `y0 <= y1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ruling {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Ruling {
    /// Build a ruling from a segment, or `None` if the segment is diagonal
    /// (neither extent is within `tolerance`) or degenerate.
    pub fn from_segment(x0: f32, y0: f32, x1: f32, y1: f32, tolerance: f32) -> Option<Self> {
        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();

        if dx <= tolerance && dy <= tolerance {
            return None;
        }

        if dy <= tolerance {
            let y = (y0 + y1) / 2.0;
            return Some(Self {
                x0: x0.min(x1),
                y0: y,
                x1: x0.max(x1),
                y1: y,
            });
        }

        if dx <= tolerance {
            let x = (x0 + x1) / 2.0;
            return Some(Self {
                x0: x,
                y0: y0.min(y1),
                x1: x,
                y1: y0.max(y1),
            });
        }

        None
    }

    pub fn orientation(&self) -> Orientation {
        if (self.y1 - self.y0).abs() <= (self.x1 - self.x0).abs() {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        }
    }

    pub fn is_horizontal(&self) -> bool {
        self.orientation() == Orientation::Horizontal
    }

    pub fn is_vertical(&self) -> bool {
        self.orientation() == Orientation::Vertical
    }

    pub fn length(&self) -> f32 {
        (self.x1 - self.x0).max(self.y1 - self.y0)
    }

    /// Whether two rulings of opposite orientation cross (or touch) each other.
    ///
    /// Parallel rulings never intersect under this definition.
    pub fn intersects(&self, other: &Ruling, tolerance: f32) -> bool {
        let (h, v) = match (self.orientation(), other.orientation()) {
            (Orientation::Horizontal, Orientation::Vertical) => (self, other),
            (Orientation::Vertical, Orientation::Horizontal) => (other, self),
            _ => return false,
        };

        v.x0 >= h.x0 - tolerance
            && v.x0 <= h.x1 + tolerance
            && h.y0 >= v.y0 - tolerance
            && h.y0 <= v.y1 + tolerance
    }

    pub fn bbox(&self) -> BBox {
        BBox::from_corners(self.x0, self.y0, self.x1, self.y1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_from_corners_normalizes() {
        let b = BBox::from_corners(100.0, 50.0, 10.0, 200.0);
        assert_eq!(b.left, 10.0);
        assert_eq!(b.right, 100.0);
        assert_eq!(b.bottom, 50.0);
        assert_eq!(b.top, 200.0);
        assert!(b.contains(10.0, 50.0));
        assert!(!b.contains(9.0, 60.0));
    }

    #[test]
    fn test_ruling_from_segment() {
        let h = Ruling::from_segment(200.0, 100.5, 50.0, 100.0, 1.0).unwrap();
        assert!(h.is_horizontal());
        assert_eq!(h.x0, 50.0);
        assert_eq!(h.x1, 200.0);

        let v = Ruling::from_segment(80.0, 300.0, 80.0, 100.0, 1.0).unwrap();
        assert!(v.is_vertical());
        assert_eq!(v.y0, 100.0);

        assert!(Ruling::from_segment(0.0, 0.0, 50.0, 50.0, 1.0).is_none());
        assert!(Ruling::from_segment(5.0, 5.0, 5.2, 5.1, 1.0).is_none());
    }

    #[test]
    fn test_ruling_intersection() {
        let h = Ruling::from_segment(50.0, 100.0, 200.0, 100.0, 1.0).unwrap();
        let v = Ruling::from_segment(50.0, 100.0, 50.0, 300.0, 1.0).unwrap();
        let far = Ruling::from_segment(400.0, 100.0, 400.0, 300.0, 1.0).unwrap();

        assert!(h.intersects(&v, 2.0));
        assert!(v.intersects(&h, 2.0));
        assert!(!h.intersects(&far, 2.0));
        assert!(!h.intersects(&h, 2.0));
    }
}
