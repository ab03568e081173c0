use crate::error::{Result, VoronoiError};
use crate::geometry::Point;

/// Bounding box ID for the left side (x = min), it is negative to prevent conflicts with generator IDs.
pub const BOX_ID_LEFT: i32 = -1;
/// Bounding box ID for the right side (x = max), it is negative to prevent conflicts with generator IDs.
pub const BOX_ID_RIGHT: i32 = -2;
/// Bounding box ID for the bottom side (y = min), it is negative to prevent conflicts with generator IDs.
pub const BOX_ID_BOTTOM: i32 = -3;
/// Bounding box ID for the top side (y = max), it is negative to prevent conflicts with generator IDs.
pub const BOX_ID_TOP: i32 = -4;

/// Tolerance relative to the box extent used for all geometric comparisons.
pub const EPSILON: f64 = 1e-9;

/// Calculates the ID for a bounding box side based on the axis and direction.
///
/// The IDs start at -1 and decrease.
/// - Axis 0 (X) Min: -1
/// - Axis 0 (X) Max: -2
/// - Axis 1 (Y) Min: -3
/// - Axis 1 (Y) Max: -4
pub fn box_side(axis: usize, is_max: bool) -> i32 {
    -1 - (axis * 2 + if is_max { 1 } else { 0 }) as i32
}

/// Axis-aligned rectangle the tessellation is clipped to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl BoundingBox {
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Self { min, max }
    }

    /// Fails unless both extents are finite and strictly positive.
    pub fn validate(&self) -> Result<()> {
        let finite = self.min.iter().chain(self.max.iter()).all(|v| v.is_finite());
        if !finite || self.min[0] >= self.max[0] || self.min[1] >= self.max[1] {
            return Err(VoronoiError::InvalidBounds { min: self.min, max: self.max });
        }
        Ok(())
    }

    pub fn width(&self) -> f64 {
        self.max[0] - self.min[0]
    }

    pub fn height(&self) -> f64 {
        self.max[1] - self.min[1]
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn center(&self) -> [f64; 2] {
        [(self.min[0] + self.max[0]) * 0.5, (self.min[1] + self.max[1]) * 0.5]
    }

    /// Absolute tolerance scaled to the extent of the box.
    ///
    /// Only the size of the box matters, not where it sits: the pipeline
    /// works on coordinates relative to `min`.
    pub fn tolerance(&self) -> f64 {
        EPSILON * self.width().max(self.height())
    }

    /// The same box moved so that `min` is the origin.
    pub(crate) fn local(&self) -> BoundingBox {
        BoundingBox::new([0.0, 0.0], [self.width(), self.height()])
    }

    /// Checks whether `p` lies inside or on the box, within `eps`.
    pub fn contains(&self, p: [f64; 2], eps: f64) -> bool {
        p[0] >= self.min[0] - eps
            && p[0] <= self.max[0] + eps
            && p[1] >= self.min[1] - eps
            && p[1] <= self.max[1] + eps
    }

    /// Checks whether `p` lies on one of the four sides, within `eps`.
    pub fn on_boundary(&self, p: [f64; 2], eps: f64) -> bool {
        self.contains(p, eps) && self.boundary_distance(p.into()) <= eps
    }

    pub fn perimeter(&self) -> f64 {
        2.0 * (self.width() + self.height())
    }

    /// Corners in counter-clockwise order, starting at the bottom-left one.
    pub(crate) fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.min[0], self.min[1]),
            Point::new(self.max[0], self.min[1]),
            Point::new(self.max[0], self.max[1]),
            Point::new(self.min[0], self.max[1]),
        ]
    }

    /// Perimeter parameter of each corner, matching [`BoundingBox::corners`].
    pub(crate) fn corner_positions(&self) -> [f64; 4] {
        let w = self.width();
        let h = self.height();
        [0.0, w, w + h, 2.0 * w + h]
    }

    fn boundary_distance(&self, p: Point) -> f64 {
        (p.x - self.min[0])
            .abs()
            .min((self.max[0] - p.x).abs())
            .min((p.y - self.min[1]).abs())
            .min((self.max[1] - p.y).abs())
    }

    /// Counter-clockwise arc length from the bottom-left corner to `p`, walking
    /// bottom, right, top and left side in turn. Returns `None` when `p` is
    /// farther than `eps` from the boundary.
    pub(crate) fn perimeter_position(&self, p: Point, eps: f64) -> Option<f64> {
        if !self.contains(p.into(), eps) {
            return None;
        }
        let w = self.width();
        let h = self.height();
        let d_bottom = (p.y - self.min[1]).abs();
        let d_right = (self.max[0] - p.x).abs();
        let d_top = (self.max[1] - p.y).abs();
        let d_left = (p.x - self.min[0]).abs();
        let nearest = d_bottom.min(d_right).min(d_top).min(d_left);
        if nearest > eps {
            return None;
        }

        let s = if nearest == d_bottom {
            (p.x - self.min[0]).clamp(0.0, w)
        } else if nearest == d_right {
            w + (p.y - self.min[1]).clamp(0.0, h)
        } else if nearest == d_top {
            w + h + (self.max[0] - p.x).clamp(0.0, w)
        } else {
            2.0 * w + h + (self.max[1] - p.y).clamp(0.0, h)
        };
        Some(s % self.perimeter())
    }

    /// Side ID of the perimeter stretch containing parameter `s`.
    pub(crate) fn side_at(&self, s: f64) -> i32 {
        let w = self.width();
        let h = self.height();
        let s = s.rem_euclid(self.perimeter());
        if s < w {
            box_side(1, false)
        } else if s < w + h {
            box_side(0, true)
        } else if s < 2.0 * w + h {
            box_side(1, true)
        } else {
            box_side(0, false)
        }
    }

    /// Moves coordinates lying within `eps` of a side exactly onto it.
    pub(crate) fn snap(&self, p: Point, eps: f64) -> Point {
        let snap_axis = |v: f64, lo: f64, hi: f64| {
            if (v - lo).abs() <= eps {
                lo
            } else if (v - hi).abs() <= eps {
                hi
            } else {
                v
            }
        };
        Point::new(
            snap_axis(p.x, self.min[0], self.max[0]),
            snap_axis(p.y, self.min[1], self.max[1]),
        )
    }
}
