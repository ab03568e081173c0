//! Geometry kernel: point arithmetic and the polygon formulas shared by the
//! sweep, the clipper and the cell assembler.

use crate::error::{Result, VoronoiError};

/// A point (or vector) in the plane.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl std::ops::Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f64> for Point {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl std::ops::Neg for Point {
    type Output = Self;

    fn neg(self) -> Self {
        Point::new(-self.x, -self.y)
    }
}

impl From<[f64; 2]> for Point {
    fn from(p: [f64; 2]) -> Self {
        Point::new(p[0], p[1])
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// z-component of the 3D cross product.
    pub fn cross(self, other: Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn length_sq(self) -> f64 {
        self.dot(self)
    }

    pub fn distance_sq(self, other: Self) -> f64 {
        (self - other).length_sq()
    }

    pub fn distance(self, other: Self) -> f64 {
        self.distance_sq(other).sqrt()
    }

    /// Counter-clockwise rotation by 90 degrees.
    pub fn perp(self) -> Self {
        Point::new(-self.y, self.x)
    }

    pub fn midpoint(self, other: Self) -> Self {
        Point::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    pub fn normalized(self) -> Self {
        let len = self.length_sq().sqrt();
        if len > 0.0 { self * (1.0 / len) } else { self }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Component-wise comparison within `eps`.
    pub fn approx_eq(self, other: Self, eps: f64) -> bool {
        (self.x - other.x).abs() <= eps && (self.y - other.y).abs() <= eps
    }
}

/// Direction in which the bisector between `left` and `right` is traced.
///
/// The breakpoint between a left arc and a right arc always travels with the
/// left site on its left-hand side, so the direction is the counter-clockwise
/// normal of `right - left`.
pub fn bisector_direction(left: Point, right: Point) -> Point {
    (right - left).perp().normalized()
}

/// Center of the circle through `a`, `b` and `c`, or `None` when the points are
/// (numerically) collinear.
pub fn circumcenter(a: Point, b: Point, c: Point) -> Option<Point> {
    let ab = b - a;
    let ac = c - a;
    let d = 2.0 * ab.cross(ac);
    if d == 0.0 {
        return None;
    }
    let hb = ab.length_sq();
    let hc = ac.length_sq();
    let center = Point::new(
        (ac.y * hb - ab.y * hc) / d + a.x,
        (ab.x * hc - ac.x * hb) / d + a.y,
    );
    center.is_finite().then_some(center)
}

/// Signed area of a polygon given as a flat `[x, y, x, y, ...]` array.
/// Positive for counter-clockwise vertex order.
pub fn signed_area(vertices: &[f64]) -> f64 {
    let n = vertices.len() / 2;
    if n < 3 {
        return 0.0;
    }

    // Relative to the first vertex, so boxes far from the origin keep their precision.
    let (ox, oy) = (vertices[0], vertices[1]);
    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        let (xi, yi) = (vertices[i * 2] - ox, vertices[i * 2 + 1] - oy);
        let (xj, yj) = (vertices[j * 2] - ox, vertices[j * 2 + 1] - oy);
        area += xi * yj - xj * yi;
    }
    area * 0.5
}

/// Unsigned area of a polygon given as a flat `[x, y, x, y, ...]` array.
pub fn polygon_area(vertices: &[f64]) -> f64 {
    signed_area(vertices).abs()
}

/// Centroid of a closed, consistently oriented polygon.
///
/// Uses the shoelace form `C = 1/(6A) Σ (p_i + p_{i+1}) (x_i y_{i+1} - x_{i+1} y_i)`,
/// which holds for any simple polygon regardless of its vertex count.
/// Fails with [`VoronoiError::DegeneratePolygon`] when the area vanishes.
pub fn polygon_centroid(vertices: &[f64]) -> Result<[f64; 2]> {
    let n = vertices.len() / 2;
    if n < 3 {
        return Err(VoronoiError::DegeneratePolygon { area: 0.0 });
    }

    // Shift to the first vertex to keep the cross products small.
    let ox = vertices[0];
    let oy = vertices[1];

    let mut cx = 0.0;
    let mut cy = 0.0;
    let mut area = 0.0;
    let mut extent: f64 = 0.0;

    for i in 0..n {
        let j = (i + 1) % n;
        let xi = vertices[i * 2] - ox;
        let yi = vertices[i * 2 + 1] - oy;
        let xj = vertices[j * 2] - ox;
        let yj = vertices[j * 2 + 1] - oy;

        let cross = xi * yj - xj * yi;
        area += cross;
        cx += (xi + xj) * cross;
        cy += (yi + yj) * cross;
        extent = extent.max(xi.abs()).max(yi.abs());
    }

    if area.abs() <= 1e-12 * extent * extent {
        return Err(VoronoiError::DegeneratePolygon { area: area * 0.5 });
    }

    let factor = 1.0 / (3.0 * area);
    Ok([cx * factor + ox, cy * factor + oy])
}
