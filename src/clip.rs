//! Clipping of the unbounded bisector graph against the bounding box.

use crate::bounds::BoundingBox;
use crate::edge::{Edge, RawEdge};
use crate::geometry::Point;

/// Clips one bisector to the box with the Liang-Barsky parametric test.
///
/// Returns the clipped endpoints, oriented like the bisector, or `None` if
/// nothing of length above `eps` remains inside. Endpoints that were moved
/// onto the boundary are snapped exactly onto their side; endpoints already
/// inside are returned bit-for-bit so that shared vertices still match.
pub(crate) fn clip_edge(edge: &RawEdge, bounds: &BoundingBox, eps: f64) -> Option<(Point, Point)> {
    let (origin, dir, mut t0, mut t1) = match (edge.va, edge.vb) {
        (Some(a), Some(b)) => (a, b - a, 0.0, 1.0),
        (Some(a), None) => (a, edge.dir, 0.0, f64::INFINITY),
        (None, Some(b)) => (b, edge.dir, f64::NEG_INFINITY, 0.0),
        (None, None) => (edge.anchor, edge.dir, f64::NEG_INFINITY, f64::INFINITY),
    };
    let (start_t, end_t) = (t0, t1);

    let checks = [
        (-dir.x, origin.x - bounds.min[0]),
        (dir.x, bounds.max[0] - origin.x),
        (-dir.y, origin.y - bounds.min[1]),
        (dir.y, bounds.max[1] - origin.y),
    ];
    for (p, q) in checks {
        if p == 0.0 {
            // Parallel to this side: keep if on or inside it.
            if q < -eps {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            if r > t0 {
                t0 = r;
            }
        } else {
            if r < t0 {
                return None;
            }
            if r < t1 {
                t1 = r;
            }
        }
    }
    if !t0.is_finite() || !t1.is_finite() {
        return None;
    }

    // A parameter left untouched is finite only where the bisector has a known endpoint.
    let va = match edge.va {
        Some(a) if t0 == start_t => a,
        _ => bounds.snap(origin + dir * t0, eps),
    };
    let vb = match edge.vb {
        Some(b) if t1 == end_t => b,
        _ => bounds.snap(origin + dir * t1, eps),
    };
    if va.distance(vb) <= eps {
        return None;
    }
    Some((va, vb))
}

/// Clips every bisector and keeps the survivors as natural [`Edge`]s.
pub(crate) fn clip_edges(raw: &[RawEdge], bounds: &BoundingBox, eps: f64) -> Vec<Edge> {
    raw.iter()
        .filter_map(|edge| {
            clip_edge(edge, bounds, eps).map(|(va, vb)| Edge::natural(edge.left, edge.right, va, vb))
        })
        .collect()
}
