//! Edge records: half-edges traced by the sweep and the final clipped edges.

use crate::geometry::{Point, bisector_direction};

/// What an [`Edge`] separates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EdgeKind {
    /// A bisector between two sites.
    Natural { right: usize },
    /// A stretch of the bounding rectangle closing the cell of `left`.
    /// `side` is one of the `BOX_ID_*` constants.
    Border { side: i32 },
}

/// A finished edge of the tessellation, clipped to the bounding box.
///
/// Walking from `va` to `vb`, the `left` site lies on the left-hand side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub(crate) left: usize,
    pub(crate) kind: EdgeKind,
    pub(crate) va: [f64; 2],
    pub(crate) vb: [f64; 2],
}

impl Edge {
    pub(crate) fn natural(left: usize, right: usize, va: Point, vb: Point) -> Self {
        Self { left, kind: EdgeKind::Natural { right }, va: va.into(), vb: vb.into() }
    }

    pub(crate) fn border(left: usize, side: i32, va: Point, vb: Point) -> Self {
        Self { left, kind: EdgeKind::Border { side }, va: va.into(), vb: vb.into() }
    }

    pub fn va(&self) -> [f64; 2] {
        self.va
    }

    pub fn vb(&self) -> [f64; 2] {
        self.vb
    }

    pub fn left(&self) -> usize {
        self.left
    }

    /// The site on the right, `None` for border edges.
    pub fn right(&self) -> Option<usize> {
        match self.kind {
            EdgeKind::Natural { right } => Some(right),
            EdgeKind::Border { .. } => None,
        }
    }

    pub fn kind(&self) -> EdgeKind {
        self.kind
    }

    pub fn is_border(&self) -> bool {
        matches!(self.kind, EdgeKind::Border { .. })
    }

    /// The bounding box side a border edge runs along.
    pub fn side(&self) -> Option<i32> {
        match self.kind {
            EdgeKind::Border { side } => Some(side),
            EdgeKind::Natural { .. } => None,
        }
    }

    pub fn length(&self) -> f64 {
        Point::from(self.va).distance(self.vb.into())
    }

    /// Moves both endpoints through `f`.
    pub(crate) fn map_points(&mut self, f: impl Fn([f64; 2]) -> [f64; 2]) {
        self.va = f(self.va);
        self.vb = f(self.vb);
    }
}

/// Index of a half-edge in the [`EdgeBuilder`].
pub(crate) type HalfEdgeId = usize;

/// The trace of one breakpoint: it starts where the breakpoint is born and
/// ends at the vertex where it dies, if it ever does.
#[derive(Clone, Copy, Debug)]
pub(crate) struct HalfEdge {
    pub left: usize,
    pub right: usize,
    pub start: Point,
    pub end: Option<Point>,
    /// The breakpoint born at the same point and moving the opposite way.
    pub twin: Option<HalfEdgeId>,
}

/// An unclipped bisector after the sweep, as the portion of the line through
/// `anchor` along `dir` from `va` to `vb`. A missing endpoint extends to infinity.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RawEdge {
    pub left: usize,
    pub right: usize,
    pub anchor: Point,
    pub dir: Point,
    pub va: Option<Point>,
    pub vb: Option<Point>,
}

/// Grows the set of half-edges during the sweep.
#[derive(Default)]
pub(crate) struct EdgeBuilder {
    half_edges: Vec<HalfEdge>,
}

impl EdgeBuilder {
    pub fn len(&self) -> usize {
        self.half_edges.len()
    }

    /// Starts a single breakpoint trace between `left` and `right` at `start`.
    pub fn begin(&mut self, left: usize, right: usize, start: Point) -> HalfEdgeId {
        let id = self.half_edges.len();
        self.half_edges.push(HalfEdge { left, right, start, end: None, twin: None });
        id
    }

    /// Starts the two breakpoints created when the arc of `outer` is split by
    /// `inner`. Returns `(outer|inner, inner|outer)`.
    pub fn begin_twins(&mut self, outer: usize, inner: usize, start: Point) -> (HalfEdgeId, HalfEdgeId) {
        let a = self.begin(outer, inner, start);
        let b = self.begin(inner, outer, start);
        self.half_edges[a].twin = Some(b);
        self.half_edges[b].twin = Some(a);
        (a, b)
    }

    /// Terminates a trace at `vertex`. Returns `false` if it was already finished.
    pub fn finish(&mut self, id: HalfEdgeId, vertex: Point) -> bool {
        let edge = &mut self.half_edges[id];
        if edge.end.is_some() {
            return false;
        }
        edge.end = Some(vertex);
        true
    }

    /// Joins twin traces and returns one bisector per pair of adjacent sites.
    ///
    /// A twin pair shares its start, which is just the point on the beachline
    /// where the sites first met, so the joined edge spans from one twin's end
    /// to the other's, oriented like the second twin.
    pub fn into_raw_edges(&self, sites: &[Point]) -> Vec<RawEdge> {
        let mut raw = Vec::with_capacity(self.half_edges.len());
        for (id, half) in self.half_edges.iter().enumerate() {
            let (left, right) = (sites[half.left], sites[half.right]);
            let dir = bisector_direction(left, right);
            match half.twin {
                Some(twin) if twin < id => {
                    let back = &self.half_edges[twin];
                    let anchor = match (back.end, half.end) {
                        (Some(a), _) => a,
                        (None, Some(b)) => b,
                        (None, None) => left.midpoint(right),
                    };
                    raw.push(RawEdge {
                        left: half.left,
                        right: half.right,
                        anchor,
                        dir,
                        va: back.end,
                        vb: half.end,
                    });
                }
                Some(_) => {}
                None => raw.push(RawEdge {
                    left: half.left,
                    right: half.right,
                    anchor: half.start,
                    dir,
                    va: Some(half.start),
                    vb: half.end,
                }),
            }
        }
        raw
    }
}
