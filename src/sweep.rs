//! Fortune's sweep over the sites, producing the unclipped bisector graph.
//!
//! The sweep line moves towards increasing `y`. Each arc of the beachline
//! belongs to the parabola of one site; the breakpoint on its left trace one
//! half-edge, stored in [`Arc::edge`].

use std::cmp::Ordering;
use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::beachline::{ArcId, Beachline};
use crate::edge::{EdgeBuilder, HalfEdgeId, RawEdge};
use crate::error::{Result, VoronoiError};
use crate::event::{CircleId, Event, EventQueue};
use crate::geometry::{Point, circumcenter};

// Relative threshold on the turn of three sites below which no circle event is predicted.
const CIRCLE_EPSILON: f64 = 1e-12;

/// A beachline arc. Arcs are never reused; the id is the index in the arena.
#[derive(Clone, Copy, Debug)]
struct Arc {
    site: usize,
    /// Trace of the breakpoint between this arc and its left neighbor.
    edge: Option<HalfEdgeId>,
    /// Pending event at which this arc disappears.
    circle: Option<CircleId>,
}

/// Counters reported after a sweep.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct SweepStats {
    pub site_events: usize,
    pub circle_events: usize,
    pub stale_events: usize,
    pub half_edges: usize,
}

/// One run of the sweep. Owns its arcs, events and half-edges exclusively.
pub(crate) struct Sweep<'a, B: Beachline> {
    sites: &'a [Point],
    beachline: &'a mut B,
    arcs: Vec<Arc>,
    queue: EventQueue,
    edges: EdgeBuilder,
    eps: f64,
    stats: SweepStats,
}

impl<'a, B: Beachline> Sweep<'a, B> {
    /// Prepares a sweep over `sites`. The sites must be finite and pairwise distinct.
    pub fn new(sites: &'a [Point], beachline: &'a mut B, eps: f64) -> Self {
        beachline.clear();
        Self {
            sites,
            beachline,
            arcs: Vec::with_capacity(sites.len() * 2),
            queue: EventQueue::new(),
            edges: EdgeBuilder::default(),
            eps,
            stats: SweepStats::default(),
        }
    }

    /// Processes all events and returns the bisectors with their traced endpoints.
    pub fn run(mut self) -> Result<(Vec<RawEdge>, SweepStats)> {
        for (index, site) in self.sites.iter().enumerate() {
            self.queue.push_site(index, *site);
        }

        while let Some((event, pos)) = self.queue.pop() {
            match event {
                Event::Site(index) => {
                    trace!(site = index, x = pos.x, y = pos.y, "site event");
                    self.stats.site_events += 1;
                    self.add_site(index)?;
                }
                Event::Circle(id) => {
                    trace!(circle = id, x = pos.x, y = pos.y, "circle event");
                    self.stats.circle_events += 1;
                    self.remove_arc(id)?;
                }
            }
        }

        self.stats.stale_events = self.queue.discarded();
        self.stats.half_edges = self.edges.len();
        debug!(
            site_events = self.stats.site_events,
            circle_events = self.stats.circle_events,
            stale_events = self.stats.stale_events,
            half_edges = self.stats.half_edges,
            remaining_arcs = self.beachline.len(),
            "sweep finished"
        );
        Ok((self.edges.into_raw_edges(self.sites), self.stats))
    }

    fn new_arc(&mut self, site: usize) -> ArcId {
        self.arcs.push(Arc { site, edge: None, circle: None });
        self.arcs.len() - 1
    }

    fn site_of(&self, arc: ArcId) -> Point {
        self.sites[self.arcs[arc].site]
    }

    /// x-coordinate of the breakpoint on the left of `arc` for the given sweep position.
    fn left_breakpoint(&self, arc: ArcId, directrix: f64) -> f64 {
        let focus = self.site_of(arc);
        let pby2 = focus.y - directrix;
        // A focus on the sweep line is a vertical ray.
        if pby2 == 0.0 {
            return focus.x;
        }
        let Some(prev) = self.beachline.prev(arc) else {
            return f64::NEG_INFINITY;
        };
        let left = self.site_of(prev);
        let plby2 = left.y - directrix;
        if plby2 == 0.0 {
            return left.x;
        }
        let hl = left.x - focus.x;
        let aby2 = 1.0 / pby2 - 1.0 / plby2;
        let b = hl / plby2;
        if aby2 != 0.0 {
            let disc = b * b
                - 2.0 * aby2 * (hl * hl / (-2.0 * plby2) - left.y + plby2 / 2.0 + focus.y - pby2 / 2.0);
            return (-b + disc.max(0.0).sqrt()) / aby2 + focus.x;
        }
        (focus.x + left.x) / 2.0
    }

    fn right_breakpoint(&self, arc: ArcId, directrix: f64) -> f64 {
        match self.beachline.next(arc) {
            Some(next) => self.left_breakpoint(next, directrix),
            None => {
                let focus = self.site_of(arc);
                if focus.y == directrix { focus.x } else { f64::INFINITY }
            }
        }
    }

    fn compare_arc(&self, arc: ArcId, x: f64, directrix: f64) -> Ordering {
        if self.left_breakpoint(arc, directrix) - x > self.eps {
            Ordering::Less
        } else if x - self.right_breakpoint(arc, directrix) > self.eps {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }

    fn drop_circle(&mut self, arc: ArcId) {
        if let Some(id) = self.arcs[arc].circle.take() {
            self.queue.invalidate(id);
        }
    }

    fn finish_edge(&mut self, arc: ArcId, vertex: Point) -> Result<()> {
        let edge = self.arcs[arc]
            .edge
            .ok_or_else(|| VoronoiError::Internal(format!("arc {} has no left breakpoint", arc)))?;
        if !self.edges.finish(edge, vertex) {
            return Err(VoronoiError::Internal(format!("breakpoint {} of arc {} terminated twice", edge, arc)));
        }
        Ok(())
    }

    /// Site event: splits the arc above the site (or the breakpoint it hits).
    fn add_site(&mut self, index: usize) -> Result<()> {
        let site = self.sites[index];
        let (x, directrix) = (site.x, site.y);

        let Some(found) = self.beachline.locate(|arc| self.compare_arc(arc, x, directrix)) else {
            let arc = self.new_arc(index);
            self.beachline.insert_after(None, arc);
            return Ok(());
        };

        let dxl = self.left_breakpoint(found, directrix) - x;
        let dxr = x - self.right_breakpoint(found, directrix);
        let (left, right) = if dxl.abs() <= self.eps {
            (self.beachline.prev(found), Some(found))
        } else if dxr.abs() <= self.eps {
            (Some(found), self.beachline.next(found))
        } else if dxr > self.eps && self.beachline.next(found).is_none() {
            (Some(found), None)
        } else {
            (Some(found), Some(found))
        };

        let Some(left) = left else {
            return Err(VoronoiError::Internal(format!(
                "site {} located left of the leftmost arc",
                index
            )));
        };
        let arc = self.new_arc(index);
        let outer = self.arcs[left].site;

        match right {
            Some(right) if right == left => {
                // The site falls inside an arc: split it around a new one.
                self.drop_circle(left);
                let start = Self::parabola_point(self.sites[outer], directrix, x);
                let (left_edge, right_edge) = self.edges.begin_twins(outer, index, start);
                self.beachline.insert_after(Some(left), arc);
                let twin = self.new_arc(outer);
                self.beachline.insert_after(Some(arc), twin);
                self.arcs[arc].edge = Some(left_edge);
                self.arcs[twin].edge = Some(right_edge);
                self.attach_circle(left, directrix);
                self.attach_circle(twin, directrix);
            }
            None => {
                // Sites sharing the first sweep position: the new arc is appended
                // and their bisector reaches back to infinity.
                let start = self.sites[outer].midpoint(site);
                let (left_edge, _) = self.edges.begin_twins(outer, index, start);
                self.beachline.insert_after(Some(left), arc);
                self.arcs[arc].edge = Some(left_edge);
            }
            Some(right) => {
                // The site falls on a breakpoint, which becomes a vertex right away.
                self.drop_circle(left);
                self.drop_circle(right);
                let inner = self.arcs[right].site;
                let vertex = circumcenter(self.sites[outer], site, self.sites[inner]).ok_or_else(|| {
                    VoronoiError::Internal(format!("site {} on a breakpoint without a vertex", index))
                })?;
                self.finish_edge(right, vertex)?;
                self.beachline.insert_after(Some(left), arc);
                self.arcs[arc].edge = Some(self.edges.begin(outer, index, vertex));
                self.arcs[right].edge = Some(self.edges.begin(index, inner, vertex));
                self.attach_circle(left, directrix);
                self.attach_circle(right, directrix);
            }
        }
        Ok(())
    }

    /// Point of the parabola with `focus` and the sweep line at `directrix`, above `x`.
    fn parabola_point(focus: Point, directrix: f64, x: f64) -> Point {
        let depth = directrix - focus.y;
        if depth == 0.0 {
            return Point::new(focus.x, focus.y);
        }
        let dx = x - focus.x;
        Point::new(x, (focus.y + directrix) * 0.5 - dx * dx / (2.0 * depth))
    }

    /// Circle event: the arc shrank to a point, which becomes a vertex.
    fn remove_arc(&mut self, id: CircleId) -> Result<()> {
        let circle = *self.queue.circle(id);
        let arc = circle.arc;
        if self.arcs[arc].circle != Some(id) {
            return Err(VoronoiError::Internal(format!("circle event {} is not attached to arc {}", id, arc)));
        }
        self.arcs[arc].circle = None;
        let vertex = circle.center;

        let (Some(mut left), Some(mut right)) = (self.beachline.prev(arc), self.beachline.next(arc)) else {
            return Err(VoronoiError::Internal(format!("vanishing arc {} is missing a neighbor", arc)));
        };
        self.beachline.remove(arc);

        // Neighbors vanishing at the same vertex are collapsed with it.
        let mut vanishing = VecDeque::from([arc]);
        while let Some(prev) = self.coincident_neighbor(left, vertex, |line, a| line.prev(a)) {
            self.drop_circle(left);
            self.beachline.remove(left);
            vanishing.push_front(left);
            left = prev;
        }
        self.drop_circle(left);
        vanishing.push_front(left);

        while let Some(next) = self.coincident_neighbor(right, vertex, |line, a| line.next(a)) {
            self.drop_circle(right);
            self.beachline.remove(right);
            vanishing.push_back(right);
            right = next;
        }
        self.drop_circle(right);
        vanishing.push_back(right);

        for &gone in vanishing.iter().skip(1) {
            self.finish_edge(gone, vertex)?;
        }
        let outer = self.arcs[left].site;
        let inner = self.arcs[right].site;
        self.arcs[right].edge = Some(self.edges.begin(outer, inner, vertex));

        self.attach_circle(left, circle.y);
        self.attach_circle(right, circle.y);
        Ok(())
    }

    /// If `arc` is about to vanish at `vertex` too, returns its neighbor in the walk direction.
    fn coincident_neighbor<F>(&self, arc: ArcId, vertex: Point, step: F) -> Option<ArcId>
    where
        F: Fn(&B, ArcId) -> Option<ArcId>,
    {
        let id = self.arcs[arc].circle?;
        let pending = self.queue.circle(id);
        if !pending.is_valid() || !pending.center.approx_eq(vertex, self.eps) {
            return None;
        }
        step(&*self.beachline, arc)
    }

    /// Schedules the event at which `arc` would vanish, if its breakpoints converge.
    fn attach_circle(&mut self, arc: ArcId, directrix: f64) {
        self.drop_circle(arc);
        let (Some(left), Some(right)) = (self.beachline.prev(arc), self.beachline.next(arc)) else {
            return;
        };
        if self.arcs[left].site == self.arcs[right].site {
            return;
        }

        let center_site = self.site_of(arc);
        let a = self.site_of(left) - center_site;
        let c = self.site_of(right) - center_site;
        let ha = a.length_sq();
        let hc = c.length_sq();
        let d = 2.0 * a.cross(c);
        // Collinear or diverging breakpoints never meet.
        if d >= -CIRCLE_EPSILON * (ha * hc).sqrt() {
            return;
        }

        let x = (c.y * ha - a.y * hc) / d;
        let y = (a.x * hc - c.x * ha) / d;
        let center = Point::new(x + center_site.x, y + center_site.y);
        let event_y = center.y + (x * x + y * y).sqrt();
        if !event_y.is_finite() || event_y < directrix - self.eps {
            trace!(arc, event_y, directrix, "circle event behind the sweep line");
            return;
        }

        let id = self.queue.push_circle(arc, center, event_y);
        self.arcs[arc].circle = Some(id);
    }
}
