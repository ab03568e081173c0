use std::cmp::Ordering;

mod list;
mod treap;

pub use list::ArcList;
pub use treap::ArcTreap;

/// Index of an arc in the sweep's arc arena.
pub type ArcId = usize;

/// Trait defining the ordered arc sequence of the sweep line.
/// This allows swapping between a balanced tree (`ArcTreap`) and a plain linked list (`ArcList`).
///
/// Implementations only store the order of the arcs. The arcs themselves, and
/// the breakpoints that order them, live in the sweep: breakpoints move with
/// the sweep line, so no key is stored and [`Beachline::locate`] is driven by
/// a comparator instead.
pub trait Beachline: Default + Send {
    /// Removes all arcs, keeping allocations.
    fn clear(&mut self);

    /// Number of arcs in the sequence.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Leftmost arc.
    fn first(&self) -> Option<ArcId>;

    /// Left neighbor of `arc`.
    fn prev(&self, arc: ArcId) -> Option<ArcId>;

    /// Right neighbor of `arc`.
    fn next(&self, arc: ArcId) -> Option<ArcId>;

    /// Inserts `arc` directly to the right of `after`, or as the leftmost arc if `after` is `None`.
    fn insert_after(&mut self, after: Option<ArcId>, arc: ArcId);

    /// Splices `arc` out of the sequence.
    fn remove(&mut self, arc: ArcId);

    /// Finds the arc covering a position.
    ///
    /// `cmp` tells for a candidate arc whether the searched position lies to its
    /// left (`Less`), to its right (`Greater`) or on it (`Equal`). If no arc
    /// answers `Equal`, the last arc visited is returned.
    fn locate<F>(&self, cmp: F) -> Option<ArcId>
    where
        F: FnMut(ArcId) -> Ordering;

    /// Iterates over the arcs from left to right.
    fn arcs(&self) -> Arcs<'_, Self>
    where
        Self: Sized,
    {
        Arcs { line: self, current: self.first() }
    }
}

/// Left-to-right iterator over a [`Beachline`].
pub struct Arcs<'a, B> {
    line: &'a B,
    current: Option<ArcId>,
}

impl<B: Beachline> Iterator for Arcs<'_, B> {
    type Item = ArcId;

    fn next(&mut self) -> Option<ArcId> {
        let arc = self.current?;
        self.current = self.line.next(arc);
        Some(arc)
    }
}
