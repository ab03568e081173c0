//! Priority queue of site and circle events.
//!
//! Circle events are never removed from the heap. Invalidating one only clears
//! its flag in the side table, and [`EventQueue::pop`] discards stale entries
//! as they surface.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::beachline::ArcId;
use crate::geometry::Point;

/// Index of a circle event in the queue's side table.
pub type CircleId = usize;

/// A predicted vertex event: `arc` disappears when the sweep line reaches `y`.
#[derive(Clone, Copy, Debug)]
pub struct CircleEvent {
    pub arc: ArcId,
    /// Center of the circle through the three sites, i.e. the future vertex.
    pub center: Point,
    /// Sweep coordinate at which the event fires (top of the circle).
    pub y: f64,
    valid: bool,
}

impl CircleEvent {
    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

/// An event popped from the queue.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// The sweep line reached the site with the given index.
    Site(usize),
    /// A still valid circle event.
    Circle(CircleId),
}

#[derive(Clone, Copy, Debug)]
struct Entry {
    y: f64,
    x: f64,
    event: Event,
    seq: u64,
}

impl Entry {
    /// Circle events come before site events at exactly the same point.
    fn rank(&self) -> u8 {
        match self.event {
            Event::Circle(_) => 0,
            Event::Site(_) => 1,
        }
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // Reversed so that the max-heap yields the smallest (y, x, rank, seq) first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .y
            .total_cmp(&self.y)
            .then_with(|| other.x.total_cmp(&self.x))
            .then_with(|| other.rank().cmp(&self.rank()))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Min-queue of sweep events ordered by `y`, then `x`, then kind, then insertion order.
#[derive(Default)]
pub struct EventQueue {
    heap: BinaryHeap<Entry>,
    circles: Vec<CircleEvent>,
    seq: u64,
    discarded: usize,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn push_entry(&mut self, y: f64, x: f64, event: Event) {
        let seq = self.seq;
        self.seq += 1;
        self.heap.push(Entry { y, x, event, seq });
    }

    /// Schedules the site with index `site` located at `pos`.
    pub fn push_site(&mut self, site: usize, pos: Point) {
        self.push_entry(pos.y, pos.x, Event::Site(site));
    }

    /// Schedules a circle event for `arc` and returns its handle.
    pub fn push_circle(&mut self, arc: ArcId, center: Point, y: f64) -> CircleId {
        let id = self.circles.len();
        self.circles.push(CircleEvent { arc, center, y, valid: true });
        self.push_entry(y, center.x, Event::Circle(id));
        id
    }

    /// Marks a circle event as stale. It stays in the heap until popped.
    pub fn invalidate(&mut self, id: CircleId) {
        if let Some(circle) = self.circles.get_mut(id) {
            circle.valid = false;
        }
    }

    pub fn circle(&self, id: CircleId) -> &CircleEvent {
        &self.circles[id]
    }

    /// Pops the smallest valid event, discarding invalidated circle events.
    pub fn pop(&mut self) -> Option<(Event, Point)> {
        while let Some(entry) = self.heap.pop() {
            if let Event::Circle(id) = entry.event {
                let circle = &mut self.circles[id];
                if !circle.valid {
                    self.discarded += 1;
                    continue;
                }
                // Popped events are consumed.
                circle.valid = false;
            }
            return Some((entry.event, Point::new(entry.x, entry.y)));
        }
        None
    }

    /// Number of stale circle events dropped so far.
    pub fn discarded(&self) -> usize {
        self.discarded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_by_y_then_x() {
        let mut q = EventQueue::new();
        q.push_site(0, Point::new(5.0, 2.0));
        q.push_site(1, Point::new(1.0, 3.0));
        q.push_site(2, Point::new(0.0, 2.0));
        q.push_site(3, Point::new(-4.0, 1.0));

        let order: Vec<_> = std::iter::from_fn(|| q.pop()).map(|(e, _)| e).collect();
        assert_eq!(order, vec![Event::Site(3), Event::Site(2), Event::Site(0), Event::Site(1)]);
    }

    #[test]
    fn test_circle_before_site_at_same_point() {
        let mut q = EventQueue::new();
        q.push_site(0, Point::new(1.0, 1.0));
        let c = q.push_circle(7, Point::new(1.0, 0.0), 1.0);
        assert_eq!(q.pop().map(|(e, _)| e), Some(Event::Circle(c)));
        assert_eq!(q.circle(c).arc, 7);
        assert_eq!(q.pop().map(|(e, _)| e), Some(Event::Site(0)));
        assert!(q.pop().is_none());
    }

    #[test]
    fn test_invalidated_circles_are_skipped() {
        let mut q = EventQueue::new();
        let a = q.push_circle(0, Point::new(0.0, 0.0), 1.0);
        let b = q.push_circle(1, Point::new(0.0, 0.0), 2.0);
        q.push_site(0, Point::new(0.0, 3.0));
        q.invalidate(a);

        assert_eq!(q.pop().map(|(e, _)| e), Some(Event::Circle(b)));
        assert_eq!(q.pop().map(|(e, _)| e), Some(Event::Site(0)));
        assert!(q.pop().is_none());
        assert_eq!(q.discarded(), 1);
        assert!(!q.circle(a).is_valid());
    }

    #[test]
    fn test_insertion_order_breaks_full_ties() {
        let mut q = EventQueue::new();
        let a = q.push_circle(0, Point::new(2.0, 0.0), 4.0);
        let b = q.push_circle(1, Point::new(2.0, 1.0), 4.0);
        assert_eq!(q.pop().map(|(e, _)| e), Some(Event::Circle(a)));
        assert_eq!(q.pop().map(|(e, _)| e), Some(Event::Circle(b)));
    }
}
