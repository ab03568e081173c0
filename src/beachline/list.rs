use std::cmp::Ordering;

use crate::beachline::{ArcId, Beachline};

#[derive(Clone, Copy, Default)]
struct Link {
    prev: Option<ArcId>,
    next: Option<ArcId>,
}

/// A doubly-linked arc sequence with a linear scan for [`Beachline::locate`].
///
/// O(n) per site event, but trivially correct; used as the reference the
/// balanced [`ArcTreap`](crate::ArcTreap) is checked against.
#[derive(Default, Clone)]
pub struct ArcList {
    links: Vec<Link>,
    head: Option<ArcId>,
    len: usize,
}

impl Beachline for ArcList {
    fn clear(&mut self) {
        self.links.clear();
        self.head = None;
        self.len = 0;
    }

    fn len(&self) -> usize {
        self.len
    }

    fn first(&self) -> Option<ArcId> {
        self.head
    }

    fn prev(&self, arc: ArcId) -> Option<ArcId> {
        self.links.get(arc).and_then(|l| l.prev)
    }

    fn next(&self, arc: ArcId) -> Option<ArcId> {
        self.links.get(arc).and_then(|l| l.next)
    }

    fn insert_after(&mut self, after: Option<ArcId>, arc: ArcId) {
        if arc >= self.links.len() {
            self.links.resize(arc + 1, Link::default());
        }
        let next = match after {
            Some(a) => self.links[a].next.replace(arc),
            None => self.head.replace(arc),
        };
        if let Some(n) = next {
            self.links[n].prev = Some(arc);
        }
        self.links[arc] = Link { prev: after, next };
        self.len += 1;
    }

    fn remove(&mut self, arc: ArcId) {
        let Link { prev, next } = self.links[arc];
        match prev {
            Some(p) => self.links[p].next = next,
            None => self.head = next,
        }
        if let Some(n) = next {
            self.links[n].prev = prev;
        }
        self.links[arc] = Link::default();
        self.len -= 1;
    }

    fn locate<F>(&self, mut cmp: F) -> Option<ArcId>
    where
        F: FnMut(ArcId) -> Ordering,
    {
        let mut current = self.head?;
        loop {
            if cmp(current) != Ordering::Greater {
                return Some(current);
            }
            match self.links[current].next {
                Some(n) => current = n,
                None => return Some(current),
            }
        }
    }
}
