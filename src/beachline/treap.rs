use std::cmp::Ordering;

use rand::prelude::*;
use rand::rngs::StdRng;

use crate::beachline::{ArcId, Beachline};

// Fixed seed so that tree shapes, and thus floating point evaluation order, are reproducible.
const TREAP_SEED: u64 = 0x5eed_a4c5;

#[derive(Clone, Copy, Default)]
struct Node {
    left: Option<ArcId>,
    right: Option<ArcId>,
    parent: Option<ArcId>,
    // In-order thread for O(1) neighbor queries.
    prev: Option<ArcId>,
    next: Option<ArcId>,
    priority: u64,
}

/// A randomized balanced binary tree of arcs (treap).
///
/// The tree is ordered by position on the sweep line only; insertion happens
/// relative to an existing arc, so no key comparison is ever needed except in
/// [`Beachline::locate`]. Expected depth is O(log n).
#[derive(Clone)]
pub struct ArcTreap {
    nodes: Vec<Node>,
    root: Option<ArcId>,
    head: Option<ArcId>,
    len: usize,
    rng: StdRng,
}

impl Default for ArcTreap {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
            head: None,
            len: 0,
            rng: StdRng::seed_from_u64(TREAP_SEED),
        }
    }
}

impl ArcTreap {
    fn leftmost(&self, mut node: ArcId) -> ArcId {
        while let Some(l) = self.nodes[node].left {
            node = l;
        }
        node
    }

    fn attach_left(&mut self, parent: ArcId, child: ArcId) {
        self.nodes[parent].left = Some(child);
        self.nodes[child].parent = Some(parent);
    }

    fn attach_right(&mut self, parent: ArcId, child: ArcId) {
        self.nodes[parent].right = Some(child);
        self.nodes[child].parent = Some(parent);
    }

    fn replace_child(&mut self, parent: Option<ArcId>, old: ArcId, new: Option<ArcId>) {
        match parent {
            None => self.root = new,
            Some(p) => {
                if self.nodes[p].left == Some(old) {
                    self.nodes[p].left = new;
                } else {
                    self.nodes[p].right = new;
                }
            }
        }
        if let Some(n) = new {
            self.nodes[n].parent = parent;
        }
    }

    /// Rotates `x` above its parent, preserving in-order sequence.
    fn rotate_up(&mut self, x: ArcId) {
        let Some(p) = self.nodes[x].parent else {
            return;
        };
        let grandparent = self.nodes[p].parent;

        if self.nodes[p].left == Some(x) {
            let inner = self.nodes[x].right;
            self.nodes[p].left = inner;
            if let Some(b) = inner {
                self.nodes[b].parent = Some(p);
            }
            self.nodes[x].right = Some(p);
        } else {
            let inner = self.nodes[x].left;
            self.nodes[p].right = inner;
            if let Some(b) = inner {
                self.nodes[b].parent = Some(p);
            }
            self.nodes[x].left = Some(p);
        }
        self.nodes[p].parent = Some(x);
        self.replace_child(grandparent, p, Some(x));
    }

    /// Height of the tree, for balance checks.
    pub fn height(&self) -> usize {
        fn depth(nodes: &[Node], node: Option<ArcId>) -> usize {
            match node {
                None => 0,
                Some(n) => 1 + depth(nodes, nodes[n].left).max(depth(nodes, nodes[n].right)),
            }
        }
        depth(&self.nodes, self.root)
    }
}

impl Beachline for ArcTreap {
    fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.head = None;
        self.len = 0;
        self.rng = StdRng::seed_from_u64(TREAP_SEED);
    }

    fn len(&self) -> usize {
        self.len
    }

    fn first(&self) -> Option<ArcId> {
        self.head
    }

    fn prev(&self, arc: ArcId) -> Option<ArcId> {
        self.nodes.get(arc).and_then(|n| n.prev)
    }

    fn next(&self, arc: ArcId) -> Option<ArcId> {
        self.nodes.get(arc).and_then(|n| n.next)
    }

    fn insert_after(&mut self, after: Option<ArcId>, arc: ArcId) {
        if arc >= self.nodes.len() {
            self.nodes.resize(arc + 1, Node::default());
        }
        let priority = self.rng.r#gen::<u64>();
        self.nodes[arc] = Node { priority, ..Node::default() };

        // Thread into the in-order list.
        let next = match after {
            Some(a) => self.nodes[a].next.replace(arc),
            None => self.head.replace(arc),
        };
        if let Some(n) = next {
            self.nodes[n].prev = Some(arc);
        }
        self.nodes[arc].prev = after;
        self.nodes[arc].next = next;

        // Place as the in-order successor of `after` (or the new minimum).
        match after {
            Some(a) => match self.nodes[a].right {
                None => self.attach_right(a, arc),
                Some(r) => {
                    let m = self.leftmost(r);
                    self.attach_left(m, arc);
                }
            },
            None => match self.root {
                None => self.root = Some(arc),
                Some(r) => {
                    let m = self.leftmost(r);
                    self.attach_left(m, arc);
                }
            },
        }
        self.len += 1;

        // Restore heap order on priorities.
        while let Some(p) = self.nodes[arc].parent {
            if self.nodes[arc].priority <= self.nodes[p].priority {
                break;
            }
            self.rotate_up(arc);
        }
    }

    fn remove(&mut self, arc: ArcId) {
        // Rotate the node down until it has at most one child.
        while let (Some(l), Some(r)) = (self.nodes[arc].left, self.nodes[arc].right) {
            let child = if self.nodes[l].priority > self.nodes[r].priority { l } else { r };
            self.rotate_up(child);
        }
        let node = self.nodes[arc];
        self.replace_child(node.parent, arc, node.left.or(node.right));

        match node.prev {
            Some(p) => self.nodes[p].next = node.next,
            None => self.head = node.next,
        }
        if let Some(n) = node.next {
            self.nodes[n].prev = node.prev;
        }
        self.nodes[arc] = Node::default();
        self.len -= 1;
    }

    fn locate<F>(&self, mut cmp: F) -> Option<ArcId>
    where
        F: FnMut(ArcId) -> Ordering,
    {
        let mut node = self.root?;
        loop {
            let child = match cmp(node) {
                Ordering::Less => self.nodes[node].left,
                Ordering::Greater => self.nodes[node].right,
                Ordering::Equal => return Some(node),
            };
            match child {
                Some(c) => node = c,
                None => return Some(node),
            }
        }
    }
}
