use crate::bounds::{BoundingBox, box_side};
use crate::geometry::{Point, polygon_area};

/// A 2D Voronoi cell represented as a convex polygon.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell2D {
    pub(crate) id: usize,
    pub(crate) site: [f64; 2],
    // Flat array of vertices [x, y, x, y, ...], counter-clockwise
    pub(crate) vertices: Vec<f64>,
    // Neighbor ID for each edge. edge_neighbors[i] corresponds to edge starting at vertices[2*i]
    pub(crate) edge_neighbors: Vec<i32>,
    // Index into the tessellation's edge list, parallel to edge_neighbors
    pub(crate) edges: Vec<usize>,
    pub(crate) centroid: Option<[f64; 2]>,
}

impl Cell2D {
    /// The cell covering the whole bounding box, walled on all four sides.
    pub fn new(id: usize, site: [f64; 2], bounds: BoundingBox) -> Cell2D {
        let vertices = vec![
            bounds.min[0], bounds.min[1], // 0: Bottom-Left
            bounds.max[0], bounds.min[1], // 1: Bottom-Right
            bounds.max[0], bounds.max[1], // 2: Top-Right
            bounds.min[0], bounds.max[1], // 3: Top-Left
        ];

        let edge_neighbors = vec![
            box_side(1, false), // 0->1 (Bottom / Y-Min)
            box_side(0, true),  // 1->2 (Right / X-Max)
            box_side(1, true),  // 2->3 (Top / Y-Max)
            box_side(0, false), // 3->0 (Left / X-Min)
        ];

        Cell2D {
            id,
            site,
            vertices,
            edge_neighbors,
            edges: Vec::new(),
            centroid: Some(bounds.center()),
        }
    }

    /// A cell without polygon.
    pub(crate) fn empty(id: usize, site: [f64; 2]) -> Cell2D {
        Cell2D {
            id,
            site,
            vertices: Vec::new(),
            edge_neighbors: Vec::new(),
            edges: Vec::new(),
            centroid: None,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Position of the generator this cell belongs to.
    pub fn site(&self) -> [f64; 2] {
        self.site
    }

    pub fn vertices(&self) -> &[f64] {
        &self.vertices
    }

    pub fn points(&self) -> impl Iterator<Item = [f64; 2]> + '_ {
        self.vertices.chunks_exact(2).map(|v| [v[0], v[1]])
    }

    pub fn count_vertices(&self) -> usize {
        self.vertices.len() / 2
    }

    pub fn edge_neighbors(&self) -> &[i32] {
        &self.edge_neighbors
    }

    /// Indices into [`Tessellation::edges`](crate::Tessellation::edges) of the
    /// edges bounding this cell. Without closed cells these are the incident
    /// natural edges only.
    pub fn edges(&self) -> &[usize] {
        &self.edges
    }

    pub fn area(&self) -> f64 {
        polygon_area(&self.vertices)
    }

    /// Centroid of the polygon, `None` for empty cells.
    pub fn centroid(&self) -> Option<[f64; 2]> {
        self.centroid
    }

    /// Check if the cell has no polygon (outside the box, or cells were not closed).
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Moves the polygon to another frame: vertices through `to_world`, the
    /// centroid by `offset`. The site is replaced by `site`.
    pub(crate) fn relocate(&mut self, site: [f64; 2], offset: [f64; 2], to_world: impl Fn([f64; 2]) -> [f64; 2]) {
        self.site = site;
        for v in self.vertices.chunks_exact_mut(2) {
            let p = to_world([v[0], v[1]]);
            v[0] = p[0];
            v[1] = p[1];
        }
        if let Some(c) = self.centroid.as_mut() {
            c[0] += offset[0];
            c[1] += offset[1];
        }
    }

    /// Checks whether `point` lies inside or on the polygon.
    pub fn contains(&self, point: [f64; 2]) -> bool {
        let n = self.count_vertices();
        if n < 3 {
            return false;
        }
        let p = Point::from(point);
        let at = |i: usize| Point::new(self.vertices[(i % n) * 2], self.vertices[(i % n) * 2 + 1]);
        (0..n).all(|i| {
            let a = at(i);
            let b = at(i + 1);
            let edge = b - a;
            // Distance tolerance relative to the edge length.
            edge.cross(p - a) >= -1e-9 * edge.length_sq()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell2d_box() {
        let bounds = BoundingBox::new([0.0, 0.0], [1.0, 2.0]);
        let cell = Cell2D::new(0, [0.3, 0.3], bounds);

        assert!((cell.area() - 2.0).abs() < 1e-12);
        let c = cell.centroid().unwrap();
        assert!((c[0] - 0.5).abs() < 1e-12);
        assert!((c[1] - 1.0).abs() < 1e-12);
        assert_eq!(cell.count_vertices(), 4);
        assert_eq!(cell.edge_neighbors(), &[crate::BOX_ID_BOTTOM, crate::BOX_ID_RIGHT, crate::BOX_ID_TOP, crate::BOX_ID_LEFT]);
    }

    #[test]
    fn test_cell2d_contains() {
        let bounds = BoundingBox::new([0.0, 0.0], [10.0, 10.0]);
        let cell = Cell2D::new(0, [1.0, 1.0], bounds);
        assert!(cell.contains([5.0, 5.0]));
        assert!(cell.contains([0.0, 5.0]));
        assert!(cell.contains([10.0, 10.0]));
        assert!(!cell.contains([10.5, 5.0]));
        assert!(!cell.contains([5.0, -0.1]));
    }

    #[test]
    fn test_empty_cell() {
        let cell = Cell2D::empty(3, [1.0, 2.0]);
        assert!(cell.is_empty());
        assert_eq!(cell.area(), 0.0);
        assert_eq!(cell.centroid(), None);
        assert!(!cell.contains([1.0, 2.0]));
        assert_eq!(cell.points().count(), 0);
    }

    #[test]
    fn test_contains_in_a_tiny_cell() {
        let bounds = BoundingBox::new([0.0, 0.0], [1e-6, 1e-6]);
        let cell = Cell2D::new(0, [5e-7, 5e-7], bounds);
        assert!(cell.contains([5e-7, 5e-7]));
        assert!(cell.contains([0.0, 1e-6]));
        assert!(!cell.contains([1.1e-6, 5e-7]));
        assert!(!cell.contains([5e-7, -1e-8]));
    }

    #[test]
    fn test_relocate() {
        let bounds = BoundingBox::new([0.0, 0.0], [1.0, 2.0]);
        let mut cell = Cell2D::new(4, [0.5, 0.5], bounds);
        let offset = [10.0, 20.0];
        cell.relocate([10.5, 20.5], offset, |p| [p[0] + offset[0], p[1] + offset[1]]);
        assert_eq!(cell.site(), [10.5, 20.5]);
        assert_eq!(cell.vertices(), &[10.0, 20.0, 11.0, 20.0, 11.0, 22.0, 10.0, 22.0]);
        assert_eq!(cell.centroid(), Some([10.5, 21.0]));
        assert!((cell.area() - 2.0).abs() < 1e-12);
    }
}
