use rand::prelude::*;
use rand::rngs::StdRng;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::assemble::{assemble_cells, incident_edges};
use crate::beachline::{ArcTreap, Beachline};
use crate::bounds::BoundingBox;
use crate::cell::Cell2D;
use crate::clip::clip_edges;
use crate::edge::Edge;
use crate::error::{Result, VoronoiError};
use crate::geometry::Point;
use crate::sweep::Sweep;

/// Settings of a [`Tessellation`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TessellationOptions {
    /// Close every cell into a polygon, adding border edges along the box.
    /// Without it the pipeline stops after clipping and cells only list
    /// their incident edges.
    pub close_cells: bool,
}

impl Default for TessellationOptions {
    fn default() -> Self {
        Self { close_cells: true }
    }
}

impl TessellationOptions {
    pub fn with_close_cells(mut self, close_cells: bool) -> Self {
        self.close_cells = close_cells;
        self
    }
}

/// The main container for computing 2D Voronoi tessellations with Fortune's sweep.
///
/// This struct manages:
/// - The **bounding box** the diagram is clipped to.
/// - The **generators** (sites) that define the Voronoi cells.
/// - The **beachline** strategy used by the sweep (a treap by default).
/// - The resulting **edges** and **cells**.
pub struct Tessellation<B: Beachline = ArcTreap> {
    bounds: BoundingBox,
    options: TessellationOptions,
    generators: Vec<f64>,
    edges: Vec<Edge>,
    cells: Vec<Cell2D>,
    beachline: B,
}

impl Tessellation<ArcTreap> {
    pub fn new(bounds: BoundingBox) -> Self {
        Self::with_options(bounds, TessellationOptions::default())
    }

    pub fn with_options(bounds: BoundingBox, options: TessellationOptions) -> Self {
        Self::with_beachline(bounds, options, ArcTreap::default())
    }
}

impl<B: Beachline> Tessellation<B> {
    pub fn with_beachline(bounds: BoundingBox, options: TessellationOptions, beachline: B) -> Self {
        Self {
            bounds,
            options,
            generators: Vec::new(),
            edges: Vec::new(),
            cells: Vec::new(),
            beachline,
        }
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    pub fn options(&self) -> TessellationOptions {
        self.options
    }

    pub fn set_options(&mut self, options: TessellationOptions) {
        self.options = options;
    }

    /// Replace all generators at once and drop any previous result.
    ///
    /// # Arguments
    /// * `generators` - A flat array of coordinates `[x, y, x, y, ...]`. A trailing odd value is ignored.
    pub fn set_generators(&mut self, generators: &[f64]) {
        let count = generators.len() / 2;
        self.generators = generators[..count * 2].to_vec();
        self.edges.clear();
        self.cells.clear();
    }

    /// Update the position of a single generator by index. Out of range indices are ignored.
    pub fn set_generator(&mut self, index: usize, x: f64, y: f64) {
        let offset = index * 2;
        if offset + 1 < self.generators.len() {
            self.generators[offset] = x;
            self.generators[offset + 1] = y;
        }
    }

    /// Generates uniformly distributed points within the bounds and sets them as generators.
    pub fn random_generators(&mut self, count: usize) {
        let mut rng = StdRng::seed_from_u64(get_seed());
        let w = self.bounds.width();
        let h = self.bounds.height();

        let mut points = Vec::with_capacity(count * 2);
        for _ in 0..count {
            points.push(self.bounds.min[0] + rng.r#gen::<f64>() * w);
            points.push(self.bounds.min[1] + rng.r#gen::<f64>() * h);
        }
        self.set_generators(&points);
    }

    pub fn generators(&self) -> &[f64] {
        &self.generators
    }

    pub fn get_generator(&self, index: usize) -> Option<[f64; 2]> {
        let offset = index * 2;
        self.generators.get(offset..offset + 2).map(|p| [p[0], p[1]])
    }

    pub fn count_generators(&self) -> usize {
        self.generators.len() / 2
    }

    /// All edges of the last calculation: clipped natural edges first, then
    /// the border edges of each closed cell in site order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn count_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn cells(&self) -> &[Cell2D] {
        &self.cells
    }

    pub fn get_cell(&self, index: usize) -> Option<&Cell2D> {
        self.cells.get(index)
    }

    pub fn count_cells(&self) -> usize {
        self.cells.len()
    }

    /// Computes the diagram of the current generators.
    ///
    /// Runs the sweep, clips the bisectors to the bounds and, with
    /// `close_cells`, assembles one cell per generator. On error nothing of
    /// the previous or the failed run is kept.
    pub fn calculate(&mut self) -> Result<()> {
        self.edges.clear();
        self.cells.clear();
        match self.compute() {
            Ok((edges, cells)) => {
                self.edges = edges;
                self.cells = cells;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "tessellation failed");
                Err(err)
            }
        }
    }

    fn compute(&mut self) -> Result<(Vec<Edge>, Vec<Cell2D>)> {
        self.bounds.validate()?;
        let eps = self.bounds.tolerance();
        let world = self.sites()?;
        if world.is_empty() {
            debug!("no generators, nothing to tessellate");
            return Ok((Vec::new(), Vec::new()));
        }

        // Work relative to the box corner, where the tolerance is meaningful.
        let origin = self.bounds.min;
        let local = self.bounds.local();
        let sites: Vec<Point> = world.iter().map(|p| Point::new(p.x - origin[0], p.y - origin[1])).collect();
        check_duplicates(&sites, eps)?;

        let (raw, stats) = Sweep::new(&sites, &mut self.beachline, eps).run()?;
        let mut edges = clip_edges(&raw, &local, eps);
        debug!(
            sites = sites.len(),
            site_events = stats.site_events,
            circle_events = stats.circle_events,
            raw_edges = raw.len(),
            clipped_edges = edges.len(),
            "diagram clipped"
        );

        let mut cells = if self.options.close_cells {
            assemble_cells(&sites, &mut edges, &local, eps)?
        } else {
            incident_edges(&edges, sites.len())
                .into_iter()
                .enumerate()
                .map(|(id, incident)| {
                    let mut cell = Cell2D::empty(id, sites[id].into());
                    cell.edges = incident;
                    cell
                })
                .collect()
        };

        let bounds = self.bounds;
        let to_world = |p: [f64; 2]| -> [f64; 2] {
            bounds.snap(Point::new(p[0] + origin[0], p[1] + origin[1]), eps).into()
        };
        edges.par_iter_mut().for_each(|edge| edge.map_points(to_world));
        cells
            .par_iter_mut()
            .zip(world.par_iter())
            .for_each(|(cell, site)| cell.relocate((*site).into(), origin, to_world));
        Ok((edges, cells))
    }

    fn sites(&self) -> Result<Vec<Point>> {
        self.generators
            .chunks_exact(2)
            .enumerate()
            .map(|(index, p)| {
                let site = Point::new(p[0], p[1]);
                if site.is_finite() {
                    Ok(site)
                } else {
                    Err(VoronoiError::InvalidSite { index, x: p[0], y: p[1] })
                }
            })
            .collect()
    }

    /// Performs one step of Lloyd's relaxation.
    ///
    /// This moves each generator to the centroid of its calculated Voronoi cell,
    /// which tends to make the cells more uniform in size and shape (centroidal Voronoi tessellation).
    /// Generators without a cell keep their position. Does nothing unless the
    /// last calculation closed the cells.
    pub fn relax(&mut self) {
        if !self.options.close_cells || self.cells.len() != self.count_generators() {
            return;
        }
        let new_generators: Vec<f64> = self
            .cells
            .par_iter()
            .zip(self.generators.par_chunks(2))
            .flat_map(|(cell, original_pos)| match cell.centroid() {
                Some(c) => c.to_vec(),
                None => original_pos.to_vec(),
            })
            .collect();

        self.set_generators(&new_generators);
    }
}

/// Rejects generators closer than `eps` to each other.
fn check_duplicates(sites: &[Point], eps: f64) -> Result<()> {
    let mut order: Vec<usize> = (0..sites.len()).collect();
    order.sort_by(|&a, &b| sites[a].y.total_cmp(&sites[b].y).then(sites[a].x.total_cmp(&sites[b].x)));

    for (k, &i) in order.iter().enumerate() {
        for &j in &order[k + 1..] {
            if sites[j].y - sites[i].y > eps {
                break;
            }
            if sites[i].approx_eq(sites[j], eps) {
                return Err(VoronoiError::DuplicateSite { first: i.min(j), second: i.max(j) });
            }
        }
    }
    Ok(())
}

fn get_seed() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        (js_sys::Math::random() * 4294967296.0) as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        123456789 // Fixed seed for tests
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beachline::ArcList;

    fn unit_box() -> BoundingBox {
        BoundingBox::new([0.0, 0.0], [1000.0, 1000.0])
    }

    #[test]
    fn test_generator_management() {
        let mut tess = Tessellation::new(unit_box());
        tess.set_generators(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(tess.count_generators(), 2);
        assert_eq!(tess.get_generator(1), Some([3.0, 4.0]));
        assert_eq!(tess.get_generator(2), None);

        tess.set_generator(0, 10.0, 20.0);
        tess.set_generator(7, 0.0, 0.0);
        assert_eq!(tess.generators(), &[10.0, 20.0, 3.0, 4.0]);
    }

    #[test]
    fn test_random_generators_inside_bounds() {
        let bounds = BoundingBox::new([-5.0, 10.0], [5.0, 12.0]);
        let mut tess = Tessellation::new(bounds);
        tess.random_generators(200);
        assert_eq!(tess.count_generators(), 200);
        for p in tess.generators().chunks(2) {
            assert!(bounds.contains([p[0], p[1]], 0.0));
        }
    }

    #[test]
    fn test_duplicates_are_rejected() {
        let mut tess = Tessellation::new(unit_box());
        tess.set_generators(&[100.0, 100.0, 500.0, 500.0, 100.0, 100.0 + 1e-9]);
        assert_eq!(tess.calculate(), Err(VoronoiError::DuplicateSite { first: 0, second: 2 }));
        assert_eq!(tess.count_cells(), 0);
        assert_eq!(tess.count_edges(), 0);
    }

    #[test]
    fn test_non_finite_generator() {
        let mut tess = Tessellation::new(unit_box());
        tess.set_generators(&[100.0, 100.0, f64::NAN, 5.0]);
        assert!(matches!(tess.calculate(), Err(VoronoiError::InvalidSite { index: 1, .. })));
    }

    #[test]
    fn test_failed_run_clears_previous_result() {
        let mut tess = Tessellation::new(unit_box());
        tess.set_generators(&[300.0, 300.0, 700.0, 700.0]);
        tess.calculate().unwrap();
        assert_eq!(tess.count_cells(), 2);

        tess.set_generator(1, 300.0, 300.0);
        assert!(tess.calculate().is_err());
        assert_eq!(tess.count_cells(), 0);
        assert!(tess.edges().is_empty());
    }

    #[test]
    fn test_open_cells_list_incident_edges() {
        let options = TessellationOptions::default().with_close_cells(false);
        let mut tess = Tessellation::with_options(unit_box(), options);
        tess.set_generators(&[500.0, 300.0, 500.0, 700.0]);
        tess.calculate().unwrap();

        assert_eq!(tess.count_edges(), 1);
        assert!(tess.edges().iter().all(|e| !e.is_border()));
        for cell in tess.cells() {
            assert!(cell.is_empty());
            assert_eq!(cell.centroid(), None);
            assert_eq!(cell.edges(), &[0]);
        }

        // Relaxation needs closed cells.
        tess.relax();
        assert_eq!(tess.generators(), &[500.0, 300.0, 500.0, 700.0]);
    }

    #[test]
    fn test_relax_moves_to_centroids() {
        let mut tess = Tessellation::new(unit_box());
        tess.set_generators(&[500.0, 100.0, 500.0, 700.0]);
        tess.calculate().unwrap();
        tess.relax();

        let g = tess.generators();
        // The bisector is at y = 400.
        assert!((g[0] - 500.0).abs() < 1e-9 && (g[1] - 200.0).abs() < 1e-9);
        assert!((g[2] - 500.0).abs() < 1e-9 && (g[3] - 700.0).abs() < 1e-9);
        assert_eq!(tess.count_cells(), 0);
    }

    #[test]
    fn test_beachline_strategies_agree() {
        let mut a = Tessellation::new(unit_box());
        let mut b = Tessellation::with_beachline(unit_box(), TessellationOptions::default(), ArcList::default());
        a.random_generators(300);
        b.set_generators(a.generators());
        a.calculate().unwrap();
        b.calculate().unwrap();
        assert_eq!(a.edges(), b.edges());
        assert_eq!(a.cells(), b.cells());
    }
}
