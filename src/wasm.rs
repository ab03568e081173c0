use crate::bounds::BoundingBox;
use crate::cell::Cell2D;
use crate::edge::EdgeKind;
use crate::tessellation::{Tessellation, TessellationOptions};
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen_rayon::init_thread_pool;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn init_threads(n: usize) -> js_sys::Promise {
    init_thread_pool(n)
}

#[wasm_bindgen(typescript_custom_section)]
const TS_CONSTANTS_BOUNDS: &'static str = r#"
export const BOX_ID_LEFT = -1;
export const BOX_ID_RIGHT = -2;
export const BOX_ID_BOTTOM = -3;
export const BOX_ID_TOP = -4;
"#;

// --- Bounding Box ---

#[wasm_bindgen]
#[derive(Clone, Copy, Debug)]
pub struct BoundingBox2D {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

#[wasm_bindgen]
impl BoundingBox2D {
    #[wasm_bindgen(constructor)]
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> BoundingBox2D {
        BoundingBox2D { min_x, min_y, max_x, max_y }
    }
}

impl From<BoundingBox2D> for BoundingBox {
    fn from(b: BoundingBox2D) -> Self {
        Self { min: [b.min_x, b.min_y], max: [b.max_x, b.max_y] }
    }
}

// --- Cell Wrapper ---

#[wasm_bindgen(js_name = Cell2D)]
pub struct Cell2DWASM {
    inner: Cell2D,
}

#[wasm_bindgen(js_class = Cell2D)]
impl Cell2DWASM {
    #[wasm_bindgen(getter)]
    pub fn id(&self) -> usize { self.inner.id() }
    #[wasm_bindgen(getter)]
    pub fn site(&self) -> Vec<f64> { self.inner.site().to_vec() }
    #[wasm_bindgen(getter)]
    pub fn vertices(&self) -> Vec<f64> { self.inner.vertices().to_vec() }
    #[wasm_bindgen(getter)]
    pub fn edge_neighbors(&self) -> Vec<i32> { self.inner.edge_neighbors().to_vec() }
    pub fn area(&self) -> f64 { self.inner.area() }
    /// Empty for cells without polygon.
    pub fn centroid(&self) -> Vec<f64> { self.inner.centroid().map(|c| c.to_vec()).unwrap_or_default() }
    pub fn is_empty(&self) -> bool { self.inner.is_empty() }
    pub fn contains(&self, x: f64, y: f64) -> bool { self.inner.contains([x, y]) }
}

// --- Tessellation ---

#[wasm_bindgen(js_name = Tessellation2D)]
pub struct Tessellation2D {
    inner: Tessellation,
}

#[wasm_bindgen(js_class = Tessellation2D)]
impl Tessellation2D {
    #[wasm_bindgen(constructor)]
    pub fn new(bounds: BoundingBox2D, close_cells: bool) -> Tessellation2D {
        let options = TessellationOptions::default().with_close_cells(close_cells);
        Tessellation2D { inner: Tessellation::with_options(bounds.into(), options) }
    }
    pub fn set_generators(&mut self, generators: &[f64]) { self.inner.set_generators(generators); }
    pub fn set_generator(&mut self, index: usize, x: f64, y: f64) { self.inner.set_generator(index, x, y); }
    pub fn random_generators(&mut self, count: usize) { self.inner.random_generators(count); }
    pub fn calculate(&mut self) -> Result<(), JsError> { self.inner.calculate().map_err(JsError::from) }
    pub fn relax(&mut self) { self.inner.relax(); }
    #[wasm_bindgen(getter)]
    pub fn count_generators(&self) -> usize { self.inner.count_generators() }
    #[wasm_bindgen(getter)]
    pub fn count_cells(&self) -> usize { self.inner.count_cells() }
    #[wasm_bindgen(getter)]
    pub fn count_edges(&self) -> usize { self.inner.count_edges() }
    pub fn get_generator(&self, index: usize) -> Vec<f64> { self.inner.get_generator(index).map(|g| g.to_vec()).unwrap_or_default() }
    pub fn get_cell(&self, index: usize) -> Option<Cell2DWASM> { self.inner.get_cell(index).cloned().map(|inner| Cell2DWASM { inner }) }
    #[wasm_bindgen(getter)]
    pub fn generators(&self) -> Vec<f64> { self.inner.generators().to_vec() }
    #[wasm_bindgen(getter)]
    pub fn cells(&self) -> Vec<Cell2DWASM> { self.inner.cells().iter().cloned().map(|inner| Cell2DWASM { inner }).collect() }

    /// Edge endpoints as a flat array `[ax, ay, bx, by, ...]`.
    #[wasm_bindgen(getter)]
    pub fn edges(&self) -> Vec<f64> {
        self.inner.edges().iter().flat_map(|e| [e.va()[0], e.va()[1], e.vb()[0], e.vb()[1]]).collect()
    }

    /// Sites on each side of every edge as a flat array `[left, right, ...]`.
    /// For border edges `right` is the `BOX_ID_*` of the side.
    #[wasm_bindgen(getter)]
    pub fn edge_sites(&self) -> Vec<i32> {
        self.inner
            .edges()
            .iter()
            .flat_map(|e| {
                let right = match e.kind() {
                    EdgeKind::Natural { right } => right as i32,
                    EdgeKind::Border { side } => side,
                };
                [e.left() as i32, right]
            })
            .collect()
    }
}
