//! # vorotwo
//!
//! `vorotwo` is a Rust library for 2D Voronoi tessellations clipped to a rectangle,
//! designed to be used in Rust as well as compiled to WebAssembly (WASM). It builds the
//! diagram with Fortune's sweep line algorithm and closes every cell into a convex polygon.
//!
//! ## Features
//!
//! - **WASM-first**: Built with `wasm-bindgen` for seamless integration with JavaScript and TypeScript.
//! - **Sweep line**: O(n log n) construction over a balanced beachline, with a swappable [`Beachline`] strategy.
//! - **Closed cells**: Cells cut by the bounding box are closed with border edges, so the cells tile the box.
//! - **Lloyd relaxation**: Move generators to their cell centroids with [`Tessellation::relax`].
//!
//! ## Example
//!
//! ```
//! use vorotwo::{BoundingBox, Tessellation};
//!
//! let mut tess = Tessellation::new(BoundingBox::new([0.0, 0.0], [1000.0, 1000.0]));
//! tess.set_generators(&[500.0, 300.0, 500.0, 700.0]);
//! tess.calculate().unwrap();
//!
//! let lower = tess.get_cell(0).unwrap();
//! assert!((lower.area() - 500_000.0).abs() < 1e-6);
//! ```
//!
//! See `demos/svg.rs` for plotting a relaxed tessellation.
//!
//! ## Main Interface
//!
//! The primary entry point is the [`Tessellation`] struct, which manages the generators and the results.

mod assemble;
mod beachline;
mod bounds;
mod cell;
mod clip;
mod edge;
mod error;
mod event;
mod geometry;
mod sweep;
mod tessellation;
pub mod wasm;

pub use beachline::ArcId;
pub use beachline::ArcList;
pub use beachline::ArcTreap;
pub use beachline::Beachline;
pub use bounds::BoundingBox;
pub use bounds::BOX_ID_BOTTOM;
pub use bounds::BOX_ID_LEFT;
pub use bounds::BOX_ID_RIGHT;
pub use bounds::BOX_ID_TOP;
pub use bounds::EPSILON;
pub use bounds::box_side;
pub use cell::Cell2D;
pub use edge::Edge;
pub use edge::EdgeKind;
pub use error::Result;
pub use error::VoronoiError;
pub use geometry::Point;
pub use geometry::polygon_area;
pub use geometry::polygon_centroid;
pub use tessellation::Tessellation;
pub use tessellation::TessellationOptions;
