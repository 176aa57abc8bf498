//! # fieldtree
//!
//! `fieldtree` is a Rust library for interpolating vector fields from
//! scattered 3D sample points, designed to be used in Rust as well as
//! compiled to WebAssembly (WASM). It builds a k-d tree over the samples and
//! evaluates the field anywhere with exact nearest-neighbour search and
//! inverse-distance weighting.
//!
//! ## Features
//!
//! - **Exact k-NN**: Median-split k-d tree with a backtracking search that
//!   never misses a closer sample.
//! - **Smooth Interpolation**: Modified Shepard weighting over the nearest
//!   samples, exact on the samples themselves.
//! - **Parallel Batches**: Evaluates many points at once with `rayon`.
//! - **WASM-first**: Built with `wasm-bindgen` for seamless integration with
//!   JavaScript and TypeScript.
//!
//! ## Example
//!
//! ```
//! use fieldtree::{FieldMap, FieldVertex, Point};
//!
//! let samples = vec![
//!     FieldVertex::new(Point::new(0.0, 0.0, 0.0), [0.0, 0.0, 1.0]),
//!     FieldVertex::new(Point::new(1.0, 0.0, 0.0), [0.0, 0.0, 2.0]),
//!     FieldVertex::new(Point::new(0.0, 1.0, 0.0), [0.0, 0.0, 3.0]),
//! ];
//! let mut map = FieldMap::new(samples)?;
//! map.set_neighbours(3);
//!
//! let field = map.field_at(&Point::new(0.2, 0.2, 0.0))?;
//! assert!(field[2] >= 1.0 && field[2] <= 3.0);
//! # Ok::<(), fieldtree::Error>(())
//! ```
//!
//! See the `demos/` directory for Graphviz tree export and field plotting.
//!
//! ## Main Interface
//!
//! The primary entry point is the [`FieldMap`] struct, which owns the samples
//! and answers field and nearest-neighbour queries. The underlying
//! [`KdTree`] is usable on its own when only search is needed.

mod error;
mod map;
mod parse;
mod stack;
mod tree;
mod vertex;
pub mod wasm;

pub use error::Error;
pub use error::Result;
pub use map::DEFAULT_NEIGHBOURS;
pub use map::FieldCache;
pub use map::FieldMap;
pub use parse::parse_vertices;
pub use parse::read_vertices;
pub use stack::Neighbor;
pub use stack::NeighborStack;
pub use tree::KdTree;
pub use vertex::FieldVertex;
pub use vertex::Point;
