//! Field interpolation on top of the k-d tree.
//!
//! A [`FieldMap`] owns a tree of samples carrying a three-component field
//! vector and evaluates the field at arbitrary points by inverse-distance
//! weighting of the nearest samples.

use std::path::Path;

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::parse::read_vertices;
use crate::stack::NeighborStack;
use crate::tree::KdTree;
use crate::vertex::{FieldVertex, Point};

/// Number of neighbours blended per interpolation unless the caller
/// overrides it.
pub const DEFAULT_NEIGHBOURS: usize = 6;

/// Interpolated vector field over scattered sample points.
///
/// Samples carry a `[f64; 3]` payload, one value per field component.
/// Evaluation finds the nearest samples and blends their payloads with a
/// modified Shepard weighting, so the result follows the nearest sample
/// closely and ignores samples at the edge of the neighbourhood.
#[derive(Clone, Debug)]
pub struct FieldMap {
    tree: KdTree<[f64; 3]>,
    neighbours: usize,
}

impl FieldMap {
    /// Build a map from samples. At least one sample is required; there is
    /// nothing to interpolate towards in an empty map.
    pub fn new(vertices: Vec<FieldVertex<[f64; 3]>>) -> Result<FieldMap> {
        if vertices.is_empty() {
            return Err(Error::EmptyInput);
        }
        let tree = KdTree::build(vertices)?;
        log::info!(
            "field map ready: {} samples, {} interpolation neighbours",
            tree.len(),
            DEFAULT_NEIGHBOURS
        );
        Ok(FieldMap {
            tree,
            neighbours: DEFAULT_NEIGHBOURS,
        })
    }

    /// Build a map from a whitespace-separated `x y z bx by bz` text file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<FieldMap> {
        FieldMap::new(read_vertices(path)?)
    }

    /// Number of neighbours [`field_at`](FieldMap::field_at) blends.
    pub fn neighbours(&self) -> usize {
        self.neighbours
    }

    /// Change how many neighbours [`field_at`](FieldMap::field_at) blends.
    /// Requesting more neighbours than the map holds samples is fine; the
    /// blend then uses every sample.
    pub fn set_neighbours(&mut self, neighbours: usize) {
        self.neighbours = neighbours;
    }

    /// Number of samples in the map.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// The underlying search tree.
    pub fn tree(&self) -> &KdTree<[f64; 3]> {
        &self.tree
    }

    /// The `k` samples nearest to `point`, closest first.
    pub fn nearest_vertices(&self, point: &Point, k: usize) -> Result<NeighborStack<'_, [f64; 3]>> {
        self.tree.nearest_k(point, k)
    }

    /// The field at `point`, blended from the configured number of
    /// neighbours.
    pub fn field_at(&self, point: &Point) -> Result<[f64; 3]> {
        self.interpolate(point, self.neighbours)
    }

    /// The field at `point`, blended from the `neighbours` nearest samples.
    ///
    /// Weights follow the modified Shepard form
    /// `w = ((r - d) / (r * d))^2` with `r` the distance of the farthest
    /// retained neighbour, which therefore contributes nothing itself. A
    /// point that coincides with a sample returns that sample's field
    /// exactly, and when every retained neighbour sits at distance `r`
    /// (always the case for a single neighbour) their plain average is
    /// returned instead.
    pub fn interpolate(&self, point: &Point, neighbours: usize) -> Result<[f64; 3]> {
        let stack = self.tree.nearest_k(point, neighbours)?;
        let Some(&(_, radius)) = stack.back() else {
            return Err(Error::EmptyTree);
        };
        if let Some(&(nearest, distance)) = stack.front() {
            if distance == 0.0 {
                return Ok(nearest.field);
            }
        }

        let mut blended = [0.0_f64; 3];
        let mut total_weight = 0.0_f64;
        for &(vertex, distance) in stack.iter() {
            let weight = ((radius - distance) / (radius * distance)).powi(2);
            total_weight += weight;
            for (sum, component) in blended.iter_mut().zip(vertex.field) {
                *sum += weight * component;
            }
        }
        if total_weight == 0.0 {
            let count = stack.len() as f64;
            for &(vertex, _) in stack.iter() {
                for (sum, component) in blended.iter_mut().zip(vertex.field) {
                    *sum += component / count;
                }
            }
            return Ok(blended);
        }
        for component in blended.iter_mut() {
            *component /= total_weight;
        }
        Ok(blended)
    }

    /// [`field_at`](FieldMap::field_at) with a caller-owned memo of the
    /// previous evaluation. Repeated evaluation at the same point, common
    /// in stepped trajectory integration, skips the tree search.
    pub fn field_at_cached(&self, point: &Point, cache: &mut FieldCache) -> Result<[f64; 3]> {
        if let Some((cached_point, field)) = cache.last {
            if cached_point == *point {
                return Ok(field);
            }
        }
        let field = self.field_at(point)?;
        cache.last = Some((*point, field));
        Ok(field)
    }

    /// Evaluate the field at many points in parallel. The first error
    /// aborts the batch.
    pub fn field_at_many(&self, points: &[Point]) -> Result<Vec<[f64; 3]>> {
        points.par_iter().map(|point| self.field_at(point)).collect()
    }
}

/// Memo of the most recent [`FieldMap::field_at_cached`] evaluation.
///
/// Owned by the caller rather than the map, so concurrent evaluation paths
/// each carry their own and the map stays shareable across threads.
#[derive(Clone, Copy, Debug, Default)]
pub struct FieldCache {
    last: Option<(Point, [f64; 3])>,
}

impl FieldCache {
    pub fn new() -> FieldCache {
        FieldCache::default()
    }
}
