//! Browser bindings for the field map.
//!
//! Samples and query points cross the JS boundary as flat `f64` arrays to
//! avoid per-element conversion costs on large maps.

use crate::map::{FieldCache, FieldMap};
use crate::vertex::{FieldVertex, Point};
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen_rayon::init_thread_pool;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn init_threads(n: usize) -> js_sys::Promise {
    init_thread_pool(n)
}

/// WASM wrapper around [`FieldMap`], with a one-entry evaluation memo so
/// repeated lookups at the same point skip the tree search.
#[wasm_bindgen(js_name = FieldMap)]
pub struct FieldMapWASM {
    inner: FieldMap,
    cache: FieldCache,
}

#[wasm_bindgen(js_class = FieldMap)]
impl FieldMapWASM {
    /// Build a map from a flat array holding six values per sample:
    /// `x, y, z, bx, by, bz`.
    #[wasm_bindgen(constructor)]
    pub fn new(samples: &[f64]) -> Result<FieldMapWASM, JsValue> {
        if samples.len() % 6 != 0 {
            return Err(JsValue::from_str(
                "samples must hold 6 values per entry: x y z bx by bz",
            ));
        }
        let vertices: Vec<FieldVertex<[f64; 3]>> = samples
            .chunks_exact(6)
            .map(|chunk| {
                FieldVertex::new(
                    Point::new(chunk[0], chunk[1], chunk[2]),
                    [chunk[3], chunk[4], chunk[5]],
                )
            })
            .collect();
        let inner = FieldMap::new(vertices).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(FieldMapWASM {
            inner,
            cache: FieldCache::new(),
        })
    }

    /// Interpolated field `[bx, by, bz]` at one point.
    pub fn field_at(&mut self, x: f64, y: f64, z: f64) -> Result<Vec<f64>, JsValue> {
        let field = self
            .inner
            .field_at_cached(&Point::new(x, y, z), &mut self.cache)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(field.to_vec())
    }

    /// Interpolated fields for a flat `x, y, z, ...` array of points,
    /// evaluated in parallel. Returns a flat `bx, by, bz, ...` array in
    /// the same order.
    pub fn field_at_points(&self, points: &[f64]) -> Result<Vec<f64>, JsValue> {
        if points.len() % 3 != 0 {
            return Err(JsValue::from_str(
                "points must hold 3 values per entry: x y z",
            ));
        }
        let queries: Vec<Point> = points
            .chunks_exact(3)
            .map(|chunk| Point::new(chunk[0], chunk[1], chunk[2]))
            .collect();
        let fields = self
            .inner
            .field_at_many(&queries)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(fields.into_iter().flatten().collect())
    }

    /// The `k` samples nearest to a point, closest first, as a flat array
    /// of `x, y, z, distance` quads.
    pub fn nearest(&self, x: f64, y: f64, z: f64, k: usize) -> Result<Vec<f64>, JsValue> {
        let stack = self
            .inner
            .nearest_vertices(&Point::new(x, y, z), k)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let mut quads = Vec::with_capacity(stack.len() * 4);
        for &(vertex, distance) in stack.iter() {
            quads.push(vertex.point.x);
            quads.push(vertex.point.y);
            quads.push(vertex.point.z);
            quads.push(distance);
        }
        Ok(quads)
    }

    #[wasm_bindgen(getter)]
    pub fn count_samples(&self) -> usize {
        self.inner.len()
    }

    #[wasm_bindgen(getter)]
    pub fn neighbours(&self) -> usize {
        self.inner.neighbours()
    }

    pub fn set_neighbours(&mut self, neighbours: usize) {
        self.inner.set_neighbours(neighbours);
    }
}
