//! Three-dimensional k-d tree over field sample points.
//!
//! The tree is built once from an owned list of vertices and answers exact
//! nearest-neighbour queries afterwards. Nodes live in a flat arena and
//! refer to each other by index, so the whole structure is two `Vec`s.

use std::cmp::Ordering;
use std::io::{self, Write};

use crate::error::{Error, Result};
use crate::stack::NeighborStack;
use crate::vertex::{FieldVertex, Point};

/// One arena slot. Child and parent links are arena indices; the vertex
/// index points into the tree's vertex list.
#[derive(Clone, Copy, Debug)]
struct KdNode {
    depth: u32,
    vertex: u32,
    parent: Option<u32>,
    left: Option<u32>,
    right: Option<u32>,
}

impl KdNode {
    /// Split axis at this node: x, y and z cycle with depth.
    fn axis(&self) -> usize {
        (self.depth % 3) as usize
    }

    fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// Static k-d tree over `FieldVertex` samples.
///
/// Construction sorts each subtree along the cycling split axis and picks
/// the median, so the tree is balanced for any input order and two builds
/// from the same vertex list produce the same shape.
#[derive(Clone, Debug)]
pub struct KdTree<F> {
    nodes: Vec<KdNode>,
    vertices: Vec<FieldVertex<F>>,
    root: Option<u32>,
}

impl<F> KdTree<F> {
    /// Build a tree that takes ownership of `vertices`.
    ///
    /// An empty list yields an empty tree; queries against it return empty
    /// results. Vertices with a NaN coordinate are rejected because they
    /// cannot be ordered along any axis.
    pub fn build(vertices: Vec<FieldVertex<F>>) -> Result<KdTree<F>> {
        if vertices.iter().any(|vertex| vertex.point.has_nan()) {
            return Err(Error::InvalidArgument("sample coordinates must not be NaN"));
        }
        let mut nodes = Vec::with_capacity(vertices.len());
        let mut order: Vec<u32> = (0..vertices.len() as u32).collect();
        let root = build_recursive(&vertices, &mut order, &mut nodes, None, 0);
        log::info!("built k-d tree over {} sample points", vertices.len());
        Ok(KdTree { nodes, vertices, root })
    }

    /// Number of sample points in the tree.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// All sample points, in the order they were handed to [`build`](KdTree::build).
    pub fn vertices(&self) -> &[FieldVertex<F>] {
        &self.vertices
    }

    /// The vertex of the leaf reached by walking the splitting planes down
    /// from the root. This is the search's first guess, not necessarily the
    /// nearest sample: the true nearest can sit on the far side of a plane.
    pub fn nearest_leaf(&self, point: &Point) -> Option<&FieldVertex<F>> {
        self.descend(point)
            .map(|index| &self.vertices[self.nodes[index as usize].vertex as usize])
    }

    /// The `k` nearest sample points to `point`, sorted by ascending
    /// distance, together with their Euclidean distances.
    ///
    /// The search descends to the leaf whose cell contains `point`, then
    /// walks back up: every ancestor is a candidate, and whenever the
    /// sphere through the farthest retained candidate crosses an
    /// ancestor's splitting plane the subtree on the far side is scanned
    /// as well. Fewer than `k` entries come back when the tree holds fewer
    /// than `k` distinct points.
    pub fn nearest_k<'t>(&'t self, point: &Point, k: usize) -> Result<NeighborStack<'t, F>> {
        if k == 0 {
            return Err(Error::InvalidArgument("at least one neighbour must be requested"));
        }
        if point.has_nan() {
            return Err(Error::InvalidArgument("query coordinates must not be NaN"));
        }
        let mut stack = NeighborStack::new(k);
        if let Some(first_guess) = self.descend(point) {
            self.examine(first_guess, point, &mut stack);
            self.check_ancestors(first_guess, point, &mut stack);
        }
        Ok(stack)
    }

    /// The `k` nearest sample points by scanning every vertex.
    ///
    /// Same contract as [`nearest_k`](KdTree::nearest_k), without the tree
    /// traversal. O(n) per query; useful as a correctness reference and as
    /// a baseline when measuring the tree.
    pub fn nearest_k_linear<'t>(&'t self, point: &Point, k: usize) -> Result<NeighborStack<'t, F>> {
        if k == 0 {
            return Err(Error::InvalidArgument("at least one neighbour must be requested"));
        }
        if point.has_nan() {
            return Err(Error::InvalidArgument("query coordinates must not be NaN"));
        }
        let mut stack = NeighborStack::new(k);
        for vertex in &self.vertices {
            stack.examine(vertex, vertex.point.distance(point));
        }
        Ok(stack)
    }

    /// Write the tree's edges in Graphviz dot format, one `parent -> child`
    /// line per edge with points as node labels.
    pub fn write_dot<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "digraph G {{")?;
        for node in &self.nodes {
            if let Some(parent) = node.parent {
                let from = self.vertices[self.nodes[parent as usize].vertex as usize].point;
                let to = self.vertices[node.vertex as usize].point;
                writeln!(out, "\t\"{from}\" -> \"{to}\"")?;
            }
        }
        writeln!(out, "}}")
    }

    /// Walk from the root to the leaf whose cell contains `point`. A node
    /// with a single child hands the walk over to that child directly.
    fn descend(&self, point: &Point) -> Option<u32> {
        let mut current = self.root?;
        loop {
            let node = &self.nodes[current as usize];
            match (node.left, node.right) {
                (None, None) => return Some(current),
                (Some(only), None) | (None, Some(only)) => return Some(only),
                (Some(left), Some(right)) => {
                    let axis = node.axis();
                    let pivot = self.vertices[node.vertex as usize].point.axis(axis);
                    current = if point.axis(axis) < pivot { left } else { right };
                }
            }
        }
    }

    /// Offer the vertex at `index` to the stack.
    fn examine<'t>(&'t self, index: u32, point: &Point, stack: &mut NeighborStack<'t, F>) {
        let vertex = &self.vertices[self.nodes[index as usize].vertex as usize];
        stack.examine(vertex, vertex.point.distance(point));
    }

    /// Climb from `start` to the root. Each parent is offered to the stack,
    /// and when the current search sphere reaches across the parent's
    /// splitting plane the sibling subtree is scanned in full.
    fn check_ancestors<'t>(&'t self, start: u32, point: &Point, stack: &mut NeighborStack<'t, F>) {
        let mut current = start;
        while let Some(parent) = self.nodes[current as usize].parent {
            self.examine(parent, point, stack);
            let radius = stack.farthest_distance().unwrap_or(f64::INFINITY);
            let parent_node = &self.nodes[parent as usize];
            let axis = parent_node.axis();
            let plane = self.vertices[parent_node.vertex as usize].point.axis(axis);
            let along = point.axis(axis);
            if plane >= along - radius && plane <= along + radius {
                let sibling = if parent_node.left == Some(current) {
                    parent_node.right
                } else {
                    parent_node.left
                };
                if let Some(sibling) = sibling {
                    self.examine(sibling, point, stack);
                    self.scan_subtree(sibling, point, stack);
                }
            }
            current = parent;
        }
    }

    /// Offer every descendant of `index` to the stack, depth first. The
    /// node at `index` itself is the caller's responsibility.
    fn scan_subtree<'t>(&'t self, index: u32, point: &Point, stack: &mut NeighborStack<'t, F>) {
        let node = &self.nodes[index as usize];
        if let Some(left) = node.left {
            self.examine(left, point, stack);
            self.scan_subtree(left, point, stack);
        }
        if let Some(right) = node.right {
            self.examine(right, point, stack);
            self.scan_subtree(right, point, stack);
        }
    }
}

/// Recursive arena build. Sorts `order` along the depth's axis, places the
/// median at this node and hands the two remaining ranges to the children.
/// With an even count the right range is the larger one.
fn build_recursive<F>(
    vertices: &[FieldVertex<F>],
    order: &mut [u32],
    nodes: &mut Vec<KdNode>,
    parent: Option<u32>,
    depth: u32,
) -> Option<u32> {
    if order.is_empty() {
        return None;
    }
    let axis = (depth % 3) as usize;
    order.sort_unstable_by(|&a, &b| {
        let va = vertices[a as usize].point.axis(axis);
        let vb = vertices[b as usize].point.axis(axis);
        va.partial_cmp(&vb).unwrap_or(Ordering::Equal)
    });
    let median = (order.len() - 1) / 2;
    let index = nodes.len() as u32;
    nodes.push(KdNode {
        depth,
        vertex: order[median],
        parent,
        left: None,
        right: None,
    });
    let (below, rest) = order.split_at_mut(median);
    let above = &mut rest[1..];
    let left = build_recursive(vertices, below, nodes, Some(index), depth + 1);
    let right = build_recursive(vertices, above, nodes, Some(index), depth + 1);
    nodes[index as usize].left = left;
    nodes[index as usize].right = right;
    Some(index)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    fn vertices_from(points: &[(f64, f64, f64)]) -> Vec<FieldVertex<()>> {
        points
            .iter()
            .map(|&(x, y, z)| FieldVertex::new(Point::new(x, y, z), ()))
            .collect()
    }

    fn random_vertices(count: usize, seed: u64) -> Vec<FieldVertex<()>> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..count)
            .map(|_| {
                FieldVertex::new(
                    Point::new(
                        rng.gen_range(-100.0..100.0),
                        rng.gen_range(-100.0..100.0),
                        rng.gen_range(-100.0..100.0),
                    ),
                    (),
                )
            })
            .collect()
    }

    /// Plenty of tied coordinates on every axis.
    fn tied_fixture() -> Vec<FieldVertex<()>> {
        vertices_from(&[
            (5.0, 9.0, 10.0),
            (2.0, 6.0, 8.0),
            (14.0, 3.0, 7.0),
            (3.0, 4.0, 9.0),
            (4.0, 13.0, 5.0),
            (8.0, 2.0, 1.0),
            (7.0, 9.0, 6.0),
            (4.0, 1.0, 6.0),
            (2.0, 2.0, 10.0),
        ])
    }

    fn collect_subtree(tree: &KdTree<()>, index: u32, out: &mut Vec<u32>) {
        let node = &tree.nodes[index as usize];
        out.push(node.vertex);
        if let Some(left) = node.left {
            collect_subtree(tree, left, out);
        }
        if let Some(right) = node.right {
            collect_subtree(tree, right, out);
        }
    }

    /// With distinct coordinates the split is strict on both sides; with
    /// ties the sort may leave pivot-equal values on either side, so only
    /// the weak ordering holds.
    fn assert_partition(tree: &KdTree<()>, index: u32, strict: bool) {
        let node = &tree.nodes[index as usize];
        let axis = node.axis();
        let pivot = tree.vertices[node.vertex as usize].point.axis(axis);
        if let Some(left) = node.left {
            let mut below = Vec::new();
            collect_subtree(tree, left, &mut below);
            for vertex in below {
                let value = tree.vertices[vertex as usize].point.axis(axis);
                if strict {
                    assert!(value < pivot, "left value {value} not below pivot {pivot}");
                } else {
                    assert!(value <= pivot, "left value {value} above pivot {pivot}");
                }
            }
            assert_partition(tree, left, strict);
        }
        if let Some(right) = node.right {
            let mut above = Vec::new();
            collect_subtree(tree, right, &mut above);
            for vertex in above {
                let value = tree.vertices[vertex as usize].point.axis(axis);
                if strict {
                    assert!(value > pivot, "right value {value} not above pivot {pivot}");
                } else {
                    assert!(value >= pivot, "right value {value} below pivot {pivot}");
                }
            }
            assert_partition(tree, right, strict);
        }
    }

    #[test]
    fn every_vertex_appears_exactly_once() {
        let tree = KdTree::build(random_vertices(200, 7)).unwrap();
        let mut seen: Vec<u32> = tree.nodes.iter().map(|node| node.vertex).collect();
        seen.sort_unstable();
        let expected: Vec<u32> = (0..200).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn median_split_separates_axis_values() {
        let tree = KdTree::build(random_vertices(150, 11)).unwrap();
        assert_partition(&tree, tree.root.unwrap(), true);
    }

    #[test]
    fn tied_coordinates_partition_weakly() {
        let tree = KdTree::build(tied_fixture()).unwrap();
        assert_partition(&tree, tree.root.unwrap(), false);
    }

    #[test]
    fn two_point_tree_keeps_left_empty() {
        let tree = KdTree::build(vertices_from(&[(1.0, 0.0, 0.0), (2.0, 0.0, 0.0)])).unwrap();
        let root = &tree.nodes[tree.root.unwrap() as usize];
        assert_eq!(tree.vertices[root.vertex as usize].point.x, 1.0);
        assert!(root.left.is_none());

        let right = &tree.nodes[root.right.unwrap() as usize];
        assert!(right.is_leaf());
        assert_eq!(right.depth, 1);
        assert_eq!(right.parent, tree.root);
        assert_eq!(tree.vertices[right.vertex as usize].point.x, 2.0);
    }

    #[test]
    fn parent_links_are_consistent() {
        let tree = KdTree::build(random_vertices(100, 3)).unwrap();
        for (index, node) in tree.nodes.iter().enumerate() {
            match node.parent {
                None => {
                    assert_eq!(Some(index as u32), tree.root);
                    assert_eq!(node.depth, 0);
                }
                Some(parent) => {
                    let parent_node = &tree.nodes[parent as usize];
                    assert_eq!(node.depth, parent_node.depth + 1);
                    assert!(
                        parent_node.left == Some(index as u32)
                            || parent_node.right == Some(index as u32)
                    );
                }
            }
        }
    }
}
