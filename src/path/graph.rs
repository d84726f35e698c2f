use std::collections::HashMap;

use slotmap::SecondaryMap;

use crate::error::{Result, TopologyError};
use crate::math::{points_are_close, Point3, POINT_TOLERANCE};

use super::element::{ElementId, PathStore};

/// Quantized endpoint key: coordinates snapped to the matching grid.
type GridKey = (i64, i64, i64);

fn quantize(p: &Point3) -> GridKey {
    #[allow(clippy::cast_possible_truncation)]
    let snap = |c: f64| (c / POINT_TOLERANCE).round() as i64;
    (snap(p.x), snap(p.y), snap(p.z))
}

#[derive(Debug)]
struct Node {
    point: Point3,
    key: GridKey,
    elements: Vec<ElementId>,
}

/// Adjacency structure over spatially-matched element endpoints.
///
/// Each distinct endpoint (two points within [`POINT_TOLERANCE`] are the
/// same node) maps to the set of elements touching it. Node degree then
/// classifies the topology: degree 1 is a path end, degree 2 an interior
/// joint, degree 3 or more a branch.
#[derive(Debug)]
pub struct ConnectivityGraph {
    nodes: Vec<Node>,
    cells: HashMap<GridKey, Vec<usize>>,
    incidence: SecondaryMap<ElementId, [usize; 2]>,
    ends: [usize; 2],
}

impl ConnectivityGraph {
    /// Builds the graph from all elements in the store and verifies that
    /// they form exactly one simple open path.
    ///
    /// # Errors
    ///
    /// Returns a [`TopologyError`] if there are fewer than two elements,
    /// any node has degree 3 or more (branching), no node has degree 1
    /// (closed loop), or more than two nodes have degree 1 (disjoint
    /// sub-paths). Malformed input is never silently repaired.
    pub fn build(store: &PathStore) -> Result<Self> {
        if store.len() < 2 {
            return Err(TopologyError::TooFewElements { count: store.len() }.into());
        }

        let mut graph = Self {
            nodes: Vec::with_capacity(store.len() + 1),
            cells: HashMap::new(),
            incidence: SecondaryMap::new(),
            ends: [0, 0],
        };

        for (id, element) in store.iter() {
            let (start, end) = element.endpoints();
            let a = graph.find_or_create_node(&start);
            let b = graph.find_or_create_node(&end);
            graph.nodes[a].elements.push(id);
            graph.nodes[b].elements.push(id);
            graph.incidence.insert(id, [a, b]);
        }

        let mut ends: Vec<usize> = Vec::new();
        for (idx, node) in graph.nodes.iter().enumerate() {
            match node.elements.len() {
                1 => ends.push(idx),
                2 => {}
                degree => {
                    return Err(TopologyError::Branching {
                        at: node.point,
                        degree,
                    }
                    .into());
                }
            }
        }

        match ends.len() {
            0 => Err(TopologyError::ClosedLoop.into()),
            2 => {
                // Deterministic traversal direction: start from the end
                // whose quantized coordinates compare smaller.
                let (a, b) = (ends[0], ends[1]);
                graph.ends = if graph.nodes[a].key <= graph.nodes[b].key {
                    [a, b]
                } else {
                    [b, a]
                };
                tracing::debug!(
                    nodes = graph.nodes.len(),
                    elements = store.len(),
                    "connectivity graph built"
                );
                Ok(graph)
            }
            endpoint_count => Err(TopologyError::DisjointPaths { endpoint_count }.into()),
        }
    }

    /// Snaps a point to an existing node within tolerance, or creates a
    /// new node.
    ///
    /// The 26 neighboring grid cells are probed as well, so two points
    /// within tolerance still match when they straddle a cell boundary.
    fn find_or_create_node(&mut self, p: &Point3) -> usize {
        let key = quantize(p);
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let probe = (key.0 + dx, key.1 + dy, key.2 + dz);
                    if let Some(indices) = self.cells.get(&probe) {
                        for &idx in indices {
                            if points_are_close(&self.nodes[idx].point, p) {
                                return idx;
                            }
                        }
                    }
                }
            }
        }

        let idx = self.nodes.len();
        self.nodes.push(Node {
            point: *p,
            key,
            elements: Vec::with_capacity(2),
        });
        self.cells.entry(key).or_default().push(idx);
        idx
    }

    /// The two degree-1 nodes, traversal start first.
    #[must_use]
    pub fn path_ends(&self) -> (usize, usize) {
        (self.ends[0], self.ends[1])
    }

    /// Snapped position of a node.
    #[must_use]
    pub fn node_point(&self, node: usize) -> &Point3 {
        &self.nodes[node].point
    }

    /// Elements incident to a node.
    #[must_use]
    pub fn elements_at(&self, node: usize) -> &[ElementId] {
        &self.nodes[node].elements
    }

    /// The two nodes an element spans.
    #[must_use]
    pub fn incidence(&self, id: ElementId) -> Option<[usize; 2]> {
        self.incidence.get(id).copied()
    }
}
