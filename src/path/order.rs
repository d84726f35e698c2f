use slotmap::SecondaryMap;

use crate::error::Result;
use crate::math::{distance, Point3};

use super::element::{ElementId, PathStore};
use super::graph::ConnectivityGraph;

/// An element oriented along the direction of travel.
///
/// `start`/`end` are the element's own endpoint coordinates (not the
/// snapped node positions), swapped if necessary so that `start` is the
/// endpoint entered first during traversal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedElement {
    pub id: ElementId,
    pub start: Point3,
    pub end: Point3,
}

/// The input elements arranged into a single traversal order.
///
/// Consecutive elements share an endpoint, no element repeats, and
/// `elements.len()` equals the number of input elements. Traversal runs
/// from the degree-1 node with the lexicographically smaller quantized
/// coordinates, so the direction is reproducible run-to-run.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedPath {
    pub elements: Vec<OrientedElement>,
}

impl OrderedPath {
    /// First point of the path.
    #[must_use]
    pub fn start_point(&self) -> Option<Point3> {
        self.elements.first().map(|e| e.start)
    }

    /// Last point of the path.
    #[must_use]
    pub fn end_point(&self) -> Option<Point3> {
        self.elements.last().map(|e| e.end)
    }

    /// Number of elements in the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns whether the path is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Orders the elements of a validated connectivity graph into a
    /// single path.
    ///
    /// Walks from the graph's start end, repeatedly consuming the unused
    /// element incident to the current node and advancing to its far
    /// endpoint, until the other end is reached.
    ///
    /// # Errors
    ///
    /// Currently infallible for graphs produced by
    /// [`ConnectivityGraph::build`]; the `Result` return keeps the
    /// signature uniform with the rest of the pipeline.
    ///
    /// # Panics
    ///
    /// Panics if the graph's adjacency invariants are violated (an
    /// interior node with no unused element). [`ConnectivityGraph::build`]
    /// guarantees this cannot happen, so hitting it is a kernel bug, not
    /// a user input error.
    pub fn order(graph: &ConnectivityGraph, store: &PathStore) -> Result<Self> {
        let (start, terminal) = graph.path_ends();
        let mut used: SecondaryMap<ElementId, ()> = SecondaryMap::new();
        let mut elements = Vec::with_capacity(store.len());
        let mut current = start;

        while elements.len() < store.len() {
            let Some(id) = graph
                .elements_at(current)
                .iter()
                .copied()
                .find(|id| !used.contains_key(*id))
            else {
                unreachable!("interior node without an unused element; graph invariants broken")
            };
            used.insert(id, ());

            let Some([a, b]) = graph.incidence(id) else {
                unreachable!("element missing from graph incidence; graph invariants broken")
            };
            let next = if a == current { b } else { a };

            // Orient the element's real endpoints along travel: the one
            // nearer the current node comes first.
            let Some(element) = store.get(id) else {
                unreachable!("ordered element missing from store")
            };
            let (p, q) = element.endpoints();
            let node = graph.node_point(current);
            let (start, end) = if distance(&p, node) <= distance(&q, node) {
                (p, q)
            } else {
                (q, p)
            };

            elements.push(OrientedElement { id, start, end });
            current = next;
        }

        debug_assert_eq!(current, terminal, "traversal must finish at the far end");
        tracing::debug!(elements = elements.len(), "path ordered");
        Ok(Self { elements })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::path::element::PathElement;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn build_path(points: &[(Point3, Point3)]) -> (PathStore, OrderedPath) {
        let mut store = PathStore::new();
        for &(start, end) in points {
            store.insert(PathElement::Straight { start, end });
        }
        let graph = ConnectivityGraph::build(&store).unwrap();
        let path = OrderedPath::order(&graph, &store).unwrap();
        (store, path)
    }

    #[test]
    fn orders_shuffled_elements() {
        // Inserted out of order: C, A, B along the x-axis.
        let (_store, path) = build_path(&[
            (p(2.0, 0.0, 0.0), p(3.0, 0.0, 0.0)),
            (p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)),
            (p(1.0, 0.0, 0.0), p(2.0, 0.0, 0.0)),
        ]);

        assert_eq!(path.len(), 3);
        assert_eq!(path.start_point().unwrap(), p(0.0, 0.0, 0.0));
        assert_eq!(path.end_point().unwrap(), p(3.0, 0.0, 0.0));
        for pair in path.elements.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn orients_flipped_endpoints() {
        // Middle element supplied end-to-start.
        let (_store, path) = build_path(&[
            (p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)),
            (p(2.0, 0.0, 0.0), p(1.0, 0.0, 0.0)),
            (p(2.0, 0.0, 0.0), p(3.0, 0.0, 0.0)),
        ]);

        assert_eq!(path.elements[1].start, p(1.0, 0.0, 0.0));
        assert_eq!(path.elements[1].end, p(2.0, 0.0, 0.0));
    }

    #[test]
    fn insertion_order_does_not_change_result() {
        let segs = [
            (p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)),
            (p(1.0, 0.0, 0.0), p(1.0, 2.0, 0.0)),
            (p(1.0, 2.0, 0.0), p(4.0, 2.0, 0.0)),
        ];
        let shuffled = [segs[2], segs[0], segs[1]];

        let (_, a) = build_path(&segs);
        let (_, b) = build_path(&shuffled);

        let points_a: Vec<_> = a.elements.iter().map(|e| (e.start, e.end)).collect();
        let points_b: Vec<_> = b.elements.iter().map(|e| (e.start, e.end)).collect();
        assert_eq!(points_a, points_b);
    }

    #[test]
    fn no_element_repeats() {
        let (_store, path) = build_path(&[
            (p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)),
            (p(1.0, 0.0, 0.0), p(2.0, 0.0, 0.0)),
            (p(2.0, 0.0, 0.0), p(2.0, 5.0, 0.0)),
            (p(2.0, 5.0, 0.0), p(0.0, 5.0, 0.0)),
        ]);

        let mut ids: Vec<_> = path.elements.iter().map(|e| e.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 4);
    }
}
