use crate::math::Point3;

slotmap::new_key_type! {
    /// Stable identity of an input element.
    ///
    /// Errors and output records reference elements by this id so the
    /// caller can map a failure back to the original selection.
    pub struct ElementId;
}

/// Kind of a path element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum ElementKind {
    /// A straight tube section (sketch line).
    Straight,
    /// A bend (sketch arc).
    Bend,
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Straight => write!(f, "straight"),
            Self::Bend => write!(f, "bend"),
        }
    }
}

/// A single element of the tube centerline: a straight or a bend.
///
/// Endpoints are stored in the order the caller supplied them; traversal
/// orientation is resolved later by the path orderer.
#[derive(Debug, Clone, PartialEq)]
pub enum PathElement {
    /// A straight section between two points.
    Straight { start: Point3, end: Point3 },
    /// A circular bend between two points.
    ///
    /// `radius` is the centerline radius (CLR) of the arc and
    /// `arc_length` its length along the centerline; together they give
    /// the sweep angle needed to reconstruct tangents when the bend has
    /// no adjacent straight on one side.
    Bend {
        start: Point3,
        end: Point3,
        radius: f64,
        arc_length: f64,
    },
}

impl PathElement {
    /// Returns the kind of this element.
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Straight { .. } => ElementKind::Straight,
            Self::Bend { .. } => ElementKind::Bend,
        }
    }

    /// Returns both endpoints in supplied order.
    #[must_use]
    pub fn endpoints(&self) -> (Point3, Point3) {
        match self {
            Self::Straight { start, end } | Self::Bend { start, end, .. } => (*start, *end),
        }
    }
}

/// Arena owning all input elements for one calculation run.
///
/// The graph and ordered path reference elements by [`ElementId`]
/// instead of holding them directly, which keeps the adjacency structure
/// free of ownership cycles.
#[derive(Debug, Default)]
pub struct PathStore {
    elements: slotmap::SlotMap<ElementId, PathElement>,
}

impl PathStore {
    /// Creates a new, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an element and returns its id.
    pub fn insert(&mut self, element: PathElement) -> ElementId {
        self.elements.insert(element)
    }

    /// Returns the element for an id, if present.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&PathElement> {
        self.elements.get(id)
    }

    /// Number of elements in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterates over all `(id, element)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &PathElement)> {
        self.elements.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_and_endpoints() {
        let straight = PathElement::Straight {
            start: Point3::new(0.0, 0.0, 0.0),
            end: Point3::new(5.0, 0.0, 0.0),
        };
        assert_eq!(straight.kind(), ElementKind::Straight);
        assert_eq!(straight.endpoints().1, Point3::new(5.0, 0.0, 0.0));

        let bend = PathElement::Bend {
            start: Point3::new(5.0, 0.0, 0.0),
            end: Point3::new(8.0, 3.0, 0.0),
            radius: 3.0,
            arc_length: 4.7,
        };
        assert_eq!(bend.kind(), ElementKind::Bend);
    }

    #[test]
    fn store_assigns_distinct_ids() {
        let mut store = PathStore::new();
        let a = store.insert(PathElement::Straight {
            start: Point3::origin(),
            end: Point3::new(1.0, 0.0, 0.0),
        });
        let b = store.insert(PathElement::Straight {
            start: Point3::new(1.0, 0.0, 0.0),
            end: Point3::new(2.0, 0.0, 0.0),
        });
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
        assert!(store.get(a).is_some());
    }
}
