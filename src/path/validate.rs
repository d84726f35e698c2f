use crate::error::{Result, StructureError};

use super::element::{ElementKind, PathStore};
use super::order::OrderedPath;

/// How the validated path starts and ends.
///
/// A path may legitimately begin or end on a bend with no leading or
/// trailing straight; the bend calculator needs to know to reconstruct
/// the missing tangent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct PathShape {
    pub starts_with_bend: bool,
    pub ends_with_bend: bool,
}

/// Checks that the ordered path strictly alternates straights and bends.
///
/// This is the most common user mistake (two lines or two arcs drawn in
/// a row), so the error names the offending element and the kind that
/// was expected at its position.
///
/// # Errors
///
/// Returns [`StructureError::TooFewElements`] for paths shorter than two
/// elements, or [`StructureError::ConsecutiveKind`] when two consecutive
/// elements share a kind.
pub fn validate_alternation(path: &OrderedPath, store: &PathStore) -> Result<PathShape> {
    if path.len() < 2 {
        return Err(StructureError::TooFewElements { count: path.len() }.into());
    }

    let kind_of = |position: usize| -> ElementKind {
        store
            .get(path.elements[position].id)
            .map_or(ElementKind::Straight, super::element::PathElement::kind)
    };

    let first = kind_of(0);
    let mut previous = first;
    for position in 1..path.len() {
        let found = kind_of(position);
        if found == previous {
            let expected = match found {
                ElementKind::Straight => ElementKind::Bend,
                ElementKind::Bend => ElementKind::Straight,
            };
            return Err(StructureError::ConsecutiveKind {
                element: path.elements[position].id,
                position,
                expected,
                found,
            }
            .into());
        }
        previous = found;
    }

    Ok(PathShape {
        starts_with_bend: first == ElementKind::Bend,
        ends_with_bend: previous == ElementKind::Bend,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::MandrelError;
    use crate::math::Point3;
    use crate::path::element::PathElement;
    use crate::path::graph::ConnectivityGraph;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn chain(kinds: &[ElementKind]) -> (PathStore, OrderedPath) {
        let mut store = PathStore::new();
        for (i, kind) in kinds.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let (start, end) = (p(i as f64, 0.0, 0.0), p(i as f64 + 1.0, 0.0, 0.0));
            match kind {
                ElementKind::Straight => {
                    store.insert(PathElement::Straight { start, end });
                }
                ElementKind::Bend => {
                    store.insert(PathElement::Bend {
                        start,
                        end,
                        radius: 2.0,
                        arc_length: 1.0,
                    });
                }
            }
        }
        let graph = ConnectivityGraph::build(&store).unwrap();
        let path = OrderedPath::order(&graph, &store).unwrap();
        (store, path)
    }

    use ElementKind::{Bend, Straight};

    #[test]
    fn alternating_path_is_accepted() {
        let (store, path) = chain(&[Straight, Bend, Straight, Bend, Straight]);
        let shape = validate_alternation(&path, &store).unwrap();
        assert!(!shape.starts_with_bend);
        assert!(!shape.ends_with_bend);
    }

    #[test]
    fn shape_reflects_terminal_bends() {
        let (store, path) = chain(&[Bend, Straight, Bend]);
        let shape = validate_alternation(&path, &store).unwrap();
        assert!(shape.starts_with_bend);
        assert!(shape.ends_with_bend);
    }

    #[test]
    fn two_elements_is_minimum() {
        let (store, path) = chain(&[Straight, Bend]);
        assert!(validate_alternation(&path, &store).is_ok());
    }

    #[test]
    fn consecutive_straights_name_the_second_one() {
        let (store, path) = chain(&[Straight, Straight, Bend]);
        let err = validate_alternation(&path, &store).unwrap_err();
        match err {
            MandrelError::Structure(StructureError::ConsecutiveKind {
                element,
                position,
                expected,
                found,
            }) => {
                assert_eq!(element, path.elements[1].id);
                assert_eq!(position, 1);
                assert_eq!(expected, Bend);
                assert_eq!(found, Straight);
            }
            other => panic!("expected ConsecutiveKind, got {other:?}"),
        }
    }

    #[test]
    fn consecutive_bends_are_rejected() {
        let (store, path) = chain(&[Straight, Bend, Bend]);
        assert!(matches!(
            validate_alternation(&path, &store).unwrap_err(),
            MandrelError::Structure(StructureError::ConsecutiveKind { position: 2, .. })
        ));
    }
}
