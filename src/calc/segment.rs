use super::bend::{BendCalculation, BendData};

/// Kind of a cumulative path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum SegmentKind {
    Straight,
    Bend,
}

/// One row of the cumulative segment table.
///
/// Distances run along the straightened (unrolled) tube from the cut
/// start, so they already include any extra grip material ahead of the
/// first real point.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PathSegment {
    pub kind: SegmentKind,
    /// Straight or bend sequential number, 1-based within its kind.
    pub number: usize,
    pub length: f64,
    /// Cumulative distance where this segment begins.
    pub starts_at: f64,
    /// Cumulative distance where this segment ends.
    pub ends_at: f64,
    /// Full bend data for bend segments.
    pub bend: Option<BendData>,
}

/// Where the fabricator marks the tube for one bend.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct MarkPosition {
    pub bend_number: usize,
    /// Distance from the cut start to the mark: the bend's cumulative
    /// start minus the die offset.
    pub position: f64,
    pub bend_angle: f64,
    pub rotation: Option<f64>,
}

/// Builds the cumulative segment table and per-bend mark positions.
///
/// Straights and bends are interleaved back into path order (bend-first
/// when the path starts with a bend). The cumulative distance starts at
/// `extra_grip`, since that material is physically ahead of the first
/// path point; every mark is then shifted back by `die_offset` because
/// the die edge, not the tube start, is the physical reference.
#[must_use]
pub fn build_segments_and_marks(
    calc: &BendCalculation,
    extra_grip: f64,
    die_offset: f64,
    starts_with_bend: bool,
) -> (Vec<PathSegment>, Vec<MarkPosition>) {
    let mut segments = Vec::with_capacity(calc.straights.len() + calc.bends.len());
    let mut cumulative = extra_grip;

    let mut straights = calc.straights.iter();
    let mut bends = calc.bends.iter();
    let mut bend_turn = starts_with_bend;
    loop {
        let appended = if bend_turn {
            bends.next().map(|bend| {
                let start = cumulative;
                cumulative += bend.arc_length;
                segments.push(PathSegment {
                    kind: SegmentKind::Bend,
                    number: bend.number,
                    length: bend.arc_length,
                    starts_at: start,
                    ends_at: cumulative,
                    bend: Some(bend.clone()),
                });
            })
        } else {
            straights.next().map(|straight| {
                let start = cumulative;
                cumulative += straight.length;
                segments.push(PathSegment {
                    kind: SegmentKind::Straight,
                    number: straight.number,
                    length: straight.length,
                    starts_at: start,
                    ends_at: cumulative,
                    bend: None,
                });
            })
        };
        if appended.is_none() && straights.as_slice().is_empty() && bends.as_slice().is_empty() {
            break;
        }
        bend_turn = !bend_turn;
    }

    let marks = segments
        .iter()
        .filter(|segment| segment.kind == SegmentKind::Bend)
        .filter_map(|segment| {
            segment.bend.as_ref().map(|bend| MarkPosition {
                bend_number: bend.number,
                position: segment.starts_at - die_offset,
                bend_angle: bend.angle,
                rotation: bend.rotation,
            })
        })
        .collect();

    (segments, marks)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::calc::bend::StraightSection;
    use crate::math::{Point3, Vector3};
    use crate::path::{ElementId, PathElement, PathStore};

    fn dummy_id(store: &mut PathStore) -> ElementId {
        store.insert(PathElement::Straight {
            start: Point3::origin(),
            end: Point3::new(1.0, 0.0, 0.0),
        })
    }

    fn straight(store: &mut PathStore, number: usize, length: f64) -> StraightSection {
        StraightSection {
            number,
            length,
            start: Point3::origin(),
            end: Point3::new(length, 0.0, 0.0),
            direction: Vector3::new(length, 0.0, 0.0),
            element: dummy_id(store),
        }
    }

    fn bend(
        store: &mut PathStore,
        number: usize,
        angle: f64,
        rotation: Option<f64>,
        arc_length: f64,
    ) -> BendData {
        BendData {
            number,
            angle,
            rotation,
            degenerate_plane: false,
            arc_length,
            element: dummy_id(store),
        }
    }

    #[test]
    fn single_bend_path_table() {
        let mut store = PathStore::new();
        let calc = BendCalculation {
            straights: vec![straight(&mut store, 1, 10.0), straight(&mut store, 2, 10.0)],
            bends: vec![bend(&mut store, 1, 45.0, None, 5.0)],
        };

        let (segments, marks) = build_segments_and_marks(&calc, 2.0, 0.5, false);

        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].kind, SegmentKind::Straight);
        assert_eq!(segments[1].kind, SegmentKind::Bend);
        assert_eq!(segments[2].kind, SegmentKind::Straight);

        // Cumulative positions start at the extra grip.
        assert_eq!(segments[0].starts_at, 2.0);
        assert_eq!(segments[0].ends_at, 12.0);
        assert_eq!(segments[1].starts_at, 12.0);
        assert_eq!(segments[1].ends_at, 17.0);
        assert_eq!(segments[2].ends_at, 27.0);

        assert_eq!(marks.len(), 1);
        assert_eq!(marks[0].bend_number, 1);
        assert_eq!(marks[0].position, 11.5);
        assert_eq!(marks[0].bend_angle, 45.0);
    }

    #[test]
    fn multi_bend_marks() {
        let mut store = PathStore::new();
        let calc = BendCalculation {
            straights: vec![
                straight(&mut store, 1, 10.0),
                straight(&mut store, 2, 8.0),
                straight(&mut store, 3, 12.0),
            ],
            bends: vec![
                bend(&mut store, 1, 45.0, None, 4.0),
                bend(&mut store, 2, 90.0, Some(30.0), 6.0),
            ],
        };

        let (segments, marks) = build_segments_and_marks(&calc, 0.0, 1.0, false);

        assert_eq!(segments.len(), 5);
        assert_eq!(marks.len(), 2);
        assert_eq!(marks[0].position, 9.0);
        assert_eq!(marks[1].position, 21.0);
        assert_eq!(marks[1].rotation, Some(30.0));
    }

    #[test]
    fn bend_first_path_interleaves_correctly() {
        let mut store = PathStore::new();
        let calc = BendCalculation {
            straights: vec![straight(&mut store, 1, 10.0)],
            bends: vec![bend(&mut store, 1, 90.0, None, 3.0)],
        };

        let (segments, marks) = build_segments_and_marks(&calc, 0.0, 0.0, true);

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].kind, SegmentKind::Bend);
        assert_eq!(segments[1].kind, SegmentKind::Straight);
        assert_eq!(marks[0].position, 0.0);
    }

    #[test]
    fn segments_connect_without_gaps() {
        let mut store = PathStore::new();
        let calc = BendCalculation {
            straights: vec![
                straight(&mut store, 1, 5.0),
                straight(&mut store, 2, 7.0),
                straight(&mut store, 3, 3.0),
            ],
            bends: vec![
                bend(&mut store, 1, 45.0, None, 2.0),
                bend(&mut store, 2, 90.0, Some(15.0), 4.0),
            ],
        };

        let (segments, _) = build_segments_and_marks(&calc, 1.0, 0.0, false);

        assert_eq!(segments.last().unwrap().ends_at, 22.0);
        for pair in segments.windows(2) {
            assert_eq!(pair[0].ends_at, pair[1].starts_at);
        }
    }

    #[test]
    fn no_bends_no_marks() {
        let mut store = PathStore::new();
        let calc = BendCalculation {
            straights: vec![straight(&mut store, 1, 10.0), straight(&mut store, 2, 4.0)],
            bends: vec![],
        };

        let (segments, marks) = build_segments_and_marks(&calc, 0.0, 0.0, false);
        assert_eq!(segments.len(), 2);
        assert!(marks.is_empty());
    }
}
