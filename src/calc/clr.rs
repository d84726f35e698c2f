use crate::path::{OrderedPath, PathElement, PathStore};

/// CLR mismatch tolerance as a ratio of the nominal CLR.
///
/// 0.2% absorbs CAD rounding and manufacturing slop while still
/// catching bends drawn against genuinely different dies.
const CLR_TOLERANCE_RATIO: f64 = 0.002;

/// Floor for the mismatch tolerance, so very small CLR values don't
/// produce false mismatches from the ratio alone.
const CLR_TOLERANCE_FLOOR: f64 = 0.001;

/// Result of checking bend radii against each other.
///
/// A mismatch is reported as data rather than an error: the sheet still
/// calculates, but the fabricator sees the warning before committing
/// stock.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ClrReport {
    /// The CLR the sheet is calculated against (first bend's radius, or
    /// 0 when the path has no bends).
    pub clr: f64,
    /// Whether any bend's radius deviates from the primary beyond
    /// tolerance, or the primary itself is non-positive.
    pub mismatch: bool,
    /// Every bend's radius, in path order.
    pub values: Vec<f64>,
}

/// Extracts the primary CLR from the path's bends and flags mismatched
/// radii.
#[must_use]
pub fn check_clr_consistency(path: &OrderedPath, store: &PathStore) -> ClrReport {
    let values: Vec<f64> = path
        .elements
        .iter()
        .filter_map(|oriented| match store.get(oriented.id) {
            Some(&PathElement::Bend { radius, .. }) => Some(radius),
            _ => None,
        })
        .collect();

    let Some(&clr) = values.first() else {
        return ClrReport {
            clr: 0.0,
            mismatch: false,
            values,
        };
    };

    if clr <= 0.0 {
        return ClrReport {
            clr: 0.0,
            mismatch: true,
            values,
        };
    }

    let tolerance = (clr * CLR_TOLERANCE_RATIO).max(CLR_TOLERANCE_FLOOR);
    let mismatch = values.iter().any(|&v| (v - clr).abs() > tolerance);
    ClrReport {
        clr,
        mismatch,
        values,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::path::{ConnectivityGraph, OrderedPath};

    fn path_with_radii(radii: &[f64]) -> (PathStore, OrderedPath) {
        let mut store = PathStore::new();
        let mut x = 0.0;
        for &radius in radii {
            store.insert(PathElement::Straight {
                start: Point3::new(x, 0.0, 0.0),
                end: Point3::new(x + 5.0, 0.0, 0.0),
            });
            store.insert(PathElement::Bend {
                start: Point3::new(x + 5.0, 0.0, 0.0),
                end: Point3::new(x + 6.0, 1.0, 0.0),
                radius,
                arc_length: radius,
            });
            store.insert(PathElement::Straight {
                start: Point3::new(x + 6.0, 1.0, 0.0),
                end: Point3::new(x + 10.0, 0.0, 0.0),
            });
            x += 10.0;
        }
        let graph = ConnectivityGraph::build(&store).unwrap();
        let path = OrderedPath::order(&graph, &store).unwrap();
        (store, path)
    }

    #[test]
    fn single_bend_sets_primary() {
        let (store, path) = path_with_radii(&[5.0]);
        let report = check_clr_consistency(&path, &store);
        assert_eq!(report.clr, 5.0);
        assert!(!report.mismatch);
        assert_eq!(report.values, vec![5.0]);
    }

    #[test]
    fn matching_radii_within_ratio_tolerance() {
        // 0.2% of 5.0 is 0.01; 5.005 is inside.
        let (store, path) = path_with_radii(&[5.0, 5.005]);
        assert!(!check_clr_consistency(&path, &store).mismatch);
    }

    #[test]
    fn mismatched_radii_are_flagged() {
        let (store, path) = path_with_radii(&[5.0, 5.1]);
        assert!(check_clr_consistency(&path, &store).mismatch);
    }

    #[test]
    fn zero_clr_is_a_mismatch() {
        let (store, path) = path_with_radii(&[0.0]);
        let report = check_clr_consistency(&path, &store);
        assert_eq!(report.clr, 0.0);
        assert!(report.mismatch);
    }

    #[test]
    fn tiny_clr_uses_tolerance_floor() {
        // Ratio tolerance would be 2e-5; the 0.001 floor lets 0.0105
        // through against 0.01.
        let (store, path) = path_with_radii(&[0.01, 0.0105]);
        assert!(!check_clr_consistency(&path, &store).mismatch);
    }
}
