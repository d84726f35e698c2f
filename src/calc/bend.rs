use crate::error::{GeometryError, Result};
use crate::math::{
    angle_between, normalize, rotate_about_axis, signed_angle_between, Point3, Vector3, TOLERANCE,
};
use crate::path::{ElementId, OrderedPath, OrientedElement, PathElement, PathStore};

/// A numbered straight section of the ordered path.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct StraightSection {
    /// Sequential number, 1-based.
    pub number: usize,
    pub length: f64,
    /// Entry endpoint, oriented along travel.
    pub start: Point3,
    /// Exit endpoint, oriented along travel.
    pub end: Point3,
    /// Displacement from `start` to `end` (not normalized).
    pub direction: Vector3,
    /// The originating input element.
    pub element: ElementId,
}

/// Per-bend result of the rotation calculation.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct BendData {
    /// Sequential number, 1-based.
    pub number: usize,
    /// Deflection of the tube direction at this bend, degrees in [0, 180].
    ///
    /// This is the "Bend Angle" stamped on the sheet, independent of
    /// rotation.
    pub angle: f64,
    /// Rotation to dial in before this bend, relative to the previous
    /// bend's plane, degrees in (-180, 180]. `None` for the first bend.
    ///
    /// Positive is counter-clockwise viewed from the grip end.
    pub rotation: Option<f64>,
    /// Set when this bend's plane normal is undefined (straight-through
    /// bend) or the rotation could not be measured against the previous
    /// plane. A flagged rotation of 0 is a placeholder, not a measured
    /// angle.
    pub degenerate_plane: bool,
    /// Centerline arc length fed through the die: `clr * angle` in
    /// radians.
    pub arc_length: f64,
    /// The originating input element.
    pub element: ElementId,
}

/// Straights and bends computed from a validated path.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct BendCalculation {
    pub straights: Vec<StraightSection>,
    pub bends: Vec<BendData>,
}

/// Computes straight sections and per-bend angle/rotation data from an
/// ordered, alternation-validated path.
///
/// Tangents come from the adjacent straights' endpoint geometry. For a
/// bend at either end of the path (no straight on one side) the missing
/// tangent is reconstructed from the arc's chord and sweep angle. Bend
/// arc lengths are computed against `clr`, the die's centerline radius.
///
/// Pure function of its inputs: no geometry is mutated and repeated runs
/// yield identical output.
///
/// # Errors
///
/// Returns [`GeometryError::Degenerate`] if a straight or an arc chord
/// has coincident endpoints (no direction can be derived), or if a
/// terminal bend's radius is not positive.
pub fn calculate_straights_and_bends(
    path: &OrderedPath,
    store: &PathStore,
    clr: f64,
) -> Result<BendCalculation> {
    let count = path.len();

    // Unit travel direction per path position, straights only.
    let mut unit_dirs: Vec<Option<Vector3>> = vec![None; count];
    let mut straights = Vec::new();
    for (position, oriented) in path.elements.iter().enumerate() {
        let Some(PathElement::Straight { .. }) = store.get(oriented.id) else {
            continue;
        };
        let direction = oriented.end - oriented.start;
        let length = direction.norm();
        if length < TOLERANCE {
            return Err(GeometryError::Degenerate(format!(
                "straight section {} has coincident endpoints",
                straights.len() + 1
            ))
            .into());
        }
        unit_dirs[position] = Some(direction / length);
        straights.push(StraightSection {
            number: straights.len() + 1,
            length,
            start: oriented.start,
            end: oriented.end,
            direction,
            element: oriented.id,
        });
    }

    let mut bends: Vec<BendData> = Vec::new();
    let mut carried_normal: Option<Vector3> = None;
    for (position, oriented) in path.elements.iter().enumerate() {
        let Some(&PathElement::Bend {
            radius, arc_length, ..
        }) = store.get(oriented.id)
        else {
            continue;
        };
        let number = bends.len() + 1;

        // Alternation guarantees the neighbors (where present) are
        // straights; a terminal bend reconstructs its missing tangent
        // from the arc itself.
        let before = position.checked_sub(1).and_then(|p| unit_dirs[p]);
        let after = unit_dirs.get(position + 1).copied().flatten();
        let (incoming, outgoing) = match (before, after) {
            (Some(inc), Some(out)) => (inc, out),
            (None, Some(out)) => (entry_tangent(oriented, radius, arc_length, &out)?, out),
            (Some(inc), None) => {
                let out = exit_tangent(oriented, radius, arc_length, &inc)?;
                (inc, out)
            }
            (None, None) => {
                // Unreachable for validated paths of 2+ elements.
                return Err(GeometryError::Degenerate(
                    "bend has no adjacent straight on either side".into(),
                )
                .into());
            }
        };

        let angle = angle_between(&incoming, &outgoing)?;
        let plane = incoming.cross(&outgoing);
        let own_normal = if plane.norm() < TOLERANCE {
            None
        } else {
            Some(plane / plane.norm())
        };
        let mut degenerate_plane = own_normal.is_none();

        let rotation = if number == 1 {
            None
        } else {
            // The shared straight entering this bend is the tube axis the
            // fabricator rotates about; measuring the normals around it
            // pins the rotation sign.
            match (carried_normal, own_normal) {
                (Some(prev), Some(cur)) => {
                    match signed_angle_between(&prev, &cur, &incoming) {
                        Ok(rotation) => Some(rotation),
                        Err(_) => {
                            degenerate_plane = true;
                            Some(0.0)
                        }
                    }
                }
                // Either plane undefined: report 0 with the flag set
                // rather than fabricating an angle.
                _ => {
                    degenerate_plane = true;
                    Some(0.0)
                }
            }
        };

        if let Some(normal) = own_normal {
            carried_normal = Some(normal);
        }

        tracing::debug!(number, angle, ?rotation, degenerate_plane, "bend calculated");
        bends.push(BendData {
            number,
            angle,
            rotation,
            degenerate_plane,
            arc_length: clr * angle.to_radians(),
            element: oriented.id,
        });
    }

    Ok(BendCalculation { straights, bends })
}

/// Reconstructs the entry tangent of a bend with no preceding straight.
///
/// The chord, the sweep angle `arc_length / radius`, and the known exit
/// tangent fix the arc in its plane; the entry tangent is the exit
/// tangent rotated back by the sweep about the plane normal.
fn entry_tangent(
    bend: &OrientedElement,
    radius: f64,
    arc_length: f64,
    outgoing: &Vector3,
) -> Result<Vector3> {
    let (chord, sweep) = chord_and_sweep(bend, radius, arc_length)?;
    let plane = chord.cross(outgoing);
    if plane.norm() < TOLERANCE {
        // Straight-through arc: the chord is the travel direction.
        return Ok(chord);
    }
    rotate_about_axis(outgoing, &plane, -sweep)
}

/// Reconstructs the exit tangent of a bend with no following straight.
fn exit_tangent(
    bend: &OrientedElement,
    radius: f64,
    arc_length: f64,
    incoming: &Vector3,
) -> Result<Vector3> {
    let (chord, sweep) = chord_and_sweep(bend, radius, arc_length)?;
    let plane = incoming.cross(&chord);
    if plane.norm() < TOLERANCE {
        return Ok(chord);
    }
    rotate_about_axis(incoming, &plane, sweep)
}

fn chord_and_sweep(bend: &OrientedElement, radius: f64, arc_length: f64) -> Result<(Vector3, f64)> {
    if radius < TOLERANCE {
        return Err(GeometryError::Degenerate(format!(
            "bend arc radius must be positive, got {radius}"
        ))
        .into());
    }
    let chord = normalize(&(bend.end - bend.start))?;
    Ok((chord, (arc_length / radius).to_degrees()))
}
