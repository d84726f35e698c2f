use crate::error::{ConfigError, Result};
use crate::math::Point3;
use crate::path::{validate_alternation, ConnectivityGraph, OrderedPath, PathShape, PathStore};
use crate::units::UnitConfig;

use super::bend::{calculate_straights_and_bends, BendData, StraightSection};
use super::clr::{check_clr_consistency, ClrReport};
use super::segment::{build_segments_and_marks, MarkPosition, PathSegment};

/// The die mounted in the bender.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct DieSpec {
    /// Centerline radius the die bends to. Must be positive.
    pub clr: f64,
    /// Distance from the die's reference edge to the bend tangent
    /// point. Must be non-negative.
    pub offset: f64,
}

/// Caller-supplied parameters for one bend sheet.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SheetParams {
    pub die: DieSpec,
    /// Tube outside diameter, informational only.
    pub tube_od: f64,
    /// Extra grip material prepended to the cut length so the bender's
    /// clamp has something to hold.
    pub extra_grip: f64,
    /// Minimum feed length the bender can grip; straights before the
    /// last one shorter than this are reported as violations.
    pub min_grip: f64,
    /// Minimum material required after the last bend.
    pub min_tail: f64,
    /// Display formatting policy, passed through to the sheet.
    pub units: UnitConfig,
}

impl SheetParams {
    fn validate(&self) -> Result<()> {
        if self.die.clr <= 0.0 {
            return Err(ConfigError::NonPositiveClr(self.die.clr).into());
        }
        if self.die.offset < 0.0 {
            return Err(ConfigError::NegativeDieOffset(self.die.offset).into());
        }
        if self.extra_grip < 0.0 {
            return Err(ConfigError::NegativeExtraGrip(self.extra_grip).into());
        }
        if self.min_grip < 0.0 {
            return Err(ConfigError::NegativeMinGrip(self.min_grip).into());
        }
        if self.min_tail < 0.0 {
            return Err(ConfigError::NegativeMinTail(self.min_tail).into());
        }
        if self.tube_od < 0.0 {
            return Err(ConfigError::NegativeTubeOd(self.tube_od).into());
        }
        Ok(())
    }
}

/// Complete bend sheet data for the report renderer.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct BendSheet {
    pub shape: PathShape,
    pub clr: ClrReport,
    pub straights: Vec<StraightSection>,
    pub bends: Vec<BendData>,
    pub segments: Vec<PathSegment>,
    pub marks: Vec<MarkPosition>,
    /// First point of the ordered path.
    pub start_point: Point3,
    /// Last point of the ordered path.
    pub end_point: Point3,
    /// Dominant travel axis and sign, e.g. `+X`.
    pub travel_direction: String,
    pub die: DieSpec,
    pub tube_od: f64,
    pub extra_grip: f64,
    /// Sum of every straight and bend length along the centerline.
    pub total_centerline: f64,
    /// Centerline total plus extra grip: the length to cut.
    pub total_cut_length: f64,
    /// Straight numbers (all but the last) shorter than `min_grip`.
    pub grip_violations: Vec<usize>,
    /// Whether the last straight is shorter than `min_tail`.
    pub tail_violation: bool,
    pub units: UnitConfig,
}

/// Runs the full pipeline over a set of input elements: connectivity
/// graph, ordering, alternation validation, bend/rotation calculation,
/// CLR check, segment and mark tables, totals.
pub struct BendSheetCalc {
    params: SheetParams,
}

impl BendSheetCalc {
    /// Creates a new calculation with the given parameters.
    #[must_use]
    pub fn new(params: SheetParams) -> Self {
        Self { params }
    }

    /// Executes the calculation over the store's elements.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`](crate::error::ConfigError) before any
    /// geometry work if the parameters are invalid, a
    /// [`TopologyError`](crate::error::TopologyError) or
    /// [`StructureError`](crate::error::StructureError) if the elements
    /// do not form one alternating path, or a
    /// [`GeometryError`](crate::error::GeometryError) for zero-length
    /// sections.
    pub fn execute(&self, store: &PathStore) -> Result<BendSheet> {
        self.params.validate()?;

        let graph = ConnectivityGraph::build(store)?;
        let path = OrderedPath::order(&graph, store)?;
        let shape = validate_alternation(&path, store)?;

        let clr = check_clr_consistency(&path, store);
        let calc = calculate_straights_and_bends(&path, store, self.params.die.clr)?;
        let (segments, marks) = build_segments_and_marks(
            &calc,
            self.params.extra_grip,
            self.params.die.offset,
            shape.starts_with_bend,
        );

        let total_straights: f64 = calc.straights.iter().map(|s| s.length).sum();
        let total_arcs: f64 = calc.bends.iter().map(|b| b.arc_length).sum();
        let total_centerline = total_straights + total_arcs;
        let total_cut_length = total_centerline + self.params.extra_grip;

        let grip_violations = if self.params.min_grip > 0.0 && calc.straights.len() > 1 {
            calc.straights[..calc.straights.len() - 1]
                .iter()
                .filter(|s| s.length < self.params.min_grip)
                .map(|s| s.number)
                .collect()
        } else {
            Vec::new()
        };
        let tail_violation = self.params.min_tail > 0.0
            && calc
                .straights
                .last()
                .is_some_and(|s| s.length < self.params.min_tail);

        // Both exist for any path the graph accepts.
        let start_point = path.start_point().unwrap_or_else(Point3::origin);
        let end_point = path.end_point().unwrap_or_else(Point3::origin);

        tracing::debug!(
            bends = calc.bends.len(),
            total_cut_length,
            "bend sheet calculated"
        );
        Ok(BendSheet {
            shape,
            clr,
            straights: calc.straights,
            bends: calc.bends,
            segments,
            marks,
            start_point,
            end_point,
            travel_direction: travel_direction(&start_point, &end_point),
            die: self.params.die,
            tube_od: self.params.tube_od,
            extra_grip: self.params.extra_grip,
            total_centerline,
            total_cut_length,
            grip_violations,
            tail_violation,
            units: self.params.units.clone(),
        })
    }
}

/// Names the dominant axis of travel between two points, e.g. `+X`.
fn travel_direction(start: &Point3, end: &Point3) -> String {
    let d = end - start;
    let components = [(d.x, "X"), (d.y, "Y"), (d.z, "Z")];
    let (value, axis) = components
        .iter()
        .copied()
        .max_by(|(a, _), (b, _)| a.abs().total_cmp(&b.abs()))
        .unwrap_or((0.0, "X"));
    let sign = if value >= 0.0 { '+' } else { '-' };
    format!("{sign}{axis}")
}
