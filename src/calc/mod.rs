pub mod bend;
pub mod clr;
pub mod segment;
pub mod sheet;

pub use bend::{calculate_straights_and_bends, BendCalculation, BendData, StraightSection};
pub use clr::{check_clr_consistency, ClrReport};
pub use segment::{build_segments_and_marks, MarkPosition, PathSegment, SegmentKind};
pub use sheet::{BendSheet, BendSheetCalc, DieSpec, SheetParams};
