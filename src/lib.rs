pub mod calc;
pub mod error;
pub mod math;
pub mod path;
pub mod units;

pub use calc::{BendData, BendSheet, BendSheetCalc, DieSpec, MarkPosition, PathSegment, SheetParams};
pub use error::{MandrelError, Result};
pub use path::{ElementId, PathElement, PathStore};
pub use units::UnitConfig;
