use thiserror::Error;

use crate::math::Point3;
use crate::path::{ElementId, ElementKind};
use crate::units::UnitSystem;

/// Top-level error type for the Mandrel calculation kernel.
#[derive(Debug, Error)]
pub enum MandrelError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Structure(#[from] StructureError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("zero-length vector")]
    ZeroVector,

    #[error("degenerate geometry: {0}")]
    Degenerate(String),
}

/// Errors raised while analyzing the connectivity of the input elements.
///
/// Each variant names the specific way the selection fails to form a
/// single open path, so the caller can tell the user what to fix in the
/// sketch rather than showing a generic failure.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("need at least 2 connected elements to form a bend path, got {count}")]
    TooFewElements { count: usize },

    #[error(
        "branch point at ({x:.4}, {y:.4}, {z:.4}): {degree} elements meet here, \
         a tube path allows at most 2",
        x = .at.x, y = .at.y, z = .at.z
    )]
    Branching { at: Point3, degree: usize },

    #[error("elements form a closed loop; a tube path must have two open ends")]
    ClosedLoop,

    #[error(
        "elements form {endpoint_count} open ends instead of 2; \
         the selection contains disconnected sub-paths"
    )]
    DisjointPaths { endpoint_count: usize },
}

/// Errors raised while validating the ordered path structure.
#[derive(Debug, Error)]
pub enum StructureError {
    #[error("a bend path needs at least 2 elements, got {count}")]
    TooFewElements { count: usize },

    #[error(
        "two consecutive {found} elements at position {position}: \
         expected a {expected} here; straights and bends must alternate"
    )]
    ConsecutiveKind {
        /// The element that broke the alternation.
        element: ElementId,
        /// Zero-based position of the offending element in the ordered path.
        position: usize,
        expected: ElementKind,
        found: ElementKind,
    },
}

/// Errors raised while validating die/sheet configuration, before any
/// geometry work begins.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("die CLR must be positive, got {0}")]
    NonPositiveClr(f64),

    #[error("die offset must be non-negative, got {0}")]
    NegativeDieOffset(f64),

    #[error("extra grip material must be non-negative, got {0}")]
    NegativeExtraGrip(f64),

    #[error("minimum grip length must be non-negative, got {0}")]
    NegativeMinGrip(f64),

    #[error("minimum tail length must be non-negative, got {0}")]
    NegativeMinTail(f64),

    #[error("tube outside diameter must be non-negative, got {0}")]
    NegativeTubeOd(f64),

    #[error("precision {precision} is not valid for {system} units")]
    UnsupportedPrecision { precision: u32, system: UnitSystem },
}

/// Convenience type alias for results using [`MandrelError`].
pub type Result<T> = std::result::Result<T, MandrelError>;
