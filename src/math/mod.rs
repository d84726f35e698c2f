pub mod vector;

pub use vector::{
    angle_between, distance, normalize, points_are_close, rotate_about_axis,
    signed_angle_between,
};

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
///
/// Vectors with a norm below this are treated as zero-length.
pub const TOLERANCE: f64 = 1e-9;

/// Tolerance for treating two endpoints as the same node.
///
/// Sketch exports routinely place "touching" endpoints a few 1e-8 units
/// apart, so endpoint equality is snapped to this grid rather than
/// compared bit-for-bit.
pub const POINT_TOLERANCE: f64 = 1e-6;
