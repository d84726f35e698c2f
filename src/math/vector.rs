use nalgebra::{Rotation3, Unit};

use crate::error::{GeometryError, Result};

use super::{Point3, Vector3, POINT_TOLERANCE, TOLERANCE};

/// Normalizes a vector to unit length.
///
/// # Errors
///
/// Returns [`GeometryError::ZeroVector`] if the vector's norm is below
/// [`TOLERANCE`]. A zero direction is never silently returned.
pub fn normalize(v: &Vector3) -> Result<Vector3> {
    let len = v.norm();
    if len < TOLERANCE {
        return Err(GeometryError::ZeroVector.into());
    }
    Ok(v / len)
}

/// Euclidean distance between two points.
#[must_use]
pub fn distance(a: &Point3, b: &Point3) -> f64 {
    (b - a).norm()
}

/// Returns whether two points coincide within [`POINT_TOLERANCE`].
#[must_use]
pub fn points_are_close(a: &Point3, b: &Point3) -> bool {
    distance(a, b) < POINT_TOLERANCE
}

/// Unsigned angle between two vectors, in degrees within [0, 180].
///
/// The cosine is clamped to [-1, 1] before the inverse cosine so that
/// floating-point overshoot on (anti)parallel inputs cannot produce NaN.
///
/// # Errors
///
/// Returns [`GeometryError::ZeroVector`] if either input is zero-length.
pub fn angle_between(a: &Vector3, b: &Vector3) -> Result<f64> {
    let ua = normalize(a)?;
    let ub = normalize(b)?;
    let cos = ua.dot(&ub).clamp(-1.0, 1.0);
    Ok(cos.acos().to_degrees())
}

/// Signed angle from `a` to `b` about `axis`, in degrees within (-180, 180].
///
/// Both vectors are projected onto the plane perpendicular to `axis` and
/// the angle is taken with `atan2`, so the rotation direction is
/// unambiguous: positive is counter-clockwise when viewed from the tip
/// of `axis`.
///
/// # Errors
///
/// Returns [`GeometryError::ZeroVector`] if any input is zero-length, or
/// [`GeometryError::Degenerate`] if either vector is parallel to the
/// axis (its projection vanishes, leaving no angle to measure).
pub fn signed_angle_between(a: &Vector3, b: &Vector3, axis: &Vector3) -> Result<f64> {
    let n = normalize(axis)?;
    if a.norm() < TOLERANCE || b.norm() < TOLERANCE {
        return Err(GeometryError::ZeroVector.into());
    }

    let pa = a - n * a.dot(&n);
    let pb = b - n * b.dot(&n);
    if pa.norm() < TOLERANCE || pb.norm() < TOLERANCE {
        return Err(GeometryError::Degenerate(
            "vector is parallel to the rotation axis".into(),
        )
        .into());
    }

    let sin = pa.cross(&pb).dot(&n);
    let cos = pa.dot(&pb);
    Ok(sin.atan2(cos).to_degrees())
}

/// Rotates `v` by `degrees` about `axis` (right-hand rule).
///
/// # Errors
///
/// Returns [`GeometryError::ZeroVector`] if the axis is zero-length.
pub fn rotate_about_axis(v: &Vector3, axis: &Vector3, degrees: f64) -> Result<Vector3> {
    let unit = Unit::new_normalize(normalize(axis)?);
    let rotation = Rotation3::from_axis_angle(&unit, degrees.to_radians());
    Ok(rotation * v)
}
