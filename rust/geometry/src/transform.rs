// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared vector and placement utilities
//!
//! Every frame in the engine is built from a primary axis (local Z) plus a
//! reference direction (local X) that must end up orthogonal to it. These
//! helpers keep that projection logic in one place.

use nalgebra::{Matrix4, Point3, Vector3};

/// Project `candidate` onto the plane perpendicular to `axis` and normalize.
///
/// Returns `None` when the candidate is (nearly) parallel to the axis.
#[inline]
pub fn project_orthogonal(
    candidate: &Vector3<f64>,
    axis: &Vector3<f64>,
    tolerance: f64,
) -> Option<Vector3<f64>> {
    let projected = candidate - axis * candidate.dot(axis);
    let length = projected.norm();
    if length > tolerance {
        Some(projected / length)
    } else {
        None
    }
}

/// Some unit vector perpendicular to `axis`
#[inline]
pub fn any_perpendicular(axis: &Vector3<f64>) -> Vector3<f64> {
    if axis.z.abs() < 0.9 {
        Vector3::z().cross(axis).normalize()
    } else {
        Vector3::x().cross(axis).normalize()
    }
}

/// Reference direction for `axis`, preferring `candidate` when usable
#[inline]
pub fn orthogonal_reference(
    candidate: &Vector3<f64>,
    axis: &Vector3<f64>,
    tolerance: f64,
) -> Vector3<f64> {
    project_orthogonal(candidate, axis, tolerance).unwrap_or_else(|| any_perpendicular(axis))
}

/// Local-to-parent transform for a placement.
///
/// Columns of the rotation block are the world-space local axes:
/// X = reference, Y = Z × X, Z = axis.
pub fn placement_matrix(
    origin: &Point3<f64>,
    axis: &Vector3<f64>,
    ref_direction: &Vector3<f64>,
) -> Matrix4<f64> {
    let z_axis = axis.normalize();
    let x_axis = orthogonal_reference(ref_direction, &z_axis, 1e-6);
    let y_axis = z_axis.cross(&x_axis).normalize();

    let mut transform = Matrix4::identity();
    transform[(0, 0)] = x_axis.x;
    transform[(1, 0)] = x_axis.y;
    transform[(2, 0)] = x_axis.z;
    transform[(0, 1)] = y_axis.x;
    transform[(1, 1)] = y_axis.y;
    transform[(2, 1)] = y_axis.z;
    transform[(0, 2)] = z_axis.x;
    transform[(1, 2)] = z_axis.y;
    transform[(2, 2)] = z_axis.z;
    transform[(0, 3)] = origin.x;
    transform[(1, 3)] = origin.y;
    transform[(2, 3)] = origin.z;

    transform
}
