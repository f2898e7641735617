// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Local coordinate frames for linear members

use crate::config::GeometryConfig;
use crate::error::{Error, Result};
use crate::transform::{orthogonal_reference, placement_matrix};
use nalgebra::{Matrix4, Point3, Vector3};
use stbifc_core::ElementClass;

/// Origin plus orthonormal axis set.
///
/// For linear members `axis` runs from start to end. For planar members it is
/// the face normal. `up` always completes the right-handed set
/// (`up = axis × ref_direction`), which is global +Z for horizontal beams.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoordinateFrame {
    pub origin: Point3<f64>,
    pub axis: Vector3<f64>,
    pub ref_direction: Vector3<f64>,
    pub up: Vector3<f64>,
}

impl CoordinateFrame {
    /// Frame aligned with the global axes
    pub fn canonical(origin: Point3<f64>) -> Self {
        Self {
            origin,
            axis: Vector3::z(),
            ref_direction: Vector3::x(),
            up: Vector3::z().cross(&Vector3::x()),
        }
    }

    /// Unit axes, mutually orthogonal within `tolerance`
    pub fn is_orthonormal(&self, tolerance: f64) -> bool {
        (self.axis.norm() - 1.0).abs() < tolerance
            && (self.ref_direction.norm() - 1.0).abs() < tolerance
            && (self.up.norm() - 1.0).abs() < tolerance
            && self.axis.dot(&self.ref_direction).abs() < tolerance
            && self.axis.dot(&self.up).abs() < tolerance
            && self.ref_direction.dot(&self.up).abs() < tolerance
    }

    /// Local-to-world transform (local Z = axis, local X = reference)
    pub fn to_matrix(&self) -> Matrix4<f64> {
        placement_matrix(&self.origin, &self.axis, &self.ref_direction)
    }
}

/// Derives frames for beams, columns and braces from their endpoints
#[derive(Debug, Clone)]
pub struct CoordinateFrameBuilder {
    tolerance: f64,
    vertical_threshold: f64,
}

impl Default for CoordinateFrameBuilder {
    fn default() -> Self {
        Self::new(&GeometryConfig::default())
    }
}

impl CoordinateFrameBuilder {
    pub fn new(config: &GeometryConfig) -> Self {
        Self {
            tolerance: config.tolerance,
            vertical_threshold: config.vertical_threshold,
        }
    }

    /// Build the frame of a linear member. The origin is the start point.
    pub fn build(
        &self,
        start: &Point3<f64>,
        end: &Point3<f64>,
        class: ElementClass,
    ) -> Result<CoordinateFrame> {
        if !class.is_linear() {
            return Err(Error::geometry(
                class,
                "linear member frame requested for a planar element",
            ));
        }

        let delta = end - start;
        let length = delta.norm();
        if !length.is_finite() || length < self.tolerance {
            return Err(Error::geometry(
                class,
                format!("zero-length member (length {:.3e})", length),
            ));
        }

        let axis = delta / length;
        let ref_direction = self.reference_direction(&axis, class);
        let up = axis.cross(&ref_direction).normalize();

        Ok(CoordinateFrame {
            origin: *start,
            axis,
            ref_direction,
            up,
        })
    }

    fn reference_direction(&self, axis: &Vector3<f64>, class: ElementClass) -> Vector3<f64> {
        let vertical = match class {
            ElementClass::Column => axis.z.abs() > self.vertical_threshold,
            _ => axis.x.abs() < self.tolerance && axis.y.abs() < self.tolerance,
        };

        if vertical {
            // Global X, made exactly orthogonal for slightly out-of-plumb members
            return orthogonal_reference(&Vector3::x(), axis, self.tolerance);
        }

        // Horizontal quarter turn keeps the member's up side towards +Z
        let horizontal = Vector3::new(-axis.y, axis.x, 0.0);
        let length = horizontal.norm();
        if length > self.tolerance {
            horizontal / length
        } else {
            orthogonal_reference(&Vector3::x(), axis, self.tolerance)
        }
    }
}
