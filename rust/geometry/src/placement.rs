// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Object placements
//!
//! A placement is the frame an element's solids are expressed in. Members
//! are placed at their midpoint, columns at their base, planar elements at
//! their center and openings relative to the host wall.

use crate::backend::PlacementHandle;
use crate::config::GeometryConfig;
use crate::frame::CoordinateFrame;
use crate::transform::{placement_matrix, project_orthogonal};
use nalgebra::{Matrix4, Point3, Vector3};
use std::f64::consts::FRAC_PI_2;

/// Final placement handed to the authoring backend
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlacementResult {
    pub origin: Point3<f64>,
    pub axis: Vector3<f64>,
    pub ref_direction: Vector3<f64>,
    /// Placement this one is relative to
    pub parent: Option<PlacementHandle>,
}

impl PlacementResult {
    /// Local-to-parent transform
    pub fn to_matrix(&self) -> Matrix4<f64> {
        placement_matrix(&self.origin, &self.axis, &self.ref_direction)
    }
}

/// Column reference rotation, honoring the orientation flag.
///
/// A column whose section is not given in the reference direction is turned
/// a further quarter turn.
#[inline]
pub fn effective_column_rotation(rotation_radians: f64, is_reference_direction: bool) -> f64 {
    if is_reference_direction {
        rotation_radians
    } else {
        rotation_radians + FRAC_PI_2
    }
}

/// Turns frames and reference points into placements
#[derive(Debug, Clone)]
pub struct PlacementCalculator {
    tolerance: f64,
}

impl Default for PlacementCalculator {
    fn default() -> Self {
        Self::new(&GeometryConfig::default())
    }
}

impl PlacementCalculator {
    pub fn new(config: &GeometryConfig) -> Self {
        Self {
            tolerance: config.tolerance,
        }
    }

    /// Beams, braces and haunch segments: placed at `midpoint`
    pub fn linear(&self, frame: &CoordinateFrame, midpoint: Point3<f64>) -> PlacementResult {
        PlacementResult {
            origin: midpoint,
            axis: frame.axis,
            ref_direction: frame.ref_direction,
            parent: None,
        }
    }

    /// Columns: placed at the base, reference turned by the column rotation
    pub fn column(
        &self,
        frame: &CoordinateFrame,
        rotation_radians: f64,
        is_reference_direction: bool,
    ) -> PlacementResult {
        let rotation = effective_column_rotation(rotation_radians, is_reference_direction);
        let candidate = Vector3::new(rotation.cos(), rotation.sin(), 0.0);
        // Inclined columns: keep the reference perpendicular to the axis
        let ref_direction = project_orthogonal(&candidate, &frame.axis, self.tolerance)
            .unwrap_or(frame.ref_direction);

        PlacementResult {
            origin: frame.origin,
            axis: frame.axis,
            ref_direction,
            parent: None,
        }
    }

    /// Walls, slabs, piles and footings: the frame as is
    pub fn planar(&self, frame: &CoordinateFrame) -> PlacementResult {
        PlacementResult {
            origin: frame.origin,
            axis: frame.axis,
            ref_direction: frame.ref_direction,
            parent: None,
        }
    }

    /// Openings: `center` in the host's local coordinates
    pub fn opening(&self, center: Point3<f64>, host: PlacementHandle) -> PlacementResult {
        PlacementResult {
            origin: center,
            axis: Vector3::z(),
            ref_direction: Vector3::x(),
            parent: Some(host),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::CoordinateFrameBuilder;
    use approx::assert_relative_eq;
    use stbifc_core::ElementClass;
    use std::f64::consts::PI;

    fn vertical_column_frame() -> CoordinateFrame {
        CoordinateFrameBuilder::default()
            .build(
                &Point3::new(0.0, 0.0, 0.0),
                &Point3::new(0.0, 0.0, 3000.0),
                ElementClass::Column,
            )
            .unwrap()
    }

    #[test]
    fn test_effective_rotation() {
        assert_eq!(effective_column_rotation(0.3, true), 0.3);
        assert!((effective_column_rotation(0.0, false) - PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_column_without_reference_direction_turns_quarter() {
        let placement = PlacementCalculator::default().column(&vertical_column_frame(), 0.0, false);
        assert_relative_eq!(placement.ref_direction, Vector3::y(), epsilon = 1e-12);
        assert_eq!(placement.origin, Point3::origin());
    }

    #[test]
    fn test_column_rotation() {
        let placement =
            PlacementCalculator::default().column(&vertical_column_frame(), PI / 4.0, true);
        let s = 0.5_f64.sqrt();
        assert_relative_eq!(placement.ref_direction, Vector3::new(s, s, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_inclined_column_reference_is_orthogonal() {
        let frame = CoordinateFrameBuilder::default()
            .build(
                &Point3::new(0.0, 0.0, 0.0),
                &Point3::new(1000.0, 0.0, 3000.0),
                ElementClass::Column,
            )
            .unwrap();
        let placement = PlacementCalculator::default().column(&frame, 0.0, true);
        assert!(placement.ref_direction.dot(&placement.axis).abs() < 1e-9);
        assert_relative_eq!(placement.ref_direction.norm(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_linear_uses_midpoint() {
        let frame = CoordinateFrameBuilder::default()
            .build(
                &Point3::new(0.0, 0.0, 0.0),
                &Point3::new(6000.0, 0.0, 0.0),
                ElementClass::Beam,
            )
            .unwrap();
        let placement = PlacementCalculator::default().linear(&frame, Point3::new(3000.0, 0.0, 0.0));
        assert_eq!(placement.origin, Point3::new(3000.0, 0.0, 0.0));
        assert_eq!(placement.axis, frame.axis);
        assert!(placement.parent.is_none());
    }

    #[test]
    fn test_opening_is_relative_to_host() {
        let host = PlacementHandle(7);
        let placement =
            PlacementCalculator::default().opening(Point3::new(-500.0, 500.0, 0.0), host);
        assert_eq!(placement.parent, Some(host));
        let world = placement.to_matrix().transform_point(&Point3::origin());
        assert_relative_eq!(world, Point3::new(-500.0, 500.0, 0.0), epsilon = 1e-12);
    }
}
