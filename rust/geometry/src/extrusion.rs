// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extrusion operations - turning profiles into solid representations
//!
//! Members are extruded along their local Z axis. Tapered members walk a
//! fallback chain (continuous sweep, sectioned spine, stepped taper, start
//! profile only) until the backend accepts a representation; every step
//! down is logged and kept on the [`GeometryResult`].

use crate::backend::{AuthoringBackend, ProfileHandle, Representation, SolidHandle, SolidPosition, Spine};
use crate::config::GeometryConfig;
use crate::error::{Error, Result};
use crate::frame::CoordinateFrame;
use crate::profile::{ProfileDescriptor, ProfileKey};
use crate::profiles::ProfileFactory;
use nalgebra::{Point3, Vector3};
use rustc_hash::FxHashMap;
use smallvec::{smallvec, SmallVec};
use stbifc_core::{ElementClass, SectionDescriptor};
use std::sync::Arc;

/// How the solid of a member was represented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum GeometryKind {
    Extrusion,
    TaperedSweep,
    SectionedSpine,
    SteppedTaper,
    /// Uniform extrusion of the start profile after every tapered form was declined
    FallbackExtrusion,
}

/// Where along its length a member's solid starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtrusionAnchor {
    /// Centered on the placement (beams, braces, haunch segments)
    Midpoint,
    /// Starting at the placement (columns)
    Base,
}

impl ExtrusionAnchor {
    #[inline]
    fn start_z(&self, length: f64) -> f64 {
        match self {
            Self::Midpoint => -length / 2.0,
            Self::Base => 0.0,
        }
    }
}

/// Solids built for one element
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryResult {
    pub kind: GeometryKind,
    pub solids: SmallVec<[SolidHandle; 1]>,
    pub frame: CoordinateFrame,
    pub depth: f64,
    /// Name of the (start) profile
    pub profile_name: String,
    /// Representation downgrades taken, in order
    pub downgrades: Vec<String>,
}

/// Builds extruded and swept solids through an authoring backend.
///
/// Profile handles are cached per structural key so a section used by many
/// members is only defined once per backend.
pub struct ExtrusionGeometryBuilder {
    config: GeometryConfig,
    profile_handles: FxHashMap<ProfileKey, ProfileHandle>,
}

impl ExtrusionGeometryBuilder {
    pub fn new(config: &GeometryConfig) -> Self {
        Self {
            config: config.clone(),
            profile_handles: FxHashMap::default(),
        }
    }

    /// Forget handles issued by a previous backend
    pub fn reset_handles(&mut self) {
        self.profile_handles.clear();
    }

    /// Backend handle for `profile`, defined on first use
    pub fn profile_handle(
        &mut self,
        backend: &mut dyn AuthoringBackend,
        profile: &ProfileDescriptor,
    ) -> Result<ProfileHandle> {
        let Some(key) = &profile.key else {
            return backend.create_profile(profile);
        };
        if let Some(handle) = self.profile_handles.get(key) {
            return Ok(*handle);
        }
        let handle = backend.create_profile(profile)?;
        self.profile_handles.insert(key.clone(), handle);
        Ok(handle)
    }

    /// Prismatic solid along local +Z
    pub fn uniform(
        &mut self,
        backend: &mut dyn AuthoringBackend,
        profile: &ProfileDescriptor,
        frame: &CoordinateFrame,
        length: f64,
        anchor: ExtrusionAnchor,
    ) -> Result<GeometryResult> {
        check_depth(length)?;
        let handle = self.profile_handle(backend, profile)?;
        let position = SolidPosition::at(Point3::new(0.0, 0.0, anchor.start_z(length)));
        let solid = backend.create_extruded_solid(handle, &position, &Vector3::z(), length)?;

        Ok(GeometryResult {
            kind: GeometryKind::Extrusion,
            solids: smallvec![solid],
            frame: *frame,
            depth: length,
            profile_name: profile.name.clone(),
            downgrades: Vec::new(),
        })
    }

    /// Member whose section varies from `start` to `end`.
    ///
    /// Structurally equal sections short-circuit to [`Self::uniform`].
    #[allow(clippy::too_many_arguments)]
    pub fn tapered(
        &mut self,
        backend: &mut dyn AuthoringBackend,
        factory: &ProfileFactory,
        class: ElementClass,
        start: &SectionDescriptor,
        end: &SectionDescriptor,
        frame: &CoordinateFrame,
        length: f64,
        anchor: ExtrusionAnchor,
    ) -> Result<GeometryResult> {
        let start_profile = factory.resolve(start, class)?;
        if start == end {
            return self.uniform(backend, &start_profile, frame, length, anchor);
        }
        check_depth(length)?;
        let end_profile = factory.resolve(end, class)?;

        let start_handle = self.profile_handle(backend, &start_profile)?;
        let end_handle = self.profile_handle(backend, &end_profile)?;
        let z0 = anchor.start_z(length);
        let spine = Spine {
            start: Point3::new(0.0, 0.0, z0),
            end: Point3::new(0.0, 0.0, z0 + length),
        };
        let mut downgrades = Vec::new();

        match backend.create_swept_solid(start_handle, end_handle, &spine)? {
            Representation::Accepted(solid) => {
                return Ok(self.tapered_result(GeometryKind::TaperedSweep, solid, frame, length, &start_profile, downgrades));
            }
            Representation::Rejected { reason } => {
                tracing::info!(element = %class, %reason, "tapered sweep rejected, trying sectioned spine");
                downgrades.push(format!("tapered sweep rejected: {}", reason));
            }
        }

        match backend.create_sectioned_spine(&[start_handle, end_handle], &spine)? {
            Representation::Accepted(solid) => {
                return Ok(self.tapered_result(GeometryKind::SectionedSpine, solid, frame, length, &start_profile, downgrades));
            }
            Representation::Rejected { reason } => {
                tracing::info!(element = %class, %reason, "sectioned spine rejected");
                downgrades.push(format!("sectioned spine rejected: {}", reason));
            }
        }

        if class == ElementClass::Column && self.config.taper_steps > 0 {
            match self.stepped(backend, factory, class, start, end, frame, length, anchor) {
                Ok(mut result) => {
                    tracing::info!(element = %class, steps = result.solids.len(), "using stepped taper");
                    downgrades.push(format!("stepped taper with {} steps", result.solids.len()));
                    result.downgrades = downgrades;
                    return Ok(result);
                }
                // Backend failures are not a representation choice
                Err(e @ Error::Backend(_)) => return Err(e),
                Err(e) => {
                    tracing::info!(element = %class, error = %e, "stepped taper failed");
                    downgrades.push(format!("stepped taper failed: {}", e));
                }
            }
        }

        tracing::info!(element = %class, profile = %start_profile.name, "falling back to start profile extrusion");
        downgrades.push(format!("uniform extrusion of {}", start_profile.name));
        let mut result = self.uniform(backend, &start_profile, frame, length, anchor)?;
        result.kind = GeometryKind::FallbackExtrusion;
        result.downgrades = downgrades;
        Ok(result)
    }

    fn tapered_result(
        &self,
        kind: GeometryKind,
        solid: SolidHandle,
        frame: &CoordinateFrame,
        length: f64,
        start_profile: &Arc<ProfileDescriptor>,
        downgrades: Vec<String>,
    ) -> GeometryResult {
        GeometryResult {
            kind,
            solids: smallvec![solid],
            frame: *frame,
            depth: length,
            profile_name: start_profile.name.clone(),
            downgrades,
        }
    }

    /// Consecutive extrusions with interpolated sections
    #[allow(clippy::too_many_arguments)]
    fn stepped(
        &mut self,
        backend: &mut dyn AuthoringBackend,
        factory: &ProfileFactory,
        class: ElementClass,
        start: &SectionDescriptor,
        end: &SectionDescriptor,
        frame: &CoordinateFrame,
        length: f64,
        anchor: ExtrusionAnchor,
    ) -> Result<GeometryResult> {
        let steps = self.config.taper_steps;
        let step_length = length / steps as f64;
        let z0 = anchor.start_z(length);
        // Resolve every step before touching the backend, so a failing
        // interpolation leaves nothing behind
        let profiles = (0..steps)
            .map(|i| -> Result<Arc<ProfileDescriptor>> {
                // Each step takes the section at its own mid-length
                let ratio = (i as f64 + 0.5) / steps as f64;
                let section = start.interpolate(end, ratio)?;
                factory.resolve(&section, class)
            })
            .collect::<Result<Vec<_>>>()?;
        let profile_name = profiles
            .first()
            .map(|p| p.name.clone())
            .unwrap_or_default();

        let mut solids = SmallVec::with_capacity(steps);
        for (i, profile) in profiles.iter().enumerate() {
            let handle = self.profile_handle(backend, profile)?;
            let position = SolidPosition::at(Point3::new(0.0, 0.0, z0 + step_length * i as f64));
            solids.push(backend.create_extruded_solid(handle, &position, &Vector3::z(), step_length)?);
        }

        Ok(GeometryResult {
            kind: GeometryKind::SteppedTaper,
            solids,
            frame: *frame,
            depth: length,
            profile_name,
            downgrades: Vec::new(),
        })
    }

    /// Wall body: profile in the face plane, extruded through the thickness
    pub fn wall(
        &mut self,
        backend: &mut dyn AuthoringBackend,
        profile: &ProfileDescriptor,
        frame: &CoordinateFrame,
        thickness: f64,
    ) -> Result<GeometryResult> {
        self.outline_solid(
            backend,
            ElementClass::Wall,
            profile,
            frame,
            Point3::new(0.0, 0.0, -thickness / 2.0),
            Vector3::z(),
            thickness,
        )
    }

    /// Slab body: profile at the top face, extruded downwards
    pub fn slab(
        &mut self,
        backend: &mut dyn AuthoringBackend,
        profile: &ProfileDescriptor,
        frame: &CoordinateFrame,
        thickness: f64,
    ) -> Result<GeometryResult> {
        self.outline_solid(
            backend,
            ElementClass::Slab,
            profile,
            frame,
            Point3::origin(),
            Vector3::new(0.0, 0.0, -1.0),
            thickness,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn outline_solid(
        &mut self,
        backend: &mut dyn AuthoringBackend,
        class: ElementClass,
        profile: &ProfileDescriptor,
        frame: &CoordinateFrame,
        origin: Point3<f64>,
        direction: Vector3<f64>,
        thickness: f64,
    ) -> Result<GeometryResult> {
        check_depth(thickness)?;
        let area = profile.outline(self.config.circle_segments).area();
        if !area.is_finite() || area <= self.config.tolerance {
            return Err(Error::geometry(
                class,
                format!("outline has no area ({:.3e})", area),
            ));
        }

        let handle = self.profile_handle(backend, profile)?;
        let solid =
            backend.create_extruded_solid(handle, &SolidPosition::at(origin), &direction, thickness)?;

        Ok(GeometryResult {
            kind: GeometryKind::Extrusion,
            solids: smallvec![solid],
            frame: *frame,
            depth: thickness,
            profile_name: profile.name.clone(),
            downgrades: Vec::new(),
        })
    }
}

#[inline]
fn check_depth(depth: f64) -> Result<()> {
    if depth.is_finite() && depth > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidExtrusion("Depth must be positive".to_string()))
    }
}
