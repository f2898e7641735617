// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared helpers used by multiple processors.

use crate::backend::{ElementRecord, EntityKind};
use crate::error::{Error, Result};
use crate::extrusion::{ExtrusionAnchor, GeometryResult};
use crate::frame::CoordinateFrame;
use crate::placement::PlacementResult;
use crate::profile::ProfileDescriptor;
use crate::router::{BuildContext, ElementGeometry, WarningKind};
use nalgebra::{Point3, Vector3};
use stbifc_core::{ElementClass, ElementIdentity, IfcGuid, MemberSections, SectionDescriptor};
use std::sync::Arc;

/// Resolve a section, recording a warning when it had to be approximated
pub(super) fn resolve_profile(
    ctx: &mut BuildContext<'_>,
    identity: &ElementIdentity,
    class: ElementClass,
    section: &SectionDescriptor,
) -> Result<Arc<ProfileDescriptor>> {
    let profile = ctx.profiles.resolve(section, class)?;
    if let Some(note) = &profile.fallback {
        ctx.warn(identity, class, WarningKind::FallbackProfile, note.clone());
    }
    Ok(profile)
}

/// Solid(s) for a uniform or tapered member
#[allow(clippy::too_many_arguments)]
pub(super) fn build_member_geometry(
    ctx: &mut BuildContext<'_>,
    identity: &ElementIdentity,
    class: ElementClass,
    sections: &MemberSections,
    frame: &CoordinateFrame,
    length: f64,
    anchor: ExtrusionAnchor,
) -> Result<GeometryResult> {
    match sections {
        MemberSections::Uniform { section } => {
            let profile = resolve_profile(ctx, identity, class, section)?;
            ctx.extrusion
                .uniform(ctx.backend, &profile, frame, length, anchor)
        }
        MemberSections::Tapered { start, end } => {
            resolve_profile(ctx, identity, class, start)?;
            if start != end {
                resolve_profile(ctx, identity, class, end)?;
            }
            let geometry = ctx.extrusion.tapered(
                ctx.backend,
                ctx.profiles,
                class,
                start,
                end,
                frame,
                length,
                anchor,
            )?;
            for downgrade in &geometry.downgrades {
                ctx.warn(
                    identity,
                    class,
                    WarningKind::RepresentationDowngrade,
                    downgrade.clone(),
                );
            }
            Ok(geometry)
        }
        MemberSections::Haunch(_) => Err(Error::parameter(
            class,
            "sections",
            "haunch sections are only supported on beams",
        )),
    }
}

/// Create the placement and element for `geometry`
pub(super) fn emit(
    ctx: &mut BuildContext<'_>,
    kind: EntityKind,
    identity: &ElementIdentity,
    guid: IfcGuid,
    placement: &PlacementResult,
    geometry: GeometryResult,
) -> Result<ElementGeometry> {
    let placement_handle = ctx.backend.create_placement(placement)?;
    let record = ElementRecord {
        kind,
        guid: guid.clone(),
        name: identity.name.clone(),
        tag: identity.tag.clone(),
        placement: placement_handle,
        solids: geometry.solids.clone(),
        profile_name: Some(geometry.profile_name.clone()),
    };
    let element = ctx.backend.create_element(&record)?;
    tracing::debug!(
        element = %identity,
        %kind,
        geometry = ?geometry.kind,
        handle = %element,
        "element created"
    );

    Ok(ElementGeometry {
        kind,
        name: record.name,
        tag: record.tag,
        guid,
        element,
        placement: placement_handle,
        geometry,
        openings: Vec::new(),
    })
}

/// Thickness of a planar element, or the class default
pub(super) fn planar_thickness(
    class: ElementClass,
    explicit: Option<f64>,
    default: f64,
) -> Result<f64> {
    let thickness = explicit.unwrap_or(default);
    if thickness.is_finite() && thickness > 0.0 {
        Ok(thickness)
    } else {
        Err(Error::parameter(
            class,
            "thickness",
            format!("must be positive, got {}", thickness),
        ))
    }
}

/// Vertex average of a polygon
pub(super) fn vertex_average(points: &[Point3<f64>]) -> Point3<f64> {
    let sum = points
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords);
    Point3::from(sum / points.len().max(1) as f64)
}
