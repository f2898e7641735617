// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall processor - planar outline extrusion plus openings.

use super::helpers::{emit, planar_thickness};
use crate::backend::{ElementRecord, EntityKind};
use crate::error::{Error, Result};
use crate::profile::ProfileDescriptor;
use crate::router::{BuildContext, ElementGeometry, ElementProcessor, OpeningOutput, WarningKind};
use smallvec::smallvec;
use stbifc_core::{ElementClass, ElementDefinition, OpeningDefinition, PlanarMember, WallExtent};

/// Walls: outline projected into the face frame and extruded through the
/// thickness, centred on the face. Openings are voided out of the wall.
#[derive(Debug, Default)]
pub struct WallProcessor;

impl WallProcessor {
    pub fn new() -> Self {
        Self
    }

    fn build_opening(
        &self,
        ctx: &mut BuildContext<'_>,
        wall: &PlanarMember,
        host: &ElementGeometry,
        opening: &OpeningDefinition,
        extent: &WallExtent,
        thickness: f64,
    ) -> Result<OpeningOutput> {
        let geometry = ctx.openings.build(opening, extent, thickness)?;

        let profile = ctx.extrusion.profile_handle(ctx.backend, &geometry.profile)?;
        let solid = ctx
            .backend
            .create_void_solid(profile, &geometry.position, geometry.depth)?;
        let placement = ctx.placements.opening(geometry.center, host.placement);
        let placement = ctx.backend.create_placement(&placement)?;

        let guid = ctx.identity.opening_guid(&wall.identity, &opening.id);
        let record = ElementRecord {
            kind: EntityKind::Opening,
            guid: guid.clone(),
            name: geometry.name.clone(),
            tag: opening.id.clone(),
            placement,
            solids: smallvec![solid],
            profile_name: Some(geometry.profile.name.clone()),
        };
        let element = ctx.backend.create_element(&record)?;
        ctx.backend
            .relate_voids(host.element, element, &geometry.relation_name)?;

        Ok(OpeningOutput {
            id: opening.id.clone(),
            name: geometry.name,
            guid,
            element,
            placement,
            solid,
        })
    }
}

impl ElementProcessor for WallProcessor {
    fn process(
        &self,
        element: &ElementDefinition,
        ctx: &mut BuildContext<'_>,
    ) -> Result<Vec<ElementGeometry>> {
        let ElementDefinition::Wall(wall) = element else {
            return Err(Error::UnsupportedElement(element.class()));
        };
        let class = ElementClass::Wall;

        let face = ctx.faces.build(class, &wall.points, wall.center)?;
        if face.is_fallback {
            ctx.warn(
                &wall.identity,
                class,
                WarningKind::FallbackFrame,
                "degenerate outline normal, canonical frame used",
            );
        }
        let thickness = planar_thickness(class, wall.thickness, ctx.config.default_wall_thickness)?;

        let outline = face.local_outline(ctx.config.tolerance);
        if outline.len() < 3 {
            return Err(Error::geometry(
                class,
                format!("outline has only {} distinct points", outline.len()),
            ));
        }

        let frame = face.as_coordinate_frame();
        let profile = ProfileDescriptor::polygon(format!("{}_Outline", wall.identity.name), outline.clone());
        let geometry = ctx.extrusion.wall(ctx.backend, &profile, &frame, thickness)?;
        let placement = ctx.placements.planar(&frame);
        let guid = ctx.identity.element_guid(&wall.identity);
        let mut produced = emit(ctx, EntityKind::Member(class), &wall.identity, guid, &placement, geometry)?;

        if !wall.openings.is_empty() {
            let extent = ctx.openings.wall_extent(wall.extent, &outline);
            for opening in &wall.openings {
                match self.build_opening(ctx, wall, &produced, opening, &extent, thickness) {
                    Ok(output) => produced.openings.push(output),
                    Err(e) => ctx.warn(
                        &wall.identity,
                        class,
                        WarningKind::SkippedOpening,
                        format!("opening {} skipped: {}", opening.id, e),
                    ),
                }
            }
        }

        Ok(vec![produced])
    }

    fn supported_classes(&self) -> Vec<ElementClass> {
        vec![ElementClass::Wall]
    }
}
