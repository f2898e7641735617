// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Slab processor.

use super::helpers::{emit, planar_thickness, vertex_average};
use crate::backend::EntityKind;
use crate::error::{Error, Result};
use crate::frame::CoordinateFrame;
use crate::profile::ProfileDescriptor;
use crate::router::{BuildContext, ElementGeometry, ElementProcessor, WarningKind};
use nalgebra::Point2;
use stbifc_core::{ElementClass, ElementDefinition};

/// Slabs: outline taken in plan relative to the center and extruded
/// downwards from the top face.
#[derive(Debug, Default)]
pub struct SlabProcessor;

impl SlabProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl ElementProcessor for SlabProcessor {
    fn process(
        &self,
        element: &ElementDefinition,
        ctx: &mut BuildContext<'_>,
    ) -> Result<Vec<ElementGeometry>> {
        let ElementDefinition::Slab(slab) = element else {
            return Err(Error::UnsupportedElement(element.class()));
        };
        let class = ElementClass::Slab;

        if slab.points.len() < 3 {
            return Err(Error::geometry(
                class,
                format!("polygon needs at least 3 points, got {}", slab.points.len()),
            ));
        }
        let thickness = planar_thickness(class, slab.thickness, ctx.config.default_slab_thickness)?;
        if !slab.openings.is_empty() {
            ctx.warn(
                &slab.identity,
                class,
                WarningKind::IgnoredOpenings,
                format!("{} slab opening(s) ignored", slab.openings.len()),
            );
        }

        let center = slab.center.unwrap_or_else(|| vertex_average(&slab.points));
        let outline = slab
            .points
            .iter()
            .map(|p| Point2::new(p.x - center.x, p.y - center.y))
            .collect();

        let frame = CoordinateFrame::canonical(center);
        let profile = ProfileDescriptor::polygon(format!("{}_Outline", slab.identity.name), outline);
        let geometry = ctx.extrusion.slab(ctx.backend, &profile, &frame, thickness)?;
        let placement = ctx.placements.planar(&frame);
        let guid = ctx.identity.element_guid(&slab.identity);
        Ok(vec![emit(
            ctx,
            EntityKind::Member(class),
            &slab.identity,
            guid,
            &placement,
            geometry,
        )?])
    }

    fn supported_classes(&self) -> Vec<ElementClass> {
        vec![ElementClass::Slab]
    }
}
