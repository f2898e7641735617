// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pile and footing processor.

use super::helpers::{emit, resolve_profile};
use crate::backend::EntityKind;
use crate::error::{Error, Result};
use crate::extrusion::ExtrusionAnchor;
use crate::frame::CoordinateFrame;
use crate::router::{BuildContext, ElementGeometry, ElementProcessor};
use stbifc_core::{
    keys, ElementClass, ElementDefinition, FootingMember, PileMember, SectionDescriptor,
    SectionType,
};

/// Piles and pad footings: placed at their base and extruded upwards.
///
/// Piles follow their bottom-to-top axis; footings are always upright
/// rectangles centered on their bottom point.
#[derive(Debug, Default)]
pub struct FoundationProcessor;

impl FoundationProcessor {
    pub fn new() -> Self {
        Self
    }

    fn process_pile(&self, pile: &PileMember, ctx: &mut BuildContext<'_>) -> Result<ElementGeometry> {
        let class = ElementClass::Pile;
        let frame = ctx.frames.build(&pile.bottom, &pile.top, class)?;
        let section = pile_section(pile.section.as_ref(), ctx.config.default_pile_diameter);
        let profile = resolve_profile(ctx, &pile.identity, class, &section)?;
        let geometry = ctx.extrusion.uniform(
            ctx.backend,
            &profile,
            &frame,
            pile.length(),
            ExtrusionAnchor::Base,
        )?;

        let placement = ctx.placements.planar(&frame);
        let guid = ctx.identity.element_guid(&pile.identity);
        emit(ctx, EntityKind::Member(class), &pile.identity, guid, &placement, geometry)
    }

    fn process_footing(
        &self,
        footing: &FootingMember,
        ctx: &mut BuildContext<'_>,
    ) -> Result<ElementGeometry> {
        let class = ElementClass::Footing;
        let (default_x, default_y) = ctx.config.default_footing_size;
        let width_x = positive(class, keys::WIDTH_X, footing.width_x.unwrap_or(default_x))?;
        let width_y = positive(class, keys::WIDTH_Y, footing.width_y.unwrap_or(default_y))?;
        let depth = positive(
            class,
            "depth",
            footing.depth.unwrap_or(ctx.config.default_footing_depth),
        )?;

        let section = SectionDescriptor::rectangle(width_x, width_y);
        let profile = resolve_profile(ctx, &footing.identity, class, &section)?;
        let frame = CoordinateFrame::canonical(footing.bottom);
        let geometry =
            ctx.extrusion
                .uniform(ctx.backend, &profile, &frame, depth, ExtrusionAnchor::Base)?;

        let placement = ctx.placements.planar(&frame);
        let guid = ctx.identity.element_guid(&footing.identity);
        emit(ctx, EntityKind::Member(class), &footing.identity, guid, &placement, geometry)
    }
}

impl ElementProcessor for FoundationProcessor {
    fn process(
        &self,
        element: &ElementDefinition,
        ctx: &mut BuildContext<'_>,
    ) -> Result<Vec<ElementGeometry>> {
        let produced = match element {
            ElementDefinition::Pile(pile) => self.process_pile(pile, ctx)?,
            ElementDefinition::Footing(footing) => self.process_footing(footing, ctx)?,
            other => return Err(Error::UnsupportedElement(other.class())),
        };
        Ok(vec![produced])
    }

    fn supported_classes(&self) -> Vec<ElementClass> {
        vec![ElementClass::Pile, ElementClass::Footing]
    }
}

/// Pile section with its diameter filled in.
///
/// Circles accept `radius`, `diameter` or `outer_diameter`; a missing
/// section or size falls back to `default_diameter`.
fn pile_section(section: Option<&SectionDescriptor>, default_diameter: f64) -> SectionDescriptor {
    let Some(section) = section else {
        return SectionDescriptor::new(SectionType::Circle).with(keys::DIAMETER, default_diameter);
    };
    if section.section_type != SectionType::Circle
        || section.first_of(&[keys::RADIUS, keys::DIAMETER]).is_some()
    {
        return section.clone();
    }

    let diameter = section
        .dimension(keys::OUTER_DIAMETER)
        .unwrap_or(default_diameter);
    section.clone().with(keys::DIAMETER, diameter)
}

fn positive(class: ElementClass, parameter: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(Error::parameter(
            class,
            parameter,
            format!("must be positive, got {}", value),
        ))
    }
}
