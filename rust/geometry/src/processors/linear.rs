// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Beam and brace processor.

use super::helpers::{build_member_geometry, emit, resolve_profile};
use crate::backend::EntityKind;
use crate::error::{Error, Result};
use crate::extrusion::ExtrusionAnchor;
use crate::frame::CoordinateFrame;
use crate::router::{BuildContext, ElementGeometry, ElementProcessor};
use stbifc_core::{ElementClass, ElementDefinition, HaunchSections, LinearMember, MemberSections};

/// Beams and braces: placed at their midpoint, extruded along their axis.
/// Haunched beams become one element per zone.
#[derive(Debug, Default)]
pub struct LinearMemberProcessor;

impl LinearMemberProcessor {
    pub fn new() -> Self {
        Self
    }

    fn process_member(
        &self,
        member: &LinearMember,
        class: ElementClass,
        ctx: &mut BuildContext<'_>,
    ) -> Result<ElementGeometry> {
        let frame = ctx.frames.build(&member.start, &member.end, class)?;
        let geometry = build_member_geometry(
            ctx,
            &member.identity,
            class,
            &member.sections,
            &frame,
            member.length(),
            ExtrusionAnchor::Midpoint,
        )?;

        let placement = ctx.placements.linear(&frame, member.midpoint());
        let guid = ctx.identity.element_guid(&member.identity);
        emit(ctx, EntityKind::Member(class), &member.identity, guid, &placement, geometry)
    }

    fn process_haunch(
        &self,
        member: &LinearMember,
        haunch: &HaunchSections,
        ctx: &mut BuildContext<'_>,
    ) -> Result<Vec<ElementGeometry>> {
        let class = ElementClass::Beam;
        let segments = ctx.haunches.split(member, haunch)?;
        let frame = ctx.frames.build(&member.start, &member.end, class)?;

        // Resolve every zone before emitting anything so a bad section fails the whole beam
        let profiles = segments
            .iter()
            .map(|segment| resolve_profile(ctx, &segment.identity, class, &segment.section))
            .collect::<Result<Vec<_>>>()?;

        let mut produced = Vec::with_capacity(segments.len());
        for (segment, profile) in segments.iter().zip(&profiles) {
            let segment_frame = CoordinateFrame {
                origin: segment.start,
                ..frame
            };
            let geometry = ctx.extrusion.uniform(
                ctx.backend,
                profile,
                &segment_frame,
                segment.length,
                ExtrusionAnchor::Midpoint,
            )?;
            let placement = ctx.placements.linear(&segment_frame, segment.midpoint());
            let guid = ctx.identity.derived_guid(&segment.guid_seed);
            produced.push(emit(
                ctx,
                EntityKind::Member(class),
                &segment.identity,
                guid,
                &placement,
                geometry,
            )?);
        }
        Ok(produced)
    }
}

impl ElementProcessor for LinearMemberProcessor {
    fn process(
        &self,
        element: &ElementDefinition,
        ctx: &mut BuildContext<'_>,
    ) -> Result<Vec<ElementGeometry>> {
        let (member, class) = match element {
            ElementDefinition::Beam(member) => (member, ElementClass::Beam),
            ElementDefinition::Brace(member) => (member, ElementClass::Brace),
            other => return Err(Error::UnsupportedElement(other.class())),
        };

        match &member.sections {
            MemberSections::Haunch(haunch) if class == ElementClass::Beam => {
                self.process_haunch(member, haunch, ctx)
            }
            _ => Ok(vec![self.process_member(member, class, ctx)?]),
        }
    }

    fn supported_classes(&self) -> Vec<ElementClass> {
        vec![ElementClass::Beam, ElementClass::Brace]
    }
}
