// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Column processor.

use super::helpers::{build_member_geometry, emit};
use crate::backend::EntityKind;
use crate::error::{Error, Result};
use crate::extrusion::ExtrusionAnchor;
use crate::router::{BuildContext, ElementGeometry, ElementProcessor};
use stbifc_core::{ElementClass, ElementDefinition};

/// Columns: placed at the base, extruded upwards, section turned by the
/// column rotation and orientation flag.
#[derive(Debug, Default)]
pub struct ColumnProcessor;

impl ColumnProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl ElementProcessor for ColumnProcessor {
    fn process(
        &self,
        element: &ElementDefinition,
        ctx: &mut BuildContext<'_>,
    ) -> Result<Vec<ElementGeometry>> {
        let ElementDefinition::Column(column) = element else {
            return Err(Error::UnsupportedElement(element.class()));
        };
        let class = ElementClass::Column;

        let frame = ctx.frames.build(&column.bottom, &column.top, class)?;
        let geometry = build_member_geometry(
            ctx,
            &column.identity,
            class,
            &column.sections,
            &frame,
            column.height(),
            ExtrusionAnchor::Base,
        )?;

        let placement = ctx.placements.column(
            &frame,
            column.rotation_radians,
            column.is_reference_direction,
        );
        let guid = ctx.identity.element_guid(&column.identity);
        Ok(vec![emit(
            ctx,
            EntityKind::Member(class),
            &column.identity,
            guid,
            &placement,
            geometry,
        )?])
    }

    fn supported_classes(&self) -> Vec<ElementClass> {
        vec![ElementClass::Column]
    }
}
