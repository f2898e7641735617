// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Haunch segmentation
//!
//! A haunched beam is modelled as up to three consecutive members
//! (START, CENTER, END), each with its own section. Zero-length zones are
//! omitted and the remaining segments are numbered in order.

use crate::error::{Error, Result};
use nalgebra::Point3;
use smallvec::SmallVec;
use stbifc_core::{ElementClass, ElementIdentity, HaunchSections, HaunchZone, LinearMember, SectionDescriptor};

/// One emitted sub-member of a haunched beam
#[derive(Debug, Clone, PartialEq)]
pub struct HaunchSegment {
    pub zone: HaunchZone,
    /// Position among the emitted segments
    pub index: usize,
    pub start: Point3<f64>,
    pub end: Point3<f64>,
    pub length: f64,
    pub section: SectionDescriptor,
    /// `{name}_{ZONE}` / `{tag}_{ZONE}`, keeping the parent's external id
    pub identity: ElementIdentity,
    /// Seed for the segment's derived GUID
    pub guid_seed: String,
}

impl HaunchSegment {
    #[inline]
    pub fn midpoint(&self) -> Point3<f64> {
        Point3::from((self.start.coords + self.end.coords) / 2.0)
    }
}

/// Splits haunched beams into per-zone segments
#[derive(Debug, Clone)]
pub struct HaunchSegmenter {
    tolerance: f64,
}

impl Default for HaunchSegmenter {
    fn default() -> Self {
        Self { tolerance: 1e-6 }
    }
}

impl HaunchSegmenter {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// Split `member` along its axis.
    ///
    /// Fails as a whole: either every non-empty zone gets a segment or no
    /// segment is returned.
    pub fn split(
        &self,
        member: &LinearMember,
        haunch: &HaunchSections,
    ) -> Result<SmallVec<[HaunchSegment; 3]>> {
        let class = ElementClass::Beam;
        let hs = haunch.haunch_start;
        let he = haunch.haunch_end;
        for (parameter, value) in [("haunch_start", hs), ("haunch_end", he)] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::parameter(class, parameter, format!("must not be negative, got {}", value)));
            }
        }

        let delta = member.end - member.start;
        let total = delta.norm();
        if total <= hs + he {
            return Err(Error::geometry(
                class,
                format!("length {} does not exceed haunch lengths {} + {}", total, hs, he),
            ));
        }
        let direction = delta / total;
        let center = total - hs - he;

        let mut segments = SmallVec::new();
        let mut offset = 0.0;
        for (zone, length) in [
            (HaunchZone::Start, hs),
            (HaunchZone::Center, center),
            (HaunchZone::End, he),
        ] {
            if length <= self.tolerance {
                continue;
            }
            let section = self.zone_section(haunch, zone)?;
            let index = segments.len();
            let start = member.start + direction * offset;
            // Snap the last segment onto the member end
            let end = if zone == HaunchZone::End || (zone == HaunchZone::Center && he <= self.tolerance) {
                member.end
            } else {
                member.start + direction * (offset + length)
            };
            offset += length;

            segments.push(HaunchSegment {
                zone,
                index,
                start,
                end,
                length,
                section: section.clone(),
                identity: segment_identity(&member.identity, zone),
                guid_seed: format!("{}_{}_{}", member.identity.seed(), zone.as_str(), index),
            });
        }

        tracing::debug!(
            member = %member.identity,
            segments = segments.len(),
            total,
            "haunch beam split"
        );
        Ok(segments)
    }

    fn zone_section<'h>(
        &self,
        haunch: &'h HaunchSections,
        zone: HaunchZone,
    ) -> Result<&'h SectionDescriptor> {
        if let Some(section) = haunch.section(zone) {
            return Ok(section);
        }
        // CENTER may borrow the section of an omitted (zero-length) haunch end
        let borrowed = match zone {
            HaunchZone::Center if haunch.haunch_start <= self.tolerance => {
                haunch.section(HaunchZone::Start)
            }
            HaunchZone::Center if haunch.haunch_end <= self.tolerance => {
                haunch.section(HaunchZone::End)
            }
            _ => None,
        };
        borrowed.ok_or_else(|| {
            Error::parameter(
                ElementClass::Beam,
                format!("section_{}", zone.as_str().to_ascii_lowercase()),
                format!("no section for the {} zone", zone.as_str()),
            )
        })
    }
}

fn segment_identity(parent: &ElementIdentity, zone: HaunchZone) -> ElementIdentity {
    ElementIdentity {
        name: format!("{}_{}", parent.name, zone.as_str()),
        tag: format!("{}_{}", parent.tag, zone.as_str()),
        external_id: parent.external_id.clone(),
    }
}
