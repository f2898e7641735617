// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Profile factory - resolves section descriptors into profiles
//!
//! Dispatch is a closed match over [`SectionType`]. Each branch pulls its
//! required dimensions out of the descriptor's dimension bag; a missing or
//! non-positive value is a [`Error::ParameterValidation`]. Unknown tags
//! degrade to a rectangle and are flagged on the descriptor.
//!
//! Resolved descriptors are cached by structure (tag + dimension values +
//! alignment), never by display name, so two sections called "H-400" with
//! different flanges never share a profile.

use crate::config::GeometryConfig;
use crate::error::{Error, Result};
use crate::profile::{ProfileAlignment, ProfileDescriptor, ProfileKey, ProfileShape};
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use stbifc_core::naming::{
    box_profile_name, circle_profile_name, fallback_profile_name, flanged_profile_name,
    h_profile_name, l_profile_name, pipe_profile_name, rect_profile_name,
};
use stbifc_core::{keys, ElementClass, NamingMode, SectionDescriptor, SectionType};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

const FALLBACK_WIDTH_KEYS: &[&str] = &[
    keys::WIDTH,
    keys::WIDTH_X,
    keys::OVERALL_WIDTH,
    keys::FLANGE_WIDTH,
    keys::OUTER_WIDTH,
    keys::OUTER_DIAMETER,
];

const FALLBACK_HEIGHT_KEYS: &[&str] = &[
    keys::HEIGHT,
    keys::WIDTH_Y,
    keys::OVERALL_DEPTH,
    keys::OUTER_HEIGHT,
    keys::OUTER_DIAMETER,
];

/// Snapshot of the descriptor cache counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CacheStats {
    pub entries: usize,
    pub hits: usize,
    pub misses: usize,
}

/// Resolves sections into [`ProfileDescriptor`]s, caching by structure
pub struct ProfileFactory {
    naming: NamingMode,
    fallback_sizes: FxHashMap<ElementClass, (f64, f64)>,
    cache: RwLock<FxHashMap<ProfileKey, Arc<ProfileDescriptor>>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl Default for ProfileFactory {
    fn default() -> Self {
        Self::new(&GeometryConfig::default())
    }
}

impl ProfileFactory {
    pub fn new(config: &GeometryConfig) -> Self {
        let fallback_sizes = ElementClass::ALL
            .iter()
            .map(|class| (*class, config.fallback_rectangle(*class)))
            .collect();
        Self {
            naming: config.naming,
            fallback_sizes,
            cache: RwLock::new(FxHashMap::default()),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    /// Resolve `section` for an element of `class`.
    ///
    /// Repeated lookups of a structurally equal section return the same
    /// `Arc` without rebuilding.
    pub fn resolve(
        &self,
        section: &SectionDescriptor,
        class: ElementClass,
    ) -> Result<Arc<ProfileDescriptor>> {
        let key = Self::cache_key(section, class);

        // Check cache first
        {
            let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(cached) = cache.get(&key) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::trace!(section = %section, fingerprint = key.section.fingerprint(), "profile cache hit");
                return Ok(Arc::clone(cached));
            }
        }

        // Cache miss - build outside the lock
        self.misses.fetch_add(1, Ordering::Relaxed);
        let descriptor = self.build(section, class, key.clone())?;
        tracing::debug!(
            section = %section,
            profile = %descriptor.name,
            element = %class,
            "profile resolved"
        );

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        // A concurrent prewarm may have inserted the same key meanwhile
        let entry = cache.entry(key).or_insert_with(|| Arc::new(descriptor));
        Ok(Arc::clone(entry))
    }

    /// Build descriptors for many sections in parallel.
    ///
    /// Returns the number of distinct sections resolved successfully. Failures
    /// are left for the per-element lookup to report.
    pub fn prewarm(&self, sections: &[&SectionDescriptor], class: ElementClass) -> usize {
        let mut seen = FxHashSet::default();
        let distinct: Vec<&SectionDescriptor> = sections
            .iter()
            .copied()
            .filter(|section| seen.insert(Self::cache_key(section, class)))
            .collect();

        let resolved = distinct
            .par_iter()
            .filter(|section| self.resolve(section, class).is_ok())
            .count();
        tracing::debug!(element = %class, distinct = distinct.len(), resolved, "profile cache prewarmed");
        resolved
    }

    pub fn cache_stats(&self) -> CacheStats {
        let entries = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        CacheStats {
            entries,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Drop all cached descriptors and reset the counters
    pub fn clear_cache(&self) {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    fn cache_key(section: &SectionDescriptor, class: ElementClass) -> ProfileKey {
        ProfileKey {
            section: section.key(),
            alignment: ProfileAlignment::for_member(class, &section.section_type),
            // Fallback sizes depend on the class, so unknown tags are keyed per class
            fallback_class: (!section.section_type.is_known()).then_some(class),
        }
    }

    fn build(
        &self,
        section: &SectionDescriptor,
        class: ElementClass,
        key: ProfileKey,
    ) -> Result<ProfileDescriptor> {
        let dims = Dimensions { section, class };

        let (shape, name) = match &section.section_type {
            SectionType::Rectangle => {
                let width = dims.require(&[keys::WIDTH, keys::WIDTH_X])?;
                let height = dims.require(&[keys::HEIGHT, keys::WIDTH_Y])?;
                (
                    ProfileShape::Rectangle { width, height },
                    rect_profile_name(width, height),
                )
            }
            SectionType::SrcComposite => {
                // Only the concrete outline is modelled
                let width = dims.require(&[keys::WIDTH, keys::WIDTH_X])?;
                let height = dims.require(&[keys::HEIGHT, keys::WIDTH_Y])?;
                (
                    ProfileShape::Rectangle { width, height },
                    fallback_profile_name(section.section_type.as_str(), width, height),
                )
            }
            SectionType::FlatBar => {
                let width = dims.require(&[keys::WIDTH])?;
                let thickness = dims.require(&[keys::THICKNESS])?;
                (
                    ProfileShape::Rectangle {
                        width,
                        height: thickness,
                    },
                    fallback_profile_name(section.section_type.as_str(), width, thickness),
                )
            }
            SectionType::H => self.build_h(&dims)?,
            SectionType::Box => {
                let width = dims.require(&[keys::WIDTH, keys::OUTER_WIDTH])?;
                let height = dims.require(&[keys::HEIGHT, keys::OUTER_HEIGHT])?;
                let wall_thickness = dims.require(&[keys::WALL_THICKNESS, keys::THICKNESS])?;
                dims.check_wall(wall_thickness, width.min(height) / 2.0)?;
                (
                    ProfileShape::RectangleHollow {
                        width,
                        height,
                        wall_thickness,
                    },
                    box_profile_name(self.naming, width, height, wall_thickness),
                )
            }
            SectionType::Pipe => {
                let radius = dims.radius(keys::OUTER_DIAMETER)?;
                let wall_thickness = dims.require(&[keys::WALL_THICKNESS, keys::THICKNESS])?;
                dims.check_wall(wall_thickness, radius)?;
                (
                    ProfileShape::CircleHollow {
                        radius,
                        wall_thickness,
                    },
                    pipe_profile_name(radius * 2.0, wall_thickness),
                )
            }
            SectionType::Circle => {
                let radius = dims.radius(keys::DIAMETER)?;
                (
                    ProfileShape::Circle { radius },
                    circle_profile_name(radius * 2.0),
                )
            }
            SectionType::Channel => {
                let (depth, flange_width, web_thickness, flange_thickness) = dims.flanged(2)?;
                (
                    ProfileShape::Channel {
                        depth,
                        flange_width,
                        web_thickness,
                        flange_thickness,
                    },
                    flanged_profile_name("C", depth, flange_width, web_thickness, flange_thickness),
                )
            }
            SectionType::CompoundChannel => {
                let (depth, flange_width, web_thickness, flange_thickness) = dims.flanged(2)?;
                let overall_width = dims.optional(keys::OVERALL_WIDTH, flange_width * 2.0)?;
                (
                    ProfileShape::Channel {
                        depth,
                        flange_width: overall_width,
                        web_thickness,
                        flange_thickness,
                    },
                    fallback_profile_name(section.section_type.as_str(), overall_width, depth),
                )
            }
            SectionType::Angle => {
                let width = dims.require(&[keys::WIDTH])?;
                let height = dims.require(&[keys::HEIGHT])?;
                let thickness = dims.require(&[keys::THICKNESS])?;
                dims.check_wall(thickness, width.min(height))?;
                (
                    ProfileShape::Angle {
                        width,
                        height,
                        thickness,
                    },
                    l_profile_name(width, height, thickness),
                )
            }
            SectionType::CompoundAngle => {
                let width = dims.require(&[keys::OVERALL_WIDTH])?;
                let height = dims.require(&[keys::OVERALL_DEPTH])?;
                let thickness = dims.require(&[keys::THICKNESS])?;
                dims.check_wall(thickness, width.min(height))?;
                (
                    ProfileShape::Angle {
                        width,
                        height,
                        thickness,
                    },
                    fallback_profile_name(section.section_type.as_str(), width, height),
                )
            }
            SectionType::Tee => {
                let (depth, flange_width, web_thickness, flange_thickness) = dims.flanged(1)?;
                (
                    ProfileShape::Tee {
                        depth,
                        flange_width,
                        web_thickness,
                        flange_thickness,
                    },
                    flanged_profile_name("T", depth, flange_width, web_thickness, flange_thickness),
                )
            }
            SectionType::Zee => {
                let (depth, flange_width, web_thickness, flange_thickness) = dims.flanged(2)?;
                (
                    ProfileShape::Zee {
                        depth,
                        flange_width,
                        web_thickness,
                        flange_thickness,
                    },
                    flanged_profile_name("Z", depth, flange_width, web_thickness, flange_thickness),
                )
            }
            SectionType::Other(tag) => return Ok(self.build_fallback(section, tag, class, key)),
        };

        let alignment = key.alignment;
        Ok(ProfileDescriptor {
            section_type: Some(section.section_type.clone()),
            offset: alignment.offset(&shape),
            shape,
            alignment,
            name,
            key: Some(key),
            fallback: None,
        })
    }

    fn build_h(&self, dims: &Dimensions<'_>) -> Result<(ProfileShape, String)> {
        let overall_width = dims.require(&[keys::OVERALL_WIDTH])?;
        let overall_depth = dims.require(&[keys::OVERALL_DEPTH])?;
        let web_thickness = dims.require(&[keys::WEB_THICKNESS])?;
        let flange_thickness = dims.require(&[keys::FLANGE_THICKNESS])?;
        let fillet_radius = dims.optional(keys::FILLET_RADIUS, flange_thickness)?;

        if web_thickness >= overall_width {
            return Err(dims.invalid(keys::WEB_THICKNESS, "must be less than the overall width"));
        }
        if flange_thickness * 2.0 >= overall_depth {
            return Err(dims.invalid(
                keys::FLANGE_THICKNESS,
                "two flanges must fit within the overall depth",
            ));
        }

        let name = h_profile_name(
            self.naming,
            overall_width,
            overall_depth,
            web_thickness,
            flange_thickness,
            fillet_radius,
        );
        Ok((
            ProfileShape::IShape {
                overall_width,
                overall_depth,
                web_thickness,
                flange_thickness,
                fillet_radius,
            },
            name,
        ))
    }

    fn build_fallback(
        &self,
        section: &SectionDescriptor,
        tag: &str,
        class: ElementClass,
        key: ProfileKey,
    ) -> ProfileDescriptor {
        let (default_width, default_height) = self
            .fallback_sizes
            .get(&class)
            .copied()
            .unwrap_or((300.0, 600.0));
        let radius_extent = section
            .dimension(keys::RADIUS)
            .map(|radius| radius * 2.0);

        let width = positive(section.first_of(FALLBACK_WIDTH_KEYS))
            .or(positive(radius_extent))
            .unwrap_or(default_width);
        let height = positive(section.first_of(FALLBACK_HEIGHT_KEYS))
            .or(positive(radius_extent))
            .unwrap_or(default_height);

        let unsupported = Error::SectionTypeNotSupported {
            section_type: tag.to_string(),
            element: class,
        };
        tracing::warn!(
            section_type = %tag,
            element = %class,
            width,
            height,
            "unsupported section type, using rectangle"
        );

        let shape = ProfileShape::Rectangle { width, height };
        let alignment = key.alignment;
        ProfileDescriptor {
            section_type: Some(section.section_type.clone()),
            offset: alignment.offset(&shape),
            shape,
            alignment,
            name: fallback_profile_name(tag, width, height),
            key: Some(key),
            fallback: Some(unsupported.to_string()),
        }
    }
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// Dimension lookups bound to the section and element being resolved
struct Dimensions<'a> {
    section: &'a SectionDescriptor,
    class: ElementClass,
}

impl Dimensions<'_> {
    fn invalid(&self, parameter: &str, message: impl Into<String>) -> Error {
        Error::parameter(
            self.class,
            parameter,
            format!("{} section: {}", self.section.section_type, message.into()),
        )
    }

    fn validate(&self, parameter: &str, value: f64) -> Result<f64> {
        if value.is_finite() && value > 0.0 {
            Ok(value)
        } else {
            Err(self.invalid(parameter, format!("must be positive, got {}", value)))
        }
    }

    /// First present key among `candidates`, which must be positive
    fn require(&self, candidates: &[&str]) -> Result<f64> {
        let key = candidates
            .iter()
            .find(|key| self.section.dimension(key).is_some())
            .ok_or_else(|| self.invalid(candidates[0], "missing"))?;
        let value = self.section.dimension(key).unwrap_or_default();
        self.validate(key, value)
    }

    fn optional(&self, key: &str, default: f64) -> Result<f64> {
        match self.section.dimension(key) {
            Some(value) => self.validate(key, value),
            None => Ok(default),
        }
    }

    /// `radius`, or half of `diameter_key`
    fn radius(&self, diameter_key: &str) -> Result<f64> {
        if let Some(radius) = self.section.dimension(keys::RADIUS) {
            return self.validate(keys::RADIUS, radius);
        }
        let diameter = self.require(&[diameter_key])?;
        Ok(diameter / 2.0)
    }

    /// depth, flange width, web thickness, flange thickness
    ///
    /// `flanges` is the number of flanges stacked over the depth (two for
    /// channels and zees, one for tees).
    fn flanged(&self, flanges: u32) -> Result<(f64, f64, f64, f64)> {
        let depth = self.require(&[keys::OVERALL_DEPTH])?;
        let flange_width = self.require(&[keys::FLANGE_WIDTH])?;
        let web_thickness = self.require(&[keys::WEB_THICKNESS])?;
        let flange_thickness = self.require(&[keys::FLANGE_THICKNESS])?;
        if flange_thickness * flanges as f64 >= depth {
            return Err(self.invalid(
                keys::FLANGE_THICKNESS,
                format!("{} x {} leaves no web in depth {}", flanges, flange_thickness, depth),
            ));
        }
        if web_thickness >= flange_width {
            return Err(self.invalid(
                keys::WEB_THICKNESS,
                format!("must be less than the flange width {}", flange_width),
            ));
        }
        Ok((depth, flange_width, web_thickness, flange_thickness))
    }

    fn check_wall(&self, thickness: f64, limit: f64) -> Result<()> {
        if thickness < limit {
            Ok(())
        } else {
            Err(self.invalid(
                keys::WALL_THICKNESS,
                format!("thickness {} leaves no interior (limit {})", thickness, limit),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector2;

    fn h_400() -> SectionDescriptor {
        SectionDescriptor::h_shape(400.0, 200.0, 8.0, 13.0)
    }

    #[test]
    fn test_h_shape_for_beam_is_top_center() {
        let factory = ProfileFactory::default();
        let profile = factory.resolve(&h_400(), ElementClass::Beam).unwrap();

        assert_eq!(profile.alignment, ProfileAlignment::TopCenter);
        assert_eq!(profile.offset, Vector2::new(0.0, -200.0));
        assert_eq!(profile.name, "HProfile_200.0x400.0x8.0x13.0_FR13.0");
        assert!(!profile.is_fallback());
        match profile.shape {
            ProfileShape::IShape { fillet_radius, .. } => assert_relative_eq!(fillet_radius, 13.0),
            ref other => panic!("expected I shape, got {:?}", other),
        }
    }

    #[test]
    fn test_h_shape_for_column_is_centered() {
        let factory = ProfileFactory::default();
        let profile = factory.resolve(&h_400(), ElementClass::Column).unwrap();
        assert_eq!(profile.offset, Vector2::zeros());
    }

    #[test]
    fn test_brace_alignment_depends_on_shape() {
        let factory = ProfileFactory::default();
        let h = factory.resolve(&h_400(), ElementClass::Brace).unwrap();
        assert_eq!(h.alignment, ProfileAlignment::TopCenter);

        let angle = SectionDescriptor::new("L")
            .with(keys::WIDTH, 90.0)
            .with(keys::HEIGHT, 90.0)
            .with(keys::THICKNESS, 7.0);
        let l = factory.resolve(&angle, ElementClass::Brace).unwrap();
        assert_eq!(l.alignment, ProfileAlignment::Centered);
        assert_eq!(l.name, "LProfile_90.0x90.0x7.0");
    }

    #[test]
    fn test_missing_dimension_is_parameter_error() {
        let factory = ProfileFactory::default();
        let section = SectionDescriptor::new(SectionType::H)
            .with(keys::OVERALL_WIDTH, 200.0)
            .with(keys::OVERALL_DEPTH, 400.0);
        let err = factory.resolve(&section, ElementClass::Beam).unwrap_err();
        match err {
            Error::ParameterValidation { parameter, .. } => {
                assert_eq!(parameter, keys::WEB_THICKNESS)
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_non_positive_dimension_is_rejected() {
        let factory = ProfileFactory::default();
        let section = SectionDescriptor::rectangle(-300.0, 600.0);
        assert!(matches!(
            factory.resolve(&section, ElementClass::Column),
            Err(Error::ParameterValidation { .. })
        ));
    }

    #[test]
    fn test_hollow_wall_too_thick() {
        let factory = ProfileFactory::default();
        let section = SectionDescriptor::new("BOX")
            .with(keys::WIDTH, 100.0)
            .with(keys::HEIGHT, 100.0)
            .with(keys::WALL_THICKNESS, 50.0);
        assert!(factory.resolve(&section, ElementClass::Column).is_err());
    }

    #[test]
    fn test_alternative_keys() {
        let factory = ProfileFactory::default();
        let pipe = SectionDescriptor::new("STK")
            .with(keys::OUTER_DIAMETER, 216.3)
            .with(keys::THICKNESS, 8.2);
        let profile = factory.resolve(&pipe, ElementClass::Brace).unwrap();
        assert_eq!(profile.name, "PipeProfile_216.3x8.2");
        match profile.shape {
            ProfileShape::CircleHollow { radius, .. } => assert_relative_eq!(radius, 108.15),
            ref other => panic!("expected hollow circle, got {:?}", other),
        }

        let rect = SectionDescriptor::new("RECTANGLE")
            .with(keys::WIDTH_X, 600.0)
            .with(keys::WIDTH_Y, 800.0);
        let profile = factory.resolve(&rect, ElementClass::Column).unwrap();
        assert_eq!(profile.shape, ProfileShape::Rectangle { width: 600.0, height: 800.0 });
    }

    #[test]
    fn test_flanged_shapes_must_leave_a_web() {
        let factory = ProfileFactory::default();
        let channel = |depth: f64, flange_width: f64, web: f64, flange: f64| {
            SectionDescriptor::new(SectionType::Channel)
                .with(keys::OVERALL_DEPTH, depth)
                .with(keys::FLANGE_WIDTH, flange_width)
                .with(keys::WEB_THICKNESS, web)
                .with(keys::FLANGE_THICKNESS, flange)
        };
        assert!(factory.resolve(&channel(150.0, 75.0, 6.5, 10.0), ElementClass::Beam).is_ok());

        // Two 80 mm flanges overlap in a 150 mm depth
        match factory.resolve(&channel(150.0, 75.0, 6.5, 80.0), ElementClass::Beam) {
            Err(Error::ParameterValidation { parameter, .. }) => {
                assert_eq!(parameter, keys::FLANGE_THICKNESS)
            }
            other => panic!("unexpected result {:?}", other),
        }
        match factory.resolve(&channel(150.0, 75.0, 75.0, 10.0), ElementClass::Beam) {
            Err(Error::ParameterValidation { parameter, .. }) => {
                assert_eq!(parameter, keys::WEB_THICKNESS)
            }
            other => panic!("unexpected result {:?}", other),
        }

        let zee = SectionDescriptor::new(SectionType::Zee)
            .with(keys::OVERALL_DEPTH, 100.0)
            .with(keys::FLANGE_WIDTH, 50.0)
            .with(keys::WEB_THICKNESS, 3.2)
            .with(keys::FLANGE_THICKNESS, 50.0);
        assert!(factory.resolve(&zee, ElementClass::Brace).is_err());

        // A tee has a single flange, so the same thickness still fits
        let tee = SectionDescriptor::new(SectionType::Tee)
            .with(keys::OVERALL_DEPTH, 100.0)
            .with(keys::FLANGE_WIDTH, 100.0)
            .with(keys::WEB_THICKNESS, 6.0)
            .with(keys::FLANGE_THICKNESS, 50.0);
        assert!(factory.resolve(&tee, ElementClass::Brace).is_ok());
    }

    #[test]
    fn test_compound_channel_defaults_to_double_width() {
        let factory = ProfileFactory::default();
        let section = SectionDescriptor::new("2C")
            .with(keys::OVERALL_DEPTH, 150.0)
            .with(keys::FLANGE_WIDTH, 75.0)
            .with(keys::WEB_THICKNESS, 6.5)
            .with(keys::FLANGE_THICKNESS, 10.0);
        let profile = factory.resolve(&section, ElementClass::Brace).unwrap();
        match profile.shape {
            ProfileShape::Channel { flange_width, .. } => assert_relative_eq!(flange_width, 150.0),
            ref other => panic!("expected channel, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_tag_falls_back_to_rectangle() {
        let factory = ProfileFactory::default();
        let section = SectionDescriptor::new("ZEE");
        let profile = factory.resolve(&section, ElementClass::Beam).unwrap();

        assert!(profile.is_fallback());
        assert_eq!(profile.shape, ProfileShape::Rectangle { width: 300.0, height: 600.0 });
        assert_eq!(profile.name, "ZEEProfile_300.0x600.0");
        // Beams still hang from the axis
        assert_eq!(profile.offset, Vector2::new(0.0, -300.0));
    }

    #[test]
    fn test_fallback_uses_available_dimensions() {
        let factory = ProfileFactory::default();
        let section = SectionDescriptor::new("CROSS_H")
            .with(keys::OVERALL_WIDTH, 450.0)
            .with(keys::OVERALL_DEPTH, 450.0);
        let profile = factory.resolve(&section, ElementClass::Column).unwrap();
        assert_eq!(profile.shape, ProfileShape::Rectangle { width: 450.0, height: 450.0 });
    }

    #[test]
    fn test_fallback_sizes_are_per_class() {
        let factory = ProfileFactory::default();
        let section = SectionDescriptor::new("MYSTERY");
        let column = factory.resolve(&section, ElementClass::Column).unwrap();
        let brace = factory.resolve(&section, ElementClass::Brace).unwrap();
        assert_eq!(column.shape, ProfileShape::Rectangle { width: 600.0, height: 600.0 });
        assert_eq!(brace.shape, ProfileShape::Rectangle { width: 100.0, height: 100.0 });
    }

    #[test]
    fn test_cache_is_structural() {
        let factory = ProfileFactory::default();
        let a = h_400().named("H-400x200x8x13");
        let b = h_400().named("another label");
        let c = SectionDescriptor::h_shape(400.0, 200.0, 8.0, 12.0).named("H-400x200x8x13");

        let pa = factory.resolve(&a, ElementClass::Beam).unwrap();
        let pb = factory.resolve(&b, ElementClass::Beam).unwrap();
        let pc = factory.resolve(&c, ElementClass::Beam).unwrap();

        assert!(Arc::ptr_eq(&pa, &pb));
        assert!(!Arc::ptr_eq(&pa, &pc));

        let stats = factory.cache_stats();
        assert_eq!(stats, CacheStats { entries: 2, hits: 1, misses: 2 });
    }

    #[test]
    fn test_cache_hit_equals_miss() {
        let factory = ProfileFactory::default();
        let first = factory.resolve(&h_400(), ElementClass::Beam).unwrap();
        let fresh = ProfileFactory::default()
            .resolve(&h_400(), ElementClass::Beam)
            .unwrap();
        let second = factory.resolve(&h_400(), ElementClass::Beam).unwrap();
        assert_eq!(*first, *fresh);
        assert_eq!(*second, *fresh);
    }

    #[test]
    fn test_alignment_is_part_of_the_key() {
        let factory = ProfileFactory::default();
        let beam = factory.resolve(&h_400(), ElementClass::Beam).unwrap();
        let column = factory.resolve(&h_400(), ElementClass::Column).unwrap();
        assert_ne!(beam.offset, column.offset);
        assert_eq!(factory.cache_stats().entries, 2);
    }

    #[test]
    fn test_prewarm_and_clear() {
        let factory = ProfileFactory::default();
        let sections = vec![
            h_400(),
            h_400(),
            SectionDescriptor::rectangle(300.0, 600.0),
            SectionDescriptor::new("H"), // missing dimensions
        ];
        let refs: Vec<&SectionDescriptor> = sections.iter().collect();

        assert_eq!(factory.prewarm(&refs, ElementClass::Beam), 2);
        assert_eq!(factory.cache_stats().entries, 2);

        factory.resolve(&h_400(), ElementClass::Beam).unwrap();
        assert_eq!(factory.cache_stats().hits, 1);

        factory.clear_cache();
        assert_eq!(factory.cache_stats(), CacheStats::default());
    }

    #[test]
    fn test_modern_naming() {
        let config = GeometryConfig {
            naming: NamingMode::Modern,
            ..GeometryConfig::default()
        };
        let factory = ProfileFactory::new(&config);
        let profile = factory.resolve(&h_400(), ElementClass::Column).unwrap();
        assert_eq!(profile.name, "H_200.0x400.0x8.0x13.0");
    }
}
