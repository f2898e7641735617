// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::backend::{EntityKind, RecordingBackend, SolidRecord};
use crate::config::GeometryConfig;
use crate::error::Error;
use crate::extrusion::GeometryKind;
use crate::identity::DeterministicIdentityProvider;
use crate::router::{ElementGeometry, ElementRouter, GeometryWarning, WarningKind};
use crate::Result;
use approx::assert_relative_eq;
use nalgebra::Vector3;
use stbifc_core::{
    ColumnMember, ElementClass, ElementDefinition, ElementIdentity, FootingMember, HaunchSections,
    HaunchZone, LinearMember, MemberSections, OpeningDefinition, PileMember, PlanarMember, Point3D,
    SectionDescriptor,
};

fn run(
    router: &ElementRouter,
    backend: &mut RecordingBackend,
    element: &ElementDefinition,
) -> (Result<Vec<ElementGeometry>>, Vec<GeometryWarning>) {
    let identity = DeterministicIdentityProvider;
    let mut ctx = router.context(backend, &identity);
    let result = router.process(element, &mut ctx);
    (result, ctx.take_warnings())
}

fn h_section() -> SectionDescriptor {
    SectionDescriptor::h_shape(400.0, 200.0, 8.0, 12.0)
}

fn wall_points() -> Vec<Point3D> {
    vec![
        Point3D::new(0.0, 0.0, 0.0),
        Point3D::new(6000.0, 0.0, 0.0),
        Point3D::new(6000.0, 3000.0, 0.0),
        Point3D::new(0.0, 3000.0, 0.0),
    ]
}

#[test]
fn test_brace_with_haunch_is_rejected() {
    let router = ElementRouter::new();
    let mut backend = RecordingBackend::new();
    let haunch = HaunchSections::new(500.0, 500.0).with_zone(HaunchZone::Center, h_section());
    let brace = ElementDefinition::Brace(LinearMember::new(
        ElementIdentity::new("V1"),
        Point3D::new(0.0, 0.0, 0.0),
        Point3D::new(4000.0, 0.0, 3000.0),
        MemberSections::Haunch(haunch),
    ));

    let (result, _) = run(&router, &mut backend, &brace);
    assert!(matches!(result, Err(Error::ParameterValidation { .. })));
    assert!(backend.elements().is_empty());
}

#[test]
fn test_haunch_without_sections_emits_nothing() {
    let router = ElementRouter::new();
    let mut backend = RecordingBackend::new();
    // END section is unresolvable, so no segment may be produced
    let haunch = HaunchSections::new(1000.0, 1000.0)
        .with_zone(HaunchZone::Start, h_section())
        .with_zone(HaunchZone::Center, h_section())
        .with_zone(HaunchZone::End, SectionDescriptor::new("H"));
    let beam = ElementDefinition::Beam(LinearMember::new(
        ElementIdentity::new("G2"),
        Point3D::new(0.0, 0.0, 0.0),
        Point3D::new(8000.0, 0.0, 0.0),
        MemberSections::Haunch(haunch),
    ));

    let (result, _) = run(&router, &mut backend, &beam);
    assert!(result.is_err());
    assert!(backend.elements().is_empty());
}

#[test]
fn test_haunch_segments_share_the_beam_axis() {
    let router = ElementRouter::new();
    let mut backend = RecordingBackend::new();
    let deep = SectionDescriptor::h_shape(600.0, 200.0, 9.0, 16.0);
    let haunch = HaunchSections::new(1000.0, 1000.0)
        .with_zone(HaunchZone::Start, deep.clone())
        .with_zone(HaunchZone::Center, h_section())
        .with_zone(HaunchZone::End, deep);
    let beam = ElementDefinition::Beam(LinearMember::new(
        ElementIdentity::new("G3").with_tag("STB_G_3").with_external_id("G3-guid"),
        Point3D::new(0.0, 0.0, 3000.0),
        Point3D::new(8000.0, 0.0, 3000.0),
        MemberSections::Haunch(haunch),
    ));

    let (result, warnings) = run(&router, &mut backend, &beam);
    let produced = result.unwrap();
    assert!(warnings.is_empty());
    assert_eq!(produced.len(), 3);
    assert_eq!(produced[2].name, "G3_END");
    assert_eq!(produced[2].tag, "STB_G_3_END");
    assert_eq!(produced[0].guid.as_str().len(), 22);
    assert_ne!(produced[0].guid, produced[1].guid);

    // Two distinct sections -> two profile definitions
    assert_eq!(backend.profiles().len(), 2);
    let centre = backend.placement(produced[1].placement).unwrap();
    assert_relative_eq!(centre.origin, Point3D::new(4000.0, 0.0, 3000.0), epsilon = 1e-9);
    assert!((produced[1].geometry.depth - 6000.0).abs() < 1e-9);
}

#[test]
fn test_column_placement_and_base_extrusion() {
    let router = ElementRouter::new();
    let mut backend = RecordingBackend::new();
    let column = ElementDefinition::Column(
        ColumnMember::new(
            ElementIdentity::new("C1"),
            Point3D::new(1000.0, 2000.0, 0.0),
            Point3D::new(1000.0, 2000.0, 3500.0),
            MemberSections::uniform(SectionDescriptor::rectangle(600.0, 600.0)),
        )
        .with_rotation(0.0, false),
    );

    let (result, _) = run(&router, &mut backend, &column);
    let produced = result.unwrap();
    let placement = backend.placement(produced[0].placement).unwrap();
    assert_eq!(placement.origin, Point3D::new(1000.0, 2000.0, 0.0));
    assert_relative_eq!(placement.ref_direction, Vector3::y(), epsilon = 1e-12);

    match backend.solid(produced[0].geometry.solids[0]).unwrap() {
        SolidRecord::Extruded { position, depth, .. } => {
            assert_eq!(position.origin.z, 0.0);
            assert!((depth - 3500.0).abs() < 1e-9);
        }
        other => panic!("unexpected solid {:?}", other),
    }
}

#[test]
fn test_tapered_column_records_downgrades() {
    let router = ElementRouter::new();
    let mut backend = RecordingBackend::new().rejecting_sweeps();
    let column = ElementDefinition::Column(ColumnMember::new(
        ElementIdentity::new("C2"),
        Point3D::new(0.0, 0.0, 0.0),
        Point3D::new(0.0, 0.0, 4000.0),
        MemberSections::tapered(
            SectionDescriptor::rectangle(600.0, 600.0),
            SectionDescriptor::rectangle(500.0, 500.0),
        ),
    ));

    let (result, warnings) = run(&router, &mut backend, &column);
    let produced = result.unwrap();
    assert_eq!(produced[0].geometry.kind, GeometryKind::SectionedSpine);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].kind, WarningKind::RepresentationDowngrade);
}

fn mixed_type_column(name: &str) -> ElementDefinition {
    ElementDefinition::Column(ColumnMember::new(
        ElementIdentity::new(name),
        Point3D::new(0.0, 0.0, 0.0),
        Point3D::new(0.0, 0.0, 4000.0),
        MemberSections::tapered(h_section(), SectionDescriptor::rectangle(500.0, 500.0)),
    ))
}

fn stepping_router() -> ElementRouter {
    ElementRouter::with_config(GeometryConfig {
        taper_steps: 4,
        ..GeometryConfig::default()
    })
}

#[test]
fn test_mixed_type_taper_is_swept_when_accepted() {
    let mut backend = RecordingBackend::new();
    let (result, warnings) = run(&stepping_router(), &mut backend, &mixed_type_column("C3"));
    let produced = result.unwrap();
    assert_eq!(produced[0].geometry.kind, GeometryKind::TaperedSweep);
    assert!(warnings.is_empty());
    assert_eq!(backend.profiles().len(), 2);
}

#[test]
fn test_mixed_type_taper_falls_back_past_stepping() {
    let mut backend = RecordingBackend::new()
        .rejecting_sweeps()
        .rejecting_sectioned_spines();
    let (result, warnings) = run(&stepping_router(), &mut backend, &mixed_type_column("C4"));

    // H and RECTANGLE cannot be interpolated; the column is still produced
    let produced = result.unwrap();
    let geometry = &produced[0].geometry;
    assert_eq!(geometry.kind, GeometryKind::FallbackExtrusion);
    assert_eq!(geometry.solids.len(), 1);
    assert!(geometry.profile_name.starts_with("HProfile_"));
    assert_eq!(backend.solids().len(), 1);

    assert_eq!(warnings.len(), 4);
    assert!(warnings
        .iter()
        .all(|w| w.kind == WarningKind::RepresentationDowngrade && w.element == "C4"));
    assert!(warnings[2].message.starts_with("stepped taper failed"));
}

#[test]
fn test_mixed_type_taper_without_steps() {
    let router = ElementRouter::new();
    let mut backend = RecordingBackend::new()
        .rejecting_sweeps()
        .rejecting_sectioned_spines();
    let (result, warnings) = run(&router, &mut backend, &mixed_type_column("C5"));

    let produced = result.unwrap();
    assert_eq!(produced[0].geometry.kind, GeometryKind::FallbackExtrusion);
    assert_eq!(warnings.len(), 3);
    assert!(!warnings.iter().any(|w| w.message.contains("stepped")));
}

#[test]
fn test_unsupported_section_warns_but_produces() {
    let router = ElementRouter::new();
    let mut backend = RecordingBackend::new();
    let brace = ElementDefinition::Brace(LinearMember::new(
        ElementIdentity::new("V2"),
        Point3D::new(0.0, 0.0, 0.0),
        Point3D::new(3000.0, 0.0, 3000.0),
        MemberSections::uniform(SectionDescriptor::new("WIRE")),
    ));

    let (result, warnings) = run(&router, &mut backend, &brace);
    assert_eq!(result.unwrap().len(), 1);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].kind, WarningKind::FallbackProfile);
    assert_eq!(warnings[0].element, "V2");
    assert_eq!(backend.profiles()[0].name, "WIREProfile_100.0x100.0");
}

#[test]
fn test_wall_with_openings() {
    let router = ElementRouter::new();
    let mut backend = RecordingBackend::new();
    let wall = ElementDefinition::Wall(
        PlanarMember::new(ElementIdentity::new("W1").with_tag("STB_W_1"), wall_points())
            .with_thickness(250.0)
            .with_opening(OpeningDefinition::new("1", 2000.0, 1000.0, 1000.0, 2000.0))
            .with_opening(OpeningDefinition::new("2", 4500.0, 0.0, -10.0, 2000.0)),
    );

    let (result, warnings) = run(&router, &mut backend, &wall);
    let produced = result.unwrap();
    assert_eq!(produced.len(), 1);
    let wall = &produced[0];
    assert_eq!(wall.openings.len(), 1);

    // Second opening is skipped, wall still produced
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].kind, WarningKind::SkippedOpening);

    let opening = &wall.openings[0];
    assert_eq!(opening.name, "Opening_1");
    let placement = backend.placement(opening.placement).unwrap();
    assert_eq!(placement.parent, Some(wall.placement));
    assert_relative_eq!(placement.origin, Point3D::new(-500.0, 500.0, 0.0), epsilon = 1e-9);

    let relations = backend.void_relations();
    assert_eq!(relations.len(), 1);
    assert_eq!(relations[0].name, "WallVoiding_1");
    assert_eq!(relations[0].host, wall.element);
    assert_eq!(backend.elements_of(EntityKind::Opening).count(), 1);
}

#[test]
fn test_collinear_wall_fails_after_fallback_frame() {
    let router = ElementRouter::new();
    let mut backend = RecordingBackend::new();
    let wall = ElementDefinition::Wall(PlanarMember::new(
        ElementIdentity::new("W2"),
        vec![
            Point3D::new(0.0, 0.0, 0.0),
            Point3D::new(1000.0, 0.0, 0.0),
            Point3D::new(2000.0, 0.0, 0.0),
        ],
    ));

    let identity = DeterministicIdentityProvider;
    let mut ctx = router.context(&mut backend, &identity);
    ctx.warn(&ElementIdentity::new("W0"), ElementClass::Wall, WarningKind::SkippedOpening, "earlier element");

    let result = router.process(&wall, &mut ctx);
    assert!(matches!(result, Err(Error::GeometryValidation { element: ElementClass::Wall, .. })));
    // The fallback-frame warning goes away with the element; earlier ones stay
    let warnings = ctx.take_warnings();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].element, "W0");
}

#[test]
fn test_failed_element_keeps_no_fallback_warning() {
    let router = ElementRouter::new();
    let mut backend = RecordingBackend::new().failing_on("G8");
    let beam = ElementDefinition::Beam(LinearMember::new(
        ElementIdentity::new("G8"),
        Point3D::new(0.0, 0.0, 0.0),
        Point3D::new(5000.0, 0.0, 0.0),
        MemberSections::uniform(SectionDescriptor::new("WIRE")),
    ));

    let (result, warnings) = run(&router, &mut backend, &beam);
    assert!(matches!(result, Err(Error::Backend(_))));
    assert!(warnings.is_empty());
}

#[test]
fn test_slab_defaults_and_ignored_openings() {
    let router = ElementRouter::new();
    let mut backend = RecordingBackend::new();
    let slab = ElementDefinition::Slab(
        PlanarMember::new(ElementIdentity::new("S1"), wall_points())
            .with_opening(OpeningDefinition::new("9", 0.0, 0.0, 500.0, 500.0)),
    );

    let (result, warnings) = run(&router, &mut backend, &slab);
    let produced = result.unwrap();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].kind, WarningKind::IgnoredOpenings);

    let placement = backend.placement(produced[0].placement).unwrap();
    assert_eq!(placement.origin, Point3D::new(3000.0, 1500.0, 0.0));
    match backend.solid(produced[0].geometry.solids[0]).unwrap() {
        SolidRecord::Extruded { direction, depth, .. } => {
            assert_eq!(direction.z, -1.0);
            assert!((depth - 150.0).abs() < 1e-9);
        }
        other => panic!("unexpected solid {:?}", other),
    }
}

#[test]
fn test_pile_is_a_circle_extruded_from_the_bottom() {
    let router = ElementRouter::new();
    let mut backend = RecordingBackend::new();
    let pile = ElementDefinition::Pile(
        PileMember::new(
            ElementIdentity::new("P1").with_tag("STB_P_1"),
            Point3D::new(1000.0, 1000.0, -12000.0),
            Point3D::new(1000.0, 1000.0, -1500.0),
        )
        .with_section(SectionDescriptor::new("CIRCLE").with("outer_diameter", 1200.0)),
    );

    let (result, warnings) = run(&router, &mut backend, &pile);
    let produced = result.unwrap();
    assert!(warnings.is_empty());
    assert_eq!(produced[0].kind, EntityKind::Member(ElementClass::Pile));
    assert_eq!(produced[0].geometry.profile_name, "CircleProfile_1200.0");

    let placement = backend.placement(produced[0].placement).unwrap();
    assert_eq!(placement.origin, Point3D::new(1000.0, 1000.0, -12000.0));
    assert_relative_eq!(placement.axis, Vector3::z(), epsilon = 1e-12);
    assert_relative_eq!(placement.ref_direction, Vector3::x(), epsilon = 1e-12);
    match backend.solid(produced[0].geometry.solids[0]).unwrap() {
        SolidRecord::Extruded { position, depth, .. } => {
            assert_eq!(position.origin.z, 0.0);
            assert_relative_eq!(*depth, 10500.0, epsilon = 1e-9);
        }
        other => panic!("unexpected solid {:?}", other),
    }
}

#[test]
fn test_pile_without_section_uses_default_diameter() {
    let router = ElementRouter::new();
    let mut backend = RecordingBackend::new();
    let pile = ElementDefinition::Pile(PileMember::new(
        ElementIdentity::new("P2"),
        Point3D::new(0.0, 0.0, -8000.0),
        Point3D::new(0.0, 0.0, -1000.0),
    ));

    let (result, _) = run(&router, &mut backend, &pile);
    assert_eq!(result.unwrap()[0].geometry.profile_name, "CircleProfile_500.0");

    let flat = ElementDefinition::Pile(PileMember::new(
        ElementIdentity::new("P3"),
        Point3D::new(0.0, 0.0, -1000.0),
        Point3D::new(0.0, 0.0, -1000.0),
    ));
    let (result, _) = run(&router, &mut backend, &flat);
    assert!(matches!(result, Err(Error::GeometryValidation { element: ElementClass::Pile, .. })));
}

#[test]
fn test_footing_defaults_and_size() {
    let router = ElementRouter::new();
    let mut backend = RecordingBackend::new();
    let footing = ElementDefinition::Footing(
        FootingMember::new(ElementIdentity::new("F1"), Point3D::new(0.0, 6000.0, -2000.0))
            .with_size(2400.0, 1800.0, 800.0),
    );

    let (result, warnings) = run(&router, &mut backend, &footing);
    let produced = result.unwrap();
    assert!(warnings.is_empty());
    assert_eq!(produced[0].geometry.profile_name, "RectProfile_2400.0x1800.0");
    let placement = backend.placement(produced[0].placement).unwrap();
    assert_eq!(placement.origin, Point3D::new(0.0, 6000.0, -2000.0));
    assert_eq!(placement.axis, Vector3::z());
    match backend.solid(produced[0].geometry.solids[0]).unwrap() {
        SolidRecord::Extruded { position, direction, depth, .. } => {
            assert_eq!(position.origin.z, 0.0);
            assert_eq!(*direction, Vector3::z());
            assert_relative_eq!(*depth, 800.0);
        }
        other => panic!("unexpected solid {:?}", other),
    }

    let plain = ElementDefinition::Footing(FootingMember::new(
        ElementIdentity::new("F2"),
        Point3D::origin(),
    ));
    let (result, _) = run(&router, &mut backend, &plain);
    let produced = result.unwrap();
    assert_eq!(produced[0].geometry.profile_name, "RectProfile_1000.0x1000.0");
    assert_relative_eq!(produced[0].geometry.depth, 1000.0);
}

#[test]
fn test_footing_with_bad_depth() {
    let router = ElementRouter::new();
    let mut backend = RecordingBackend::new();
    let mut definition = FootingMember::new(ElementIdentity::new("F3"), Point3D::origin());
    definition.depth = Some(0.0);

    let (result, _) = run(&router, &mut backend, &ElementDefinition::Footing(definition));
    match result {
        Err(Error::ParameterValidation { element, parameter, .. }) => {
            assert_eq!(element, ElementClass::Footing);
            assert_eq!(parameter, "depth");
        }
        other => panic!("unexpected result {:?}", other),
    }
    assert!(backend.elements().is_empty());
}

#[test]
fn test_backend_failure_is_an_error() {
    let router = ElementRouter::new();
    let mut backend = RecordingBackend::new().failing_on("G9");
    let beam = ElementDefinition::Beam(LinearMember::new(
        ElementIdentity::new("G9"),
        Point3D::new(0.0, 0.0, 0.0),
        Point3D::new(5000.0, 0.0, 0.0),
        MemberSections::uniform(h_section()),
    ));

    let (result, _) = run(&router, &mut backend, &beam);
    assert!(matches!(result, Err(Error::Backend(_))));
}
