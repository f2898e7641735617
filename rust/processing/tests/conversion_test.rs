// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end conversion of a small JSON model

use approx::assert_relative_eq;
use stbifc_core::ElementClass;
use stbifc_geometry::{
    DeterministicIdentityProvider, EntityKind, GeometryKind, RecordingBackend, WarningKind,
};
use stbifc_processing::{load_definitions, ConversionConfig, ConversionReport, StructuralConverter};

const MODEL: &str = r#"[
    {
        "type": "beam",
        "identity": { "name": "G1", "tag": "STB_G_1" },
        "start": [0.0, 0.0, 3000.0],
        "end": [6000.0, 0.0, 3000.0],
        "sections": {
            "kind": "uniform",
            "section": {
                "section_type": "H",
                "dimensions": { "overall_depth": 400.0, "overall_width": 200.0, "web_thickness": 8.0, "flange_thickness": 12.0 }
            }
        }
    },
    {
        "type": "beam",
        "identity": { "name": "G2", "tag": "STB_G_2", "external_id": "3f2504e0-4f89-11d3-9a0c-0305e82c3301" },
        "start": [0.0, 6000.0, 3000.0],
        "end": [8000.0, 6000.0, 3000.0],
        "sections": {
            "kind": "haunch",
            "haunch_start": 1000.0,
            "haunch_end": 1000.0,
            "zones": {
                "START": { "section_type": "H", "dimensions": { "overall_depth": 600.0, "overall_width": 200.0, "web_thickness": 9.0, "flange_thickness": 16.0 } },
                "CENTER": { "section_type": "H", "dimensions": { "overall_depth": 400.0, "overall_width": 200.0, "web_thickness": 8.0, "flange_thickness": 12.0 } },
                "END": { "section_type": "H", "dimensions": { "overall_depth": 600.0, "overall_width": 200.0, "web_thickness": 9.0, "flange_thickness": 16.0 } }
            }
        }
    },
    {
        "type": "column",
        "identity": { "name": "C1" },
        "bottom": [0.0, 0.0, 0.0],
        "top": [0.0, 0.0, 3000.0],
        "sections": { "kind": "uniform", "section": { "section_type": "BCR", "dimensions": { "width": 400.0, "height": 400.0, "thickness": 19.0 } } },
        "is_reference_direction": false
    },
    {
        "type": "brace",
        "identity": { "name": "V1" },
        "start": [0.0, 0.0, 0.0],
        "end": [6000.0, 0.0, 3000.0],
        "sections": { "kind": "uniform", "section": { "section_type": "ZEE" } }
    },
    {
        "type": "wall",
        "identity": { "name": "W1", "tag": "STB_W_1" },
        "points": [[0.0, 0.0, 0.0], [6000.0, 0.0, 0.0], [6000.0, 0.0, 3000.0], [0.0, 0.0, 3000.0]],
        "thickness": 250.0,
        "openings": [
            { "id": "1", "offset_x": 2000.0, "offset_y": 1000.0, "width": 1000.0, "height": 2000.0 }
        ]
    },
    {
        "type": "slab",
        "identity": { "name": "S1" },
        "points": [[0.0, 0.0, 3000.0], [6000.0, 0.0, 3000.0], [6000.0, 6000.0, 3000.0], [0.0, 6000.0, 3000.0]]
    },
    {
        "type": "beam",
        "identity": { "name": "G9" },
        "start": [0.0, 0.0, 0.0],
        "end": [3000.0, 0.0, 0.0],
        "sections": { "kind": "uniform", "section": { "section_type": "PIPE", "dimensions": { "thickness": 8.2 } } }
    }
]"#;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn convert(config: ConversionConfig) -> (ConversionReport, RecordingBackend) {
    init_tracing();
    let definitions = load_definitions(MODEL).expect("fixture parses");
    let converter = StructuralConverter::new(config);
    let mut backend = RecordingBackend::new();
    let report = converter.convert(&definitions, &mut backend, &DeterministicIdentityProvider);
    (report, backend)
}

#[test]
fn test_model_converts_with_partial_failure() {
    let (report, backend) = convert(ConversionConfig::default());

    // G9 lacks its pipe diameter; everything else is produced
    assert_eq!(report.error_count(), 1);
    assert_eq!(report.errors[0].element, "G9");
    assert_eq!(report.errors[0].kind, "parameter_validation");
    assert!(!report.is_success());

    // Haunch beam fans out into three segments
    assert_eq!(report.produced_count(), 8);
    let beams = report.counts(ElementClass::Beam);
    assert_eq!((beams.input, beams.produced, beams.failed), (3, 4, 1));

    let members = backend
        .elements()
        .iter()
        .filter(|e| matches!(e.kind, EntityKind::Member(_)))
        .count();
    assert_eq!(members, 8);
    assert_eq!(backend.elements_of(EntityKind::Opening).count(), 1);
    assert_eq!(backend.void_relations().len(), 1);
}

#[test]
fn test_haunch_segments_are_named_by_zone() {
    let (report, _) = convert(ConversionConfig::default());
    let names: Vec<&str> = report
        .produced
        .iter()
        .filter(|p| p.name.starts_with("G2"))
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(names, ["G2_START", "G2_CENTER", "G2_END"]);

    let depths: f64 = report
        .produced
        .iter()
        .filter(|p| p.name.starts_with("G2"))
        .map(|p| p.depth)
        .sum();
    assert_relative_eq!(depths, 8000.0, epsilon = 1e-6);
}

#[test]
fn test_warnings_are_reported() {
    let (report, _) = convert(ConversionConfig::default());

    let fallback: Vec<_> = report
        .warnings
        .iter()
        .filter(|w| w.kind == WarningKind::FallbackProfile)
        .collect();
    assert_eq!(fallback.len(), 1);
    assert_eq!(fallback[0].element, "V1");

    let brace = report.produced.iter().find(|p| p.name == "V1").unwrap();
    assert_eq!(brace.profile_name, "ZEEProfile_100.0x100.0");
    assert_eq!(brace.geometry, GeometryKind::Extrusion);

    let wall = report.produced.iter().find(|p| p.name == "W1").unwrap();
    assert_eq!(wall.openings, ["Opening_1"]);
}

#[test]
fn test_report_is_deterministic() {
    let (first, _) = convert(ConversionConfig::default());
    let (second, _) = convert(ConversionConfig::default());

    let guids = |report: &ConversionReport| {
        report
            .produced
            .iter()
            .map(|p| p.guid.as_str().to_string())
            .collect::<Vec<_>>()
    };
    assert_eq!(guids(&first), guids(&second));
}

#[test]
fn test_report_json() {
    let (report, _) = convert(ConversionConfig::default());
    let json = report.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["errors"][0]["element"], "G9");
    assert_eq!(value["per_class"]["wall"]["produced"], 1);
    assert_eq!(value["warnings"][0]["kind"], "fallback_profile");
}

#[test]
fn test_fail_fast_run() {
    let (report, _) = convert(ConversionConfig {
        fail_fast: true,
        ..ConversionConfig::default()
    });
    // G9 is last, so everything before it is still produced
    assert!(report.aborted);
    assert_eq!(report.skipped, 0);
    assert_eq!(report.produced_count(), 8);
}

#[test]
fn test_invalid_json_is_an_error() {
    assert!(load_definitions("[{\"type\": \"truss\"}]").is_err());
}

const FOUNDATIONS: &str = r#"[
    {
        "type": "pile",
        "identity": { "name": "P1", "tag": "STB_P_1" },
        "bottom": [0.0, 0.0, -12000.0],
        "top": [0.0, 0.0, -1500.0],
        "section": { "section_type": "CIRCLE", "dimensions": { "diameter": 1000.0 } }
    },
    {
        "type": "footing",
        "identity": { "name": "F1" },
        "bottom": [0.0, 0.0, -2300.0],
        "width_x": 2400.0,
        "width_y": 2400.0,
        "depth": 800.0
    },
    { "type": "footing", "identity": { "name": "F2" }, "bottom": [6000.0, 0.0, -2300.0] }
]"#;

#[test]
fn test_foundations_convert() {
    init_tracing();
    let definitions = load_definitions(FOUNDATIONS).expect("fixture parses");
    let converter = StructuralConverter::default();
    let mut backend = RecordingBackend::new();
    let report = converter.convert(&definitions, &mut backend, &DeterministicIdentityProvider);

    assert!(report.is_success());
    assert_eq!(report.counts(ElementClass::Pile).produced, 1);
    assert_eq!(report.counts(ElementClass::Footing).produced, 2);

    let pile = report.produced.iter().find(|p| p.name == "P1").unwrap();
    assert_eq!(pile.profile_name, "CircleProfile_1000.0");
    assert_relative_eq!(pile.depth, 10500.0, epsilon = 1e-9);

    let footing = report.produced.iter().find(|p| p.name == "F2").unwrap();
    assert_eq!(footing.profile_name, "RectProfile_1000.0x1000.0");
    assert_relative_eq!(footing.depth, 1000.0);

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["per_class"]["footing"]["produced"], 2);
}
