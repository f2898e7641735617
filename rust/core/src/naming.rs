// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Profile naming standards
//!
//! Profile names show up in the exported model and downstream tools match
//! on them, so the legacy layout (`HProfile_400.0x200.0x8.0x13.0_FR13.0`)
//! is the default. Whole numbers keep a single decimal place.

/// Naming convention for generated profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum NamingMode {
    /// Detailed names compatible with earlier converter output
    #[default]
    Legacy,
    /// Compact `{TAG}_{dims}` names
    Modern,
}

impl NamingMode {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "legacy" => Some(Self::Legacy),
            "modern" => Some(Self::Modern),
            _ => None,
        }
    }
}

/// Format a dimension the way the legacy names do (`200.0`, `5.5`, `216.3`)
pub fn format_dimension(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

fn join(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| format_dimension(*v))
        .collect::<Vec<_>>()
        .join("x")
}

/// H / I shape
pub fn h_profile_name(
    mode: NamingMode,
    width: f64,
    depth: f64,
    web: f64,
    flange: f64,
    fillet: f64,
) -> String {
    match mode {
        NamingMode::Legacy => format!(
            "HProfile_{}_FR{}",
            join(&[width, depth, web, flange]),
            format_dimension(fillet)
        ),
        NamingMode::Modern => format!("H_{}", join(&[width, depth, web, flange])),
    }
}

/// Rectangular hollow section
pub fn box_profile_name(mode: NamingMode, width: f64, height: f64, thickness: f64) -> String {
    match mode {
        NamingMode::Legacy => format!("BoxProfile_{}", join(&[width, height, thickness])),
        NamingMode::Modern => format!("BOX_{}", join(&[width, height, thickness])),
    }
}

pub fn pipe_profile_name(diameter: f64, thickness: f64) -> String {
    format!("PipeProfile_{}", join(&[diameter, thickness]))
}

pub fn rect_profile_name(width: f64, height: f64) -> String {
    format!("RectProfile_{}", join(&[width, height]))
}

pub fn circle_profile_name(diameter: f64) -> String {
    format!("CircleProfile_{}", format_dimension(diameter))
}

pub fn l_profile_name(width: f64, height: f64, thickness: f64) -> String {
    format!("LProfile_{}", join(&[width, height, thickness]))
}

/// Channel, tee and zee shapes share the depth x flange x web x flange layout
pub fn flanged_profile_name(prefix: &str, depth: f64, flange_width: f64, web: f64, flange: f64) -> String {
    format!("{}Profile_{}", prefix, join(&[depth, flange_width, web, flange]))
}

/// Anything without a dedicated rule
pub fn fallback_profile_name(tag: &str, width: f64, height: f64) -> String {
    format!("{}Profile_{}", tag, join(&[width, height]))
}
