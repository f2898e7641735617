// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Conversion configuration loaded from environment variables.

use stbifc_core::NamingMode;
use stbifc_geometry::GeometryConfig;
use std::str::FromStr;

/// Conversion run configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionConfig {
    /// Builder tolerances and defaults.
    pub geometry: GeometryConfig,
    /// Resolve every referenced section before converting.
    pub prewarm_profiles: bool,
    /// Stop at the first element error instead of skipping it.
    pub fail_fast: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            geometry: GeometryConfig::default(),
            prewarm_profiles: true,
            fail_fast: false,
        }
    }
}

impl ConversionConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable variables keep their default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let geometry = &defaults.geometry;

        let tolerance = parse_or(&lookup, "STBIFC_TOLERANCE", geometry.tolerance);
        let tolerance = if tolerance.is_finite() && tolerance > 0.0 {
            tolerance
        } else {
            geometry.tolerance
        };
        let opening_clearance =
            parse_or(&lookup, "STBIFC_OPENING_CLEARANCE", geometry.opening_clearance);
        let opening_clearance = if opening_clearance.is_finite() && opening_clearance >= 0.0 {
            opening_clearance
        } else {
            geometry.opening_clearance
        };
        let circle_segments = parse_or(&lookup, "STBIFC_CIRCLE_SEGMENTS", geometry.circle_segments);
        let taper_steps = parse_or(&lookup, "STBIFC_TAPER_STEPS", geometry.taper_steps);
        let naming = lookup("STBIFC_NAMING")
            .and_then(|value| NamingMode::from_name(&value))
            .unwrap_or(geometry.naming);

        Self {
            geometry: GeometryConfig {
                tolerance,
                opening_clearance,
                circle_segments,
                taper_steps,
                naming,
                ..defaults.geometry.clone()
            },
            prewarm_profiles: parse_flag(&lookup, "STBIFC_PREWARM_PROFILES", defaults.prewarm_profiles),
            fail_fast: parse_flag(&lookup, "STBIFC_FAIL_FAST", defaults.fail_fast),
        }
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "invalid configuration value, using default");
            default
        }),
        None => default,
    }
}

fn parse_flag(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: bool) -> bool {
    match lookup(key).map(|raw| raw.trim().to_ascii_lowercase()) {
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => true,
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => false,
        Some(v) => {
            tracing::warn!(key, value = %v, "invalid flag value, using default");
            default
        }
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;

    fn config(vars: &[(&str, &str)]) -> ConversionConfig {
        let vars: FxHashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ConversionConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_without_variables() {
        assert_eq!(config(&[]), ConversionConfig::default());
    }

    #[test]
    fn test_variables_override_defaults() {
        let config = config(&[
            ("STBIFC_TOLERANCE", "0.001"),
            ("STBIFC_CIRCLE_SEGMENTS", "48"),
            ("STBIFC_TAPER_STEPS", "4"),
            ("STBIFC_FAIL_FAST", "true"),
            ("STBIFC_PREWARM_PROFILES", "0"),
            ("STBIFC_NAMING", "modern"),
        ]);
        assert_eq!(config.geometry.tolerance, 0.001);
        assert_eq!(config.geometry.circle_segments, 48);
        assert_eq!(config.geometry.taper_steps, 4);
        assert_eq!(config.geometry.naming, NamingMode::Modern);
        assert!(config.fail_fast);
        assert!(!config.prewarm_profiles);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config(&[
            ("STBIFC_TOLERANCE", "-1"),
            ("STBIFC_OPENING_CLEARANCE", "lots"),
            ("STBIFC_CIRCLE_SEGMENTS", "many"),
            ("STBIFC_FAIL_FAST", "maybe"),
        ]);
        let defaults = ConversionConfig::default();
        assert_eq!(config.geometry.tolerance, defaults.geometry.tolerance);
        assert_eq!(config.geometry.opening_clearance, defaults.geometry.opening_clearance);
        assert_eq!(config.geometry.circle_segments, defaults.geometry.circle_segments);
        assert!(!config.fail_fast);
    }
}
