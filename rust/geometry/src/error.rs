// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use stbifc_core::ElementClass;
use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building element geometry
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Degenerate length, polygon or inconsistent haunch lengths
    #[error("Geometry validation failed for {element}: {issue}")]
    GeometryValidation { element: ElementClass, issue: String },

    /// Missing or out-of-range section dimension
    #[error("Invalid parameter '{parameter}' for {element}: {message}")]
    ParameterValidation {
        element: ElementClass,
        parameter: String,
        message: String,
    },

    /// Unknown section tag. Reported as a warning; a fallback profile is used.
    #[error("Section type '{section_type}' is not supported for {element}")]
    SectionTypeNotSupported {
        section_type: String,
        element: ElementClass,
    },

    #[error("Invalid extrusion parameters: {0}")]
    InvalidExtrusion(String),

    #[error("Authoring backend error: {0}")]
    Backend(String),

    #[error("No processor registered for {0}")]
    UnsupportedElement(ElementClass),

    #[error("Core data error: {0}")]
    CoreError(#[from] stbifc_core::Error),
}

impl Error {
    pub fn geometry(element: ElementClass, issue: impl Into<String>) -> Self {
        Self::GeometryValidation {
            element,
            issue: issue.into(),
        }
    }

    pub fn parameter(
        element: ElementClass,
        parameter: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::ParameterValidation {
            element,
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Short machine-readable kind used in reports
    pub fn kind(&self) -> &'static str {
        match self {
            Self::GeometryValidation { .. } => "geometry_validation",
            Self::ParameterValidation { .. } => "parameter_validation",
            Self::SectionTypeNotSupported { .. } => "section_type_not_supported",
            Self::InvalidExtrusion(_) => "invalid_extrusion",
            Self::Backend(_) => "backend",
            Self::UnsupportedElement(_) => "unsupported_element",
            Self::CoreError(_) => "core",
        }
    }
}
