//! The unit of validation output.

use std::fmt;

use serde::Serialize;

/// What a [`Finding`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// The document could not be read or parsed at all.
    ParseFailure,
    /// The package id is absent or empty.
    MissingId,
    /// The package id exceeds the maximum identifier length.
    IdTooLong,
    /// The package id violates the identifier grammar.
    InvalidId,
    /// One of the icon, project or license URLs is not a well-formed absolute URL.
    InvalidUrl,
    /// The version is absent or unparseable.
    InvalidVersion,
    /// A declared dependency has an invalid id or version range.
    InvalidDependency,
    /// A group declares an unparseable target framework.
    InvalidTargetFramework,
}

/// One reported validation problem, carrying a fully formatted message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    kind: FindingKind,
    message: String,
}

impl Finding {
    /// Creates a finding from an already formatted message.
    pub fn new(kind: FindingKind, message: impl Into<String>) -> Self {
        Finding {
            kind,
            message: message.into(),
        }
    }

    /// What this finding reports.
    pub fn kind(&self) -> FindingKind {
        self.kind
    }

    /// The human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FindingKind::ParseFailure => "parse_failure",
            FindingKind::MissingId => "missing_id",
            FindingKind::IdTooLong => "id_too_long",
            FindingKind::InvalidId => "invalid_id",
            FindingKind::InvalidUrl => "invalid_url",
            FindingKind::InvalidVersion => "invalid_version",
            FindingKind::InvalidDependency => "invalid_dependency",
            FindingKind::InvalidTargetFramework => "invalid_target_framework",
        };
        f.write_str(s)
    }
}
