//! # Package Versions
//!
//! Package manifests predate semantic versioning and still allow the older four-part
//! version scheme, so versions are parsed here rather than with [`semver::Version`]
//! directly. Pre-release labels and build metadata reuse the `semver` types so
//! their grammar stays exactly the semver one.
//!
//! Accepted versions have one to four numeric segments, an optional pre-release
//! label (`-beta.1`) and optional build metadata (`+sha.5114f85`):
//!
//! ```rust
//! use manifest::version::PackageVersion;
//!
//! let v: PackageVersion = "1.0".parse().unwrap();
//! assert_eq!(v.to_string(), "1.0.0");
//!
//! let v: PackageVersion = "2.1.0.7-rc.1".parse().unwrap();
//! assert_eq!(v.revision(), 7);
//! assert!("1.2.3.4.5.6".parse::<PackageVersion>().is_err());
//! ```
//!
//! [`VersionRange`] parses the interval notation used by dependency declarations,
//! such as `1.0`, `[1.0]`, `[1.0,2.0)` or `(,3.0]`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use lazy_regex::{Lazy, Regex};
use semver::{BuildMetadata, Prerelease};
use thiserror::Error;

//================================================================================================
// Statics
//================================================================================================

static VERSION_REGEX: Lazy<Regex> = lazy_regex::lazy_regex!(
    r#"^(?P<major>\d+)(?:\.(?P<minor>\d+))?(?:\.(?P<patch>\d+))?(?:\.(?P<revision>\d+))?(?:-(?P<prerelease>[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*))?(?:\+(?P<buildmetadata>[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*))?$"#
);

//================================================================================================
// Types
//================================================================================================

/// Reasons a version or version range fails to parse.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    /// The input was empty or only whitespace.
    #[error("A version cannot be empty")]
    Empty,
    /// The input does not follow the version grammar.
    #[error("'{0}' is not a valid version")]
    Malformed(String),
    /// A numeric segment does not fit in 64 bits.
    #[error("Version segment '{0}' is too large")]
    Overflow(String),
    /// The pre-release label or build metadata was rejected.
    #[error("Invalid version label: {0}")]
    Label(String),
    /// The range brackets or separators are malformed.
    #[error("'{0}' is not a valid version range")]
    MalformedRange(String),
    /// The range bounds are in the wrong order or describe an empty range.
    #[error("Version range '{0}' does not contain any version")]
    EmptyRange(String),
}

/// A parsed package version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageVersion {
    major: u64,
    minor: u64,
    patch: u64,
    revision: u64,
    pre: Prerelease,
    build: BuildMetadata,
}

/// One end of a [`VersionRange`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bound {
    /// The version at this end of the range.
    pub version: PackageVersion,
    /// Whether `version` itself is part of the range.
    pub inclusive: bool,
}

/// A dependency version range.
///
/// A bare version (`1.0`) is an inclusive lower bound with no upper bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    min: Option<Bound>,
    max: Option<Bound>,
}

//================================================================================================
// Impls
//================================================================================================

impl PackageVersion {
    /// Creates a release version from its numeric segments.
    pub fn new(major: u64, minor: u64, patch: u64, revision: u64) -> Self {
        PackageVersion {
            major,
            minor,
            patch,
            revision,
            pre: Prerelease::EMPTY,
            build: BuildMetadata::EMPTY,
        }
    }

    /// The major segment.
    pub fn major(&self) -> u64 {
        self.major
    }

    /// The minor segment.
    pub fn minor(&self) -> u64 {
        self.minor
    }

    /// The patch segment.
    pub fn patch(&self) -> u64 {
        self.patch
    }

    /// The fourth, legacy, segment. Zero when it was not written.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The pre-release label.
    pub fn pre(&self) -> &Prerelease {
        &self.pre
    }

    /// The build metadata.
    pub fn build(&self) -> &BuildMetadata {
        &self.build
    }

    /// Whether a pre-release label is present.
    pub fn is_prerelease(&self) -> bool {
        !self.pre.is_empty()
    }

    /// The equivalent semantic version, when the legacy revision segment is unused.
    pub fn to_semver(&self) -> Option<semver::Version> {
        (self.revision == 0).then(|| semver::Version {
            major: self.major,
            minor: self.minor,
            patch: self.patch,
            pre: self.pre.clone(),
            build: self.build.clone(),
        })
    }

    fn segment(caps: &lazy_regex::Captures<'_>, name: &str) -> Result<u64, Error> {
        match caps.name(name) {
            Some(m) => m
                .as_str()
                .parse()
                .map_err(|_| Error::Overflow(m.as_str().to_owned())),
            None => Ok(0),
        }
    }
}

impl FromStr for PackageVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::Empty);
        }

        let caps = VERSION_REGEX
            .captures(s)
            .ok_or_else(|| Error::Malformed(s.to_owned()))?;

        let pre = match caps.name("prerelease") {
            Some(m) => Prerelease::new(m.as_str())
                .map_err(|e| Error::Label(e.to_string()))?,
            None => Prerelease::EMPTY,
        };
        let build = match caps.name("buildmetadata") {
            Some(m) => BuildMetadata::new(m.as_str())
                .map_err(|e| Error::Label(e.to_string()))?,
            None => BuildMetadata::EMPTY,
        };

        Ok(PackageVersion {
            major: PackageVersion::segment(&caps, "major")?,
            minor: PackageVersion::segment(&caps, "minor")?,
            patch: PackageVersion::segment(&caps, "patch")?,
            revision: PackageVersion::segment(&caps, "revision")?,
            pre,
            build,
        })
    }
}

impl fmt::Display for PackageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if self.revision != 0 {
            write!(f, ".{}", self.revision)?;
        }
        if !self.pre.is_empty() {
            write!(f, "-{}", self.pre)?;
        }
        if !self.build.is_empty() {
            write!(f, "+{}", self.build)?;
        }
        Ok(())
    }
}

// build metadata only breaks ties, matching `semver::Version`
impl Ord for PackageVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch, self.revision)
            .cmp(&(other.major, other.minor, other.patch, other.revision))
            .then_with(|| self.pre.cmp(&other.pre))
            .then_with(|| self.build.cmp(&other.build))
    }
}

impl PartialOrd for PackageVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl VersionRange {
    /// The lower bound, if any.
    pub fn min(&self) -> Option<&Bound> {
        self.min.as_ref()
    }

    /// The upper bound, if any.
    pub fn max(&self) -> Option<&Bound> {
        self.max.as_ref()
    }

    fn bound(s: &str, inclusive: bool) -> Result<Option<Bound>, Error> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(None);
        }
        Ok(Some(Bound {
            version: s.parse()?,
            inclusive,
        }))
    }
}

impl FromStr for VersionRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::Empty);
        }

        let malformed = || Error::MalformedRange(s.to_owned());

        let min_inclusive = match s.chars().next() {
            Some('[') => true,
            Some('(') => false,
            _ => {
                return Ok(VersionRange {
                    min: Some(Bound {
                        version: s.parse()?,
                        inclusive: true,
                    }),
                    max: None,
                });
            },
        };

        let max_inclusive = match s.chars().next_back() {
            Some(']') => true,
            Some(')') => false,
            _ => return Err(malformed()),
        };

        if s.len() < 2 {
            return Err(malformed());
        }
        let inner = &s[1..s.len() - 1];
        let parts: Vec<&str> = inner.split(',').collect();

        let range = match parts.as_slice() {
            [exact] => {
                if !(min_inclusive && max_inclusive) {
                    return Err(malformed());
                }
                let bound = VersionRange::bound(exact, true)?.ok_or_else(malformed)?;
                VersionRange {
                    min: Some(bound.clone()),
                    max: Some(bound),
                }
            },
            [min, max] => VersionRange {
                min: VersionRange::bound(min, min_inclusive)?,
                max: VersionRange::bound(max, max_inclusive)?,
            },
            _ => return Err(malformed()),
        };

        match (&range.min, &range.max) {
            (None, None) => Err(malformed()),
            (Some(min), Some(max)) => match min.version.cmp(&max.version) {
                Ordering::Greater => Err(Error::EmptyRange(s.to_owned())),
                Ordering::Equal if !(min.inclusive && max.inclusive) => {
                    Err(Error::EmptyRange(s.to_owned()))
                },
                _ => Ok(range),
            },
            _ => Ok(range),
        }
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.min, &self.max) {
            (Some(min), None) if min.inclusive => write!(f, "{}", min.version),
            (Some(min), Some(max)) if min.version == max.version => {
                write!(f, "[{}]", min.version)
            },
            (min, max) => {
                f.write_str(if min.as_ref().is_some_and(|b| b.inclusive) {
                    "["
                } else {
                    "("
                })?;
                if let Some(min) = min {
                    write!(f, "{}", min.version)?;
                }
                f.write_str(", ")?;
                if let Some(max) = max {
                    write!(f, "{}", max.version)?;
                }
                f.write_str(if max.as_ref().is_some_and(|b| b.inclusive) {
                    "]"
                } else {
                    ")"
                })
            },
        }
    }
}
