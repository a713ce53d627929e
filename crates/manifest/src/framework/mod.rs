//! # Target Frameworks
//!
//! Dependency groups and framework reference groups are scoped to a target framework
//! label. Three spellings are understood:
//!
//! - short names: `net45`, `net40-client`, `netstandard2.0`, `net6.0-windows10.0.19041`
//! - long names: `.NETFramework,Version=v4.5,Profile=Client`
//! - portable profiles: `portable-net45+win8+wpa81`
//!
//! Short-name versions written without dots use one digit per segment (`net451` is
//! 4.5.1); with dots they are read as-is (`netcoreapp3.1`).
#[cfg(test)]
mod tests;

use std::fmt;
use std::str::FromStr;

use lazy_regex::{Lazy, Regex};
use thiserror::Error;

//================================================================================================
// Statics
//================================================================================================

static SHORT_REGEX: Lazy<Regex> = lazy_regex::lazy_regex!(
    r#"^(?P<identifier>[A-Za-z]+(?:\.[A-Za-z]+)*?)(?P<version>\d[\d.]*)?(?:-(?P<profile>[A-Za-z][0-9A-Za-z.]*))?$"#
);

const MAX_SEGMENTS: usize = 4;
const PORTABLE: &str = "portable-";

/// Known framework identifiers, as `(short name, long name)`.
static FRAMEWORKS: &[(&str, &str)] = &[
    ("net", ".NETFramework"),
    ("netstandard", ".NETStandard"),
    ("netcoreapp", ".NETCoreApp"),
    ("netcore", ".NETCore"),
    ("netmf", ".NETMicroFramework"),
    ("dotnet", ".NETPlatform"),
    ("sl", "Silverlight"),
    ("wp", "WindowsPhone"),
    ("wpa", "WindowsPhoneApp"),
    ("win", "Windows"),
    ("uap", "UAP"),
    ("monoandroid", "MonoAndroid"),
    ("monotouch", "MonoTouch"),
    ("monomac", "MonoMac"),
    ("xamarinios", "Xamarin.iOS"),
    ("xamarinmac", "Xamarin.Mac"),
    ("xamarintvos", "Xamarin.TVOS"),
    ("xamarinwatchos", "Xamarin.WatchOS"),
    ("tizen", "Tizen"),
    ("dnx", "DNX"),
    ("dnxcore", "DNXCore"),
    ("aspnet", "ASP.NET"),
    ("aspnetcore", "ASP.NETCore"),
    ("native", "native"),
    ("any", "Any"),
];

//================================================================================================
// Types
//================================================================================================

/// Reasons a target framework label fails to parse.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    /// The label was empty or only whitespace.
    #[error("A target framework cannot be empty")]
    Empty,
    /// The framework moniker is not in the known-identifier table.
    #[error("'{0}' is not a known framework identifier")]
    UnknownIdentifier(String),
    /// The version part has a non-numeric or overflowing segment.
    #[error("'{0}' is not a valid framework version")]
    InvalidVersion(String),
    /// The label matches neither the short, long nor portable shape.
    #[error("'{0}' is not a valid target framework")]
    Malformed(String),
    /// A `portable-` label names no frameworks.
    #[error("A portable profile must list at least one framework")]
    EmptyPortable,
}

/// A framework version, such as `4.5` or `10.0.19041`.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameworkVersion(Vec<u32>);

/// A parsed target framework label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TargetFramework {
    /// A single framework, optionally qualified by a profile or platform.
    Specific {
        /// The long framework identifier, e.g. `.NETFramework`.
        identifier: &'static str,
        /// The framework version; empty when none was written.
        version: FrameworkVersion,
        /// The profile (`client`) or platform (`windows10.0`) suffix.
        profile: Option<String>,
    },
    /// A portable class library profile targeting several frameworks at once.
    Portable(Vec<TargetFramework>),
}

//================================================================================================
// Impls
//================================================================================================

impl FrameworkVersion {
    /// The numeric segments of the version.
    pub fn segments(&self) -> &[u32] {
        &self.0
    }

    fn parse_dotted(s: &str) -> Result<Self, Error> {
        let invalid = || Error::InvalidVersion(s.to_owned());
        let segments = s
            .split('.')
            .map(|p| p.parse::<u32>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;
        if segments.len() > MAX_SEGMENTS {
            return Err(invalid());
        }
        Ok(FrameworkVersion(segments))
    }

    fn parse_short(s: &str) -> Result<Self, Error> {
        if s.contains('.') {
            return FrameworkVersion::parse_dotted(s);
        }
        if s.len() > MAX_SEGMENTS {
            return Err(Error::InvalidVersion(s.to_owned()));
        }
        s.chars()
            .map(|c| c.to_digit(10).ok_or_else(|| Error::InvalidVersion(s.to_owned())))
            .collect::<Result<Vec<_>, _>>()
            .map(FrameworkVersion)
    }
}

impl fmt::Display for FrameworkVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [] => f.write_str("0.0"),
            [major] => write!(f, "{major}.0"),
            segments => {
                let parts: Vec<String> = segments.iter().map(ToString::to_string).collect();
                f.write_str(&parts.join("."))
            },
        }
    }
}

impl TargetFramework {
    fn lookup_short(short: &str) -> Option<&'static str> {
        // `xamarin.ios` is an accepted spelling of `xamarinios`
        let undotted = short.replace('.', "");
        FRAMEWORKS
            .iter()
            .find(|(s, _)| s.eq_ignore_ascii_case(&undotted))
            .map(|(_, long)| *long)
    }

    fn lookup_long(long: &str) -> Option<&'static str> {
        FRAMEWORKS
            .iter()
            .find(|(_, l)| l.eq_ignore_ascii_case(long))
            .map(|(_, long)| *long)
    }

    fn short_name(identifier: &str) -> &str {
        FRAMEWORKS
            .iter()
            .find(|(_, l)| *l == identifier)
            .map_or(identifier, |(s, _)| *s)
    }

    fn parse_short(s: &str) -> Result<Self, Error> {
        let caps = SHORT_REGEX
            .captures(s)
            .ok_or_else(|| Error::Malformed(s.to_owned()))?;

        let short = caps.name("identifier").map_or("", |m| m.as_str());
        let mut version = match caps.name("version") {
            Some(m) => FrameworkVersion::parse_short(m.as_str())?,
            None => FrameworkVersion::default(),
        };

        let mut identifier = TargetFramework::lookup_short(short)
            .ok_or_else(|| Error::UnknownIdentifier(short.to_owned()))?;

        // `net5.0` and later are .NET Core releases
        if identifier == ".NETFramework" && version.0.first().is_some_and(|&major| major >= 5) {
            identifier = ".NETCoreApp";
        }
        if version.0.is_empty() && identifier != "native" && identifier != "Any" {
            version = FrameworkVersion(vec![0]);
        }

        Ok(TargetFramework::Specific {
            identifier,
            version,
            profile: caps.name("profile").map(|m| m.as_str().to_owned()),
        })
    }

    fn parse_long(s: &str) -> Result<Self, Error> {
        let mut parts = s.split(',').map(str::trim);
        let name = parts.next().unwrap_or_default();
        let identifier = TargetFramework::lookup_long(name)
            .ok_or_else(|| Error::UnknownIdentifier(name.to_owned()))?;

        let mut version = None;
        let mut profile = None;
        for part in parts {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| Error::Malformed(s.to_owned()))?;
            match key.trim() {
                k if k.eq_ignore_ascii_case("version") => {
                    let value = value.trim();
                    let value = value.strip_prefix(['v', 'V']).unwrap_or(value);
                    version = Some(FrameworkVersion::parse_dotted(value)?);
                },
                k if k.eq_ignore_ascii_case("profile") => {
                    profile = Some(value.trim().to_owned()).filter(|p| !p.is_empty());
                },
                _ => return Err(Error::Malformed(s.to_owned())),
            }
        }

        Ok(TargetFramework::Specific {
            identifier,
            version: version.ok_or_else(|| Error::Malformed(s.to_owned()))?,
            profile,
        })
    }

    fn parse_portable(profile: &str) -> Result<Self, Error> {
        let frameworks = profile
            .split('+')
            .filter(|p| !p.trim().is_empty())
            .map(|p| TargetFramework::parse_short(p.trim()))
            .collect::<Result<Vec<_>, _>>()?;
        if frameworks.is_empty() {
            return Err(Error::EmptyPortable);
        }
        Ok(TargetFramework::Portable(frameworks))
    }
}

impl FromStr for TargetFramework {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::Empty);
        }

        if s.contains(',') {
            return TargetFramework::parse_long(s);
        }

        match s.get(..PORTABLE.len()) {
            Some(prefix) if prefix.eq_ignore_ascii_case(PORTABLE) => {
                TargetFramework::parse_portable(&s[PORTABLE.len()..])
            },
            _ => TargetFramework::parse_short(s),
        }
    }
}

impl fmt::Display for TargetFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetFramework::Specific {
                identifier,
                version,
                profile,
            } => {
                write!(f, "{identifier},Version=v{version}")?;
                if let Some(profile) = profile {
                    write!(f, ",Profile={profile}")?;
                }
                Ok(())
            },
            TargetFramework::Portable(frameworks) => {
                let profile: Vec<String> = frameworks
                    .iter()
                    .map(|fx| match fx {
                        TargetFramework::Specific {
                            identifier,
                            version,
                            ..
                        } => {
                            let digits: String =
                                version.segments().iter().map(ToString::to_string).collect();
                            format!("{}{}", TargetFramework::short_name(identifier), digits)
                        },
                        TargetFramework::Portable(_) => fx.to_string(),
                    })
                    .collect();
                write!(f, ".NETPortable,Version=v0.0,Profile={}", profile.join("+"))
            },
        }
    }
}
