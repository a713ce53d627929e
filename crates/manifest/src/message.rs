//! Message formatting for findings.
//!
//! Rules never build message text themselves. They hand a [`FindingKind`] and its
//! arguments to a [`MessageFormatter`], which keeps wording (and any future
//! localization) out of the rule catalog.

use std::fmt::Display;

use crate::finding::FindingKind;

/// Maps a finding kind and its interpolated arguments to a message.
pub trait MessageFormatter {
    /// Formats the message for `kind`. Positional placeholders `{0}`, `{1}`, ... in the
    /// template are replaced by `args`.
    fn format(&self, kind: FindingKind, args: &[&dyn Display]) -> String;
}

/// The built-in English message catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnglishMessages;

impl EnglishMessages {
    fn template(kind: FindingKind) -> &'static str {
        match kind {
            FindingKind::ParseFailure => "{0}",
            FindingKind::MissingId => "The package manifest is missing the required id.",
            FindingKind::IdTooLong => "The package id must not exceed {0} characters.",
            FindingKind::InvalidId => "The package manifest contains an invalid id: '{0}'",
            FindingKind::InvalidUrl => "The package manifest contains an invalid URL for {0}: '{1}'",
            FindingKind::InvalidVersion => "The package manifest contains an invalid version: '{0}'",
            FindingKind::InvalidDependency => {
                "The package manifest contains an invalid dependency: '{0} {1}'"
            },
            FindingKind::InvalidTargetFramework => {
                "The package manifest contains an invalid target framework: '{0}'"
            },
        }
    }
}

impl MessageFormatter for EnglishMessages {
    fn format(&self, kind: FindingKind, args: &[&dyn Display]) -> String {
        interpolate(EnglishMessages::template(kind), args)
    }
}

/// Replaces `{n}` placeholders in `template` with the matching argument.
///
/// Placeholders without a matching argument are left untouched.
pub fn interpolate(template: &str, args: &[&dyn Display]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let arg = tail
            .find('}')
            .and_then(|end| Some((end, tail[1..end].parse::<usize>().ok()?)))
            .and_then(|(end, index)| Some((end, args.get(index)?)));

        match arg {
            Some((end, arg)) => {
                out.push_str(&arg.to_string());
                rest = &tail[end + 1..];
            },
            None => {
                out.push('{');
                rest = &tail[1..];
            },
        }
    }

    out.push_str(rest);
    out
}
