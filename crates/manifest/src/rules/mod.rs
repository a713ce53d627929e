//! # Rule Catalog
//!
//! The fixed, ordered set of independent rules run against a [`ManifestMetadata`].
//! Every rule is a pure function of the metadata and the catalog's collaborators;
//! each one yields zero or more findings, and no rule can prevent a later one from
//! running.
//!
//! | Order | Rule                   | Findings                                           |
//! |-------|------------------------|----------------------------------------------------|
//! | 1     | [`Rule::Identifier`]   | missing id, id too long, or invalid id             |
//! | 2     | [`Rule::Urls`]         | one per malformed icon, project or license URL     |
//! | 3     | [`Rule::Version`]      | missing or unparseable version                     |
//! | 4     | [`Rule::Dependencies`] | invalid dependency id or range (strict mode only)  |
//! | 5     | [`Rule::Frameworks`]   | unparseable target framework (strict mode only)    |
#[cfg(test)]
mod tests;

use config::ValidationConfig;
use url::Url;

use crate::finding::{Finding, FindingKind};
use crate::framework::TargetFramework;
use crate::id::{IdentifierGrammar, PackageIdGrammar};
use crate::message::{EnglishMessages, MessageFormatter};
use crate::metadata::ManifestMetadata;
use crate::version::VersionRange;

//================================================================================================
// Types
//================================================================================================

/// A single entry of the rule catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// Presence, length and grammar of the package id.
    Identifier,
    /// Well-formedness of the icon, project and license URLs.
    Urls,
    /// Presence and parseability of the version.
    Version,
    /// Ids and version ranges of declared dependencies.
    Dependencies,
    /// Target framework labels of dependency and framework reference groups.
    Frameworks,
}

/// The rule catalog together with the collaborators its rules consult.
///
/// The identifier length ceiling is read from the grammar only, so the grammar and
/// the identifier rule can never disagree about it.
#[derive(Debug, Clone)]
pub struct Catalog<G = PackageIdGrammar, M = EnglishMessages> {
    grammar: G,
    messages: M,
    allowed_url_schemes: Vec<String>,
    strict_groups: bool,
}

//================================================================================================
// Impls
//================================================================================================

impl Rule {
    /// Every rule, in evaluation order.
    pub const ALL: [Rule; 5] = [
        Rule::Identifier,
        Rule::Urls,
        Rule::Version,
        Rule::Dependencies,
        Rule::Frameworks,
    ];

    /// A short, stable name for logging.
    pub fn name(self) -> &'static str {
        match self {
            Rule::Identifier => "identifier",
            Rule::Urls => "urls",
            Rule::Version => "version",
            Rule::Dependencies => "dependencies",
            Rule::Frameworks => "frameworks",
        }
    }
}

impl Catalog {
    /// Builds the catalog with the default grammar and English messages, both
    /// configured from `config`.
    pub fn new(config: &ValidationConfig) -> Self {
        Catalog::with_collaborators(config, PackageIdGrammar::from(config), EnglishMessages)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::new(&ValidationConfig::default())
    }
}

impl<G: IdentifierGrammar, M: MessageFormatter> Catalog<G, M> {
    /// Builds the catalog around the given identifier grammar and message formatter.
    ///
    /// `config.max_id_length` is not consulted here; the grammar carries the ceiling.
    pub fn with_collaborators(config: &ValidationConfig, grammar: G, messages: M) -> Self {
        Catalog {
            grammar,
            messages,
            allowed_url_schemes: config.allowed_url_schemes.clone(),
            strict_groups: config.strict_group_validation,
        }
    }

    /// Whether group validation is enabled.
    pub fn is_strict(&self) -> bool {
        self.strict_groups
    }

    /// Runs every rule in order and concatenates their findings.
    pub fn run(&self, metadata: &ManifestMetadata) -> Vec<Finding> {
        let mut findings = Vec::new();
        for rule in Rule::ALL {
            let found = self.check(rule, metadata);
            tracing::trace!(rule = rule.name(), findings = found.len(), "rule evaluated");
            findings.extend(found);
        }
        findings
    }

    /// Runs a single rule.
    pub fn check(&self, rule: Rule, metadata: &ManifestMetadata) -> Vec<Finding> {
        match rule {
            Rule::Identifier => self.check_identifier(metadata),
            Rule::Urls => self.check_urls(metadata),
            Rule::Version => self.check_version(metadata),
            Rule::Dependencies if self.strict_groups => self.check_dependencies(metadata),
            Rule::Frameworks if self.strict_groups => self.check_frameworks(metadata),
            Rule::Dependencies | Rule::Frameworks => Vec::new(),
        }
    }

    /// The single finding reported for a document that could not be parsed.
    pub(crate) fn parse_failure(&self, diagnostic: &dyn std::fmt::Display) -> Finding {
        self.finding(FindingKind::ParseFailure, &[diagnostic])
    }

    fn finding(&self, kind: FindingKind, args: &[&dyn std::fmt::Display]) -> Finding {
        Finding::new(kind, self.messages.format(kind, args))
    }

    fn check_identifier(&self, metadata: &ManifestMetadata) -> Vec<Finding> {
        let id = match metadata.id.as_deref() {
            Some(id) if !id.is_empty() => id,
            _ => return vec![self.finding(FindingKind::MissingId, &[])],
        };

        let max = self.grammar.max_length();
        // a too-long id is never also reported as malformed
        if id.chars().count() > max {
            vec![self.finding(FindingKind::IdTooLong, &[&max])]
        } else if !self.grammar.is_valid(id) {
            vec![self.finding(FindingKind::InvalidId, &[&id])]
        } else {
            Vec::new()
        }
    }

    fn check_urls(&self, metadata: &ManifestMetadata) -> Vec<Finding> {
        metadata
            .urls()
            .into_iter()
            .filter_map(|(field, value)| {
                let value = value.filter(|v| !v.is_empty())?;
                (!self.is_absolute_url(value))
                    .then(|| self.finding(FindingKind::InvalidUrl, &[&field, &value]))
            })
            .collect()
    }

    fn is_absolute_url(&self, raw: &str) -> bool {
        match Url::parse(raw) {
            Ok(url) => {
                url.has_host()
                    && self
                        .allowed_url_schemes
                        .iter()
                        .any(|s| s.eq_ignore_ascii_case(url.scheme()))
            },
            Err(e) => {
                tracing::trace!(url = raw, error = %e, "url rejected");
                false
            },
        }
    }

    fn check_version(&self, metadata: &ManifestMetadata) -> Vec<Finding> {
        if metadata.version.is_some() {
            return Vec::new();
        }
        let raw = metadata.raw_version.as_deref().unwrap_or_default();
        vec![self.finding(FindingKind::InvalidVersion, &[&raw])]
    }

    fn check_dependencies(&self, metadata: &ManifestMetadata) -> Vec<Finding> {
        metadata
            .dependency_groups
            .iter()
            .flat_map(|group| &group.dependencies)
            .filter(|dep| {
                let bad_range = dep
                    .version_range
                    .as_deref()
                    .is_some_and(|range| range.parse::<VersionRange>().is_err());
                !self.grammar.is_valid(&dep.id) || bad_range
            })
            .map(|dep| {
                let range = dep.version_range.as_deref().unwrap_or_default();
                self.finding(FindingKind::InvalidDependency, &[&dep.id, &range])
            })
            .collect()
    }

    fn check_frameworks(&self, metadata: &ManifestMetadata) -> Vec<Finding> {
        metadata
            .target_frameworks()
            .filter(|fx| fx.parse::<TargetFramework>().is_err())
            .map(|fx| self.finding(FindingKind::InvalidTargetFramework, &[&fx]))
            .collect()
    }
}
