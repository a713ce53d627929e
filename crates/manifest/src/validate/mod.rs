//! # Validation Orchestrator
//!
//! Drives the document parser, the metadata extractor and the rule catalog, and
//! returns every finding in a single pass.
//!
//! - A document that cannot be parsed yields exactly one finding carrying the parse
//!   diagnostic, and no document.
//! - A document whose metadata section has no entries at all is not evaluated: no
//!   findings, and the document is returned.
//! - Otherwise every rule runs, in catalog order, and the findings are concatenated.
//!
//! ```rust
//! use manifest::{FindingKind, Validator};
//!
//! let validator = Validator::default();
//! let xml = r#"<package><metadata><id>My.Package</id><version>1.0</version></metadata></package>"#;
//!
//! let validation = validator.validate(xml.as_bytes());
//! assert!(validation.is_valid());
//! assert!(validation.document().is_some());
//!
//! let validation = validator.validate("<package>".as_bytes());
//! assert_eq!(validation.findings()[0].kind(), FindingKind::ParseFailure);
//! assert!(validation.document().is_none());
//! ```

use std::io::Read;

use config::ValidationConfig;

use crate::document::Nuspec;
use crate::finding::Finding;
use crate::id::{IdentifierGrammar, PackageIdGrammar};
use crate::message::{EnglishMessages, MessageFormatter};
use crate::metadata::ManifestMetadata;
use crate::rules::Catalog;

//================================================================================================
// Types
//================================================================================================

/// The outcome of validating one manifest.
#[derive(Debug, Clone)]
pub struct Validation {
    findings: Vec<Finding>,
    document: Option<Nuspec>,
}

/// Validates manifests against a rule catalog.
///
/// A `Validator` holds no per-call state; a single instance may validate any number
/// of manifests, from any number of threads.
#[derive(Debug, Clone)]
pub struct Validator<G = PackageIdGrammar, M = EnglishMessages> {
    catalog: Catalog<G, M>,
}

//================================================================================================
// Impls
//================================================================================================

impl Validation {
    /// The findings, in rule order.
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// The parsed document, if parsing succeeded.
    pub fn document(&self) -> Option<&Nuspec> {
        self.document.as_ref()
    }

    /// Whether the manifest produced no findings.
    pub fn is_valid(&self) -> bool {
        self.findings.is_empty()
    }

    /// Splits the outcome into its findings and document.
    pub fn into_parts(self) -> (Vec<Finding>, Option<Nuspec>) {
        (self.findings, self.document)
    }
}

impl Validator {
    /// Builds a validator with the default collaborators, configured from `config`.
    pub fn new(config: &ValidationConfig) -> Self {
        Validator {
            catalog: Catalog::new(config),
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Validator::new(&ValidationConfig::default())
    }
}

impl<G: IdentifierGrammar, M: MessageFormatter> Validator<G, M> {
    /// Builds a validator around an existing catalog.
    pub fn with_catalog(catalog: Catalog<G, M>) -> Self {
        Validator { catalog }
    }

    /// The catalog this validator runs.
    pub fn catalog(&self) -> &Catalog<G, M> {
        &self.catalog
    }

    /// Reads a manifest from `reader` and validates it.
    ///
    /// The reader stays owned by the caller, who is responsible for releasing it.
    pub fn validate<R: Read>(&self, reader: R) -> Validation {
        let document = match Nuspec::parse(reader) {
            Ok(document) => document,
            Err(e) => {
                tracing::debug!(error = %e, "manifest could not be parsed");
                return Validation {
                    findings: vec![self.catalog.parse_failure(&e)],
                    document: None,
                };
            },
        };

        if document.metadata_entries().next().is_none() {
            tracing::debug!("manifest has no metadata entries, skipping evaluation");
            return Validation {
                findings: Vec::new(),
                document: Some(document),
            };
        }

        let metadata = ManifestMetadata::extract(&document);
        Validation {
            findings: self.validate_metadata(&metadata),
            document: Some(document),
        }
    }

    /// Runs the rule catalog against an already extracted metadata record.
    pub fn validate_metadata(&self, metadata: &ManifestMetadata) -> Vec<Finding> {
        let findings = self.catalog.run(metadata);
        tracing::debug!(
            id = metadata.id.as_deref(),
            findings = findings.len(),
            strict = self.catalog.is_strict(),
            "manifest evaluated"
        );
        findings
    }
}
