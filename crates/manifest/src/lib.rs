//! # Manifest Crate
//!
//! The `manifest` crate checks package manifests (`.nuspec` XML documents) against a
//! fixed catalog of rules and reports every problem it finds as a [`Finding`] with a
//! human-readable message. Validation never stops at the first problem, and a
//! malformed document is reported rather than raised.
//!
//! ## Architecture
//!
//! - [`document`] - Parses the XML document and answers metadata queries.
//! - [`metadata`] - Projects a parsed document into the fields the rules inspect.
//! - [`id`] - The package identifier grammar.
//! - [`version`] - Package versions and dependency version ranges.
//! - [`framework`] - Target framework labels.
//! - [`message`] - Message templates and interpolation.
//! - [`rules`] - The ordered rule catalog.
//! - [`validate`] - The orchestrator tying the above together.
//!
//! ## Basic Usage
//!
//! ```rust
//! use manifest::{FindingKind, Validator};
//!
//! let xml = r#"
//! <package>
//!   <metadata>
//!     <id></id>
//!     <version>not-a-version</version>
//!     <iconUrl>ftp://x</iconUrl>
//!   </metadata>
//! </package>"#;
//!
//! let validation = Validator::default().validate(xml.as_bytes());
//! let kinds: Vec<_> = validation.findings().iter().map(|f| f.kind()).collect();
//! assert_eq!(
//!     kinds,
//!     [
//!         FindingKind::MissingId,
//!         FindingKind::InvalidUrl,
//!         FindingKind::InvalidVersion
//!     ]
//! );
//! ```

#![warn(missing_docs)]

pub use self::document::Nuspec;
pub use self::finding::{Finding, FindingKind};
pub use self::metadata::ManifestMetadata;
pub use self::rules::{Catalog, Rule};
pub use self::validate::{Validation, Validator};

pub mod document;
pub mod finding;
pub mod framework;
pub mod id;
pub mod message;
pub mod metadata;
pub mod rules;
pub mod validate;
pub mod version;
