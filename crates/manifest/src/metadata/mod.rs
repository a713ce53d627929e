//! # Manifest Metadata
//!
//! A read-only projection of a parsed [`Nuspec`] into the fields the rule catalog
//! inspects. Extraction never validates and never fails: missing or malformed
//! optional data is represented as `None` or an empty collection, and deciding
//! whether that is acceptable is left entirely to the rules.

use crate::document::{DependencyGroup, FrameworkReferenceGroup, Nuspec};
use crate::version::PackageVersion;

/// Names of the metadata fields read by [`ManifestMetadata::extract`].
pub mod field {
    /// The package identifier.
    pub const ID: &str = "id";
    /// The package version.
    pub const VERSION: &str = "version";
    /// The icon URL.
    pub const ICON_URL: &str = "iconUrl";
    /// The project URL.
    pub const PROJECT_URL: &str = "projectUrl";
    /// The license URL.
    pub const LICENSE_URL: &str = "licenseUrl";
}

/// Structured metadata extracted from a manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestMetadata {
    /// The package identifier as written.
    pub id: Option<String>,
    /// The parsed version; `None` when absent or unparseable.
    pub version: Option<PackageVersion>,
    /// The version exactly as written, kept for messages.
    pub raw_version: Option<String>,
    /// The raw icon URL.
    pub icon_url: Option<String>,
    /// The raw project URL.
    pub project_url: Option<String>,
    /// The raw license URL.
    pub license_url: Option<String>,
    /// Dependency groups in document order.
    pub dependency_groups: Vec<DependencyGroup>,
    /// Framework reference groups in document order.
    pub framework_reference_groups: Vec<FrameworkReferenceGroup>,
    /// Every simple metadata entry, as `(name, value)`.
    pub raw: Vec<(String, String)>,
}

impl ManifestMetadata {
    /// Projects `doc` into a metadata record.
    pub fn extract(doc: &Nuspec) -> Self {
        let owned = |key: &str| doc.value(key).map(ToOwned::to_owned);

        let raw_version = owned(field::VERSION);
        let version = raw_version
            .as_deref()
            .and_then(|raw| match raw.parse::<PackageVersion>() {
                Ok(version) => Some(version),
                Err(e) => {
                    tracing::debug!(version = raw, error = %e, "unparseable version");
                    None
                },
            });

        ManifestMetadata {
            id: owned(field::ID),
            version,
            raw_version,
            icon_url: owned(field::ICON_URL),
            project_url: owned(field::PROJECT_URL),
            license_url: owned(field::LICENSE_URL),
            dependency_groups: doc.dependency_groups(),
            framework_reference_groups: doc.framework_reference_groups(),
            raw: doc
                .metadata_entries()
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect(),
        }
    }

    /// Looks up any simple metadata entry by name, ignoring case.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.raw
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// The URL fields in the order they are validated, as `(field name, value)`.
    pub fn urls(&self) -> [(&'static str, Option<&str>); 3] {
        [
            (field::ICON_URL, self.icon_url.as_deref()),
            (field::PROJECT_URL, self.project_url.as_deref()),
            (field::LICENSE_URL, self.license_url.as_deref()),
        ]
    }

    /// Every non-empty target framework label: framework reference groups first, then
    /// dependency groups.
    pub fn target_frameworks(&self) -> impl Iterator<Item = &str> {
        self.framework_reference_groups
            .iter()
            .map(|g| g.target_framework.as_str())
            .chain(
                self.dependency_groups
                    .iter()
                    .map(|g| g.target_framework.as_str()),
            )
            .filter(|fx| !fx.is_empty())
    }
}
