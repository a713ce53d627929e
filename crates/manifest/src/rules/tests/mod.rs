use std::fmt::Display;

use super::*;
use crate::document::{Dependency, DependencyGroup, FrameworkReferenceGroup};
use crate::version::PackageVersion;

fn valid() -> ManifestMetadata {
    ManifestMetadata {
        id: Some("My.Package".into()),
        version: Some(PackageVersion::new(1, 0, 0, 0)),
        raw_version: Some("1.0.0".into()),
        ..Default::default()
    }
}

fn kinds(findings: &[Finding]) -> Vec<FindingKind> {
    findings.iter().map(Finding::kind).collect()
}

fn strict() -> Catalog {
    Catalog::new(&ValidationConfig::default().with_strict_groups(true))
}

#[test]
fn valid_metadata_has_no_findings() {
    assert!(Catalog::default().run(&valid()).is_empty());
    assert!(strict().run(&valid()).is_empty());
}

#[test]
fn missing_id() {
    let catalog = Catalog::default();
    for id in [None, Some(String::new())] {
        let metadata = ManifestMetadata { id, ..valid() };
        let findings = catalog.check(Rule::Identifier, &metadata);
        assert_eq!(kinds(&findings), [FindingKind::MissingId]);
    }
}

#[test]
fn id_length_boundary() {
    let catalog = Catalog::default();

    let at_limit = ManifestMetadata {
        id: Some("a".repeat(100)),
        ..valid()
    };
    assert!(catalog.check(Rule::Identifier, &at_limit).is_empty());

    let over_limit = ManifestMetadata {
        id: Some("a".repeat(101)),
        ..valid()
    };
    let findings = catalog.check(Rule::Identifier, &over_limit);
    assert_eq!(kinds(&findings), [FindingKind::IdTooLong]);
    assert_eq!(
        findings[0].message(),
        "The package id must not exceed 100 characters."
    );
}

#[test]
fn too_long_suppresses_grammar() {
    let metadata = ManifestMetadata {
        id: Some("!".repeat(101)),
        ..valid()
    };
    let findings = Catalog::default().check(Rule::Identifier, &metadata);
    assert_eq!(kinds(&findings), [FindingKind::IdTooLong]);
}

#[test]
fn invalid_id_interpolates() {
    let metadata = ManifestMetadata {
        id: Some("bad id".into()),
        ..valid()
    };
    let findings = Catalog::default().check(Rule::Identifier, &metadata);
    assert_eq!(kinds(&findings), [FindingKind::InvalidId]);
    assert_eq!(
        findings[0].message(),
        "The package manifest contains an invalid id: 'bad id'"
    );
}

#[test]
fn configured_length_reaches_rule() {
    let config = ValidationConfig {
        max_id_length: 5,
        ..Default::default()
    };
    let metadata = ManifestMetadata {
        id: Some("abcdef".into()),
        ..valid()
    };
    let findings = Catalog::new(&config).check(Rule::Identifier, &metadata);
    assert_eq!(kinds(&findings), [FindingKind::IdTooLong]);
    assert_eq!(findings[0].message(), "The package id must not exceed 5 characters.");
}

#[test]
fn empty_urls_are_ignored() {
    let metadata = ManifestMetadata {
        icon_url: Some(String::new()),
        project_url: None,
        license_url: Some(String::new()),
        ..valid()
    };
    assert!(Catalog::default().check(Rule::Urls, &metadata).is_empty());
}

#[test]
fn each_bad_url_reported_in_order() {
    let metadata = ManifestMetadata {
        icon_url: Some("not a url".into()),
        project_url: Some("/relative/path".into()),
        license_url: Some("mailto:someone@example.com".into()),
        ..valid()
    };
    let findings = Catalog::default().check(Rule::Urls, &metadata);
    let messages: Vec<_> = findings.iter().map(Finding::message).collect();
    assert_eq!(
        messages,
        [
            "The package manifest contains an invalid URL for iconUrl: 'not a url'",
            "The package manifest contains an invalid URL for projectUrl: '/relative/path'",
            "The package manifest contains an invalid URL for licenseUrl: \
             'mailto:someone@example.com'",
        ]
    );
}

#[test]
fn one_bad_url() {
    let metadata = ManifestMetadata {
        icon_url: Some("https://example.com/icon.png".into()),
        project_url: Some("not a url".into()),
        license_url: Some("HTTP://EXAMPLE.COM/LICENSE".into()),
        ..valid()
    };
    let findings = Catalog::default().check(Rule::Urls, &metadata);
    assert_eq!(kinds(&findings), [FindingKind::InvalidUrl]);
}

#[test]
fn url_schemes_are_configurable() {
    let metadata = ManifestMetadata {
        icon_url: Some("ftp://x".into()),
        ..valid()
    };
    assert_eq!(
        kinds(&Catalog::default().check(Rule::Urls, &metadata)),
        [FindingKind::InvalidUrl]
    );

    let config = ValidationConfig {
        allowed_url_schemes: vec!["ftp".into()],
        ..Default::default()
    };
    assert!(Catalog::new(&config).check(Rule::Urls, &metadata).is_empty());
}

#[test]
fn version() {
    let catalog = Catalog::default();

    let missing = ManifestMetadata {
        version: None,
        raw_version: None,
        ..valid()
    };
    let findings = catalog.check(Rule::Version, &missing);
    assert_eq!(kinds(&findings), [FindingKind::InvalidVersion]);
    assert_eq!(
        findings[0].message(),
        "The package manifest contains an invalid version: ''"
    );

    let unparseable = ManifestMetadata {
        version: None,
        raw_version: Some("1.2.3.4.5.6".into()),
        ..valid()
    };
    let findings = catalog.check(Rule::Version, &unparseable);
    assert_eq!(
        findings[0].message(),
        "The package manifest contains an invalid version: '1.2.3.4.5.6'"
    );
}

#[test]
fn rules_are_independent() {
    let metadata = ManifestMetadata {
        id: None,
        icon_url: Some("nope".into()),
        project_url: Some("nope".into()),
        version: None,
        raw_version: Some("x".into()),
        ..Default::default()
    };
    assert_eq!(
        kinds(&Catalog::default().run(&metadata)),
        [
            FindingKind::MissingId,
            FindingKind::InvalidUrl,
            FindingKind::InvalidUrl,
            FindingKind::InvalidVersion,
        ]
    );
}

fn with_groups() -> ManifestMetadata {
    let dep = |id: &str, range: Option<&str>| Dependency {
        id: id.into(),
        version_range: range.map(Into::into),
    };
    ManifestMetadata {
        dependency_groups: vec![
            DependencyGroup {
                target_framework: "net45".into(),
                dependencies: vec![
                    dep("Good", Some("[1.0,2.0)")),
                    dep("bad id", Some("1.0")),
                    dep("BadRange", Some("[2.0,1.0]")),
                    dep("NoRange", None),
                ],
            },
            DependencyGroup {
                target_framework: "bogus99".into(),
                dependencies: Vec::new(),
            },
        ],
        framework_reference_groups: vec![
            FrameworkReferenceGroup {
                target_framework: "".into(),
                references: vec!["System.Web".into()],
            },
            FrameworkReferenceGroup {
                target_framework: "not a framework".into(),
                references: vec!["System.Xml".into()],
            },
        ],
        ..valid()
    }
}

#[test]
fn group_rules_are_off_by_default() {
    let catalog = Catalog::default();
    assert!(!catalog.is_strict());
    assert!(catalog.run(&with_groups()).is_empty());
}

#[test]
fn strict_dependencies() {
    let findings = strict().check(Rule::Dependencies, &with_groups());
    let messages: Vec<_> = findings.iter().map(Finding::message).collect();
    assert_eq!(
        messages,
        [
            "The package manifest contains an invalid dependency: 'bad id 1.0'",
            "The package manifest contains an invalid dependency: 'BadRange [2.0,1.0]'",
        ]
    );
}

#[test]
fn strict_frameworks() {
    let findings = strict().check(Rule::Frameworks, &with_groups());
    let messages: Vec<_> = findings.iter().map(Finding::message).collect();
    assert_eq!(
        messages,
        [
            "The package manifest contains an invalid target framework: 'not a framework'",
            "The package manifest contains an invalid target framework: 'bogus99'",
        ],
        "reference groups are checked before dependency groups, empty labels skipped"
    );
}

struct Shouting;

impl MessageFormatter for Shouting {
    fn format(&self, kind: FindingKind, args: &[&dyn Display]) -> String {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        format!("{kind}: {}", args.join(", ")).to_uppercase()
    }
}

struct NoDots;

impl IdentifierGrammar for NoDots {
    fn is_valid(&self, id: &str) -> bool {
        !id.contains('.')
    }

    fn max_length(&self) -> usize {
        8
    }
}

#[test]
fn custom_collaborators() {
    let catalog = Catalog::with_collaborators(&ValidationConfig::default(), NoDots, Shouting);

    let findings = catalog.check(Rule::Identifier, &valid());
    assert_eq!(findings[0].message(), "ID_TOO_LONG: 8");

    let metadata = ManifestMetadata {
        id: Some("a.b".into()),
        ..valid()
    };
    let findings = catalog.check(Rule::Identifier, &metadata);
    assert_eq!(kinds(&findings), [FindingKind::InvalidId]);
    assert_eq!(findings[0].message(), "INVALID_ID: A.B");
}
