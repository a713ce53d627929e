use super::*;

const FULL: &str = r#"<?xml version="1.0"?>
<package xmlns="http://schemas.microsoft.com/packaging/2011/08/nuspec.xsd">
    <metadata minClientVersion="2.8">
        <id>My.Package</id>
        <version>1.0.0</version>
        <title>Package &amp; Title</title>
        <description><![CDATA[Uses <angle> brackets]]></description>
        <language></language>
        <dependencies>
            <dependency id="Flat.Dependency" version="1.0" />
            <group targetFramework="net45">
                <dependency id="Other.Package" version="[1.0,2.0)" />
                <dependency version="3.0" />
                <dependency id="Unversioned" />
            </group>
            <group>
                <dependency id="Any.Framework" version="" />
            </group>
        </dependencies>
        <frameworkReferences>
            <group targetFramework="net6.0">
                <frameworkReference name="Microsoft.AspNetCore.App" />
            </group>
        </frameworkReferences>
        <frameworkAssemblies>
            <frameworkAssembly assemblyName="System.Web" targetFramework="net40, net45" />
            <frameworkAssembly assemblyName="System.Net" targetFramework="net45" />
            <frameworkAssembly assemblyName="System.Xml" />
            <frameworkAssembly targetFramework="net40" />
        </frameworkAssemblies>
    </metadata>
    <files>
        <file src="lib\**" target="lib" />
    </files>
</package>"#;

fn parse(xml: &str) -> Result<Nuspec, ParseError> {
    Nuspec::parse(xml.as_bytes())
}

#[test]
fn metadata_entries() -> anyhow::Result<()> {
    let doc = parse(FULL)?;
    let entries: Vec<_> = doc.metadata_entries().collect();
    assert_eq!(
        entries,
        [
            ("id", "My.Package"),
            ("version", "1.0.0"),
            ("title", "Package & Title"),
            ("description", "Uses <angle> brackets"),
        ],
        "empty fields and fields with children are not entries"
    );
    Ok(())
}

#[test]
fn value_lookup_ignores_case() -> anyhow::Result<()> {
    let doc = parse(FULL)?;
    assert_eq!(doc.value("ID"), Some("My.Package"));
    assert_eq!(doc.value("Version"), Some("1.0.0"));
    assert_eq!(doc.value("language"), None);
    assert_eq!(doc.value("iconUrl"), None);
    assert_eq!(doc.metadata().attribute("MINCLIENTVERSION"), Some("2.8"));
    Ok(())
}

#[test]
fn dependency_groups() -> anyhow::Result<()> {
    let doc = parse(FULL)?;
    let groups = doc.dependency_groups();

    assert_eq!(
        groups,
        [
            DependencyGroup {
                target_framework: "".into(),
                dependencies: vec![Dependency {
                    id: "Flat.Dependency".into(),
                    version_range: Some("1.0".into()),
                }],
            },
            DependencyGroup {
                target_framework: "net45".into(),
                dependencies: vec![
                    Dependency {
                        id: "Other.Package".into(),
                        version_range: Some("[1.0,2.0)".into()),
                    },
                    Dependency {
                        id: "Unversioned".into(),
                        version_range: None,
                    },
                ],
            },
            DependencyGroup {
                target_framework: "".into(),
                dependencies: vec![Dependency {
                    id: "Any.Framework".into(),
                    version_range: None,
                }],
            },
        ]
    );
    Ok(())
}

#[test]
fn framework_reference_groups() -> anyhow::Result<()> {
    let doc = parse(FULL)?;
    let groups = doc.framework_reference_groups();
    let groups: Vec<(&str, Vec<&str>)> = groups
        .iter()
        .map(|g| {
            let refs = g.references.iter().map(String::as_str).collect();
            (g.target_framework.as_str(), refs)
        })
        .collect();

    assert_eq!(
        groups,
        [
            ("net6.0", vec!["Microsoft.AspNetCore.App"]),
            ("net40", vec!["System.Web"]),
            ("net45", vec!["System.Web", "System.Net"]),
            ("", vec!["System.Xml"]),
        ]
    );
    Ok(())
}

#[test]
fn no_groups() -> anyhow::Result<()> {
    let doc = parse("<package><metadata><id>a</id></metadata></package>")?;
    assert!(doc.dependency_groups().is_empty());
    assert!(doc.framework_reference_groups().is_empty());
    Ok(())
}

#[test]
fn empty_metadata() -> anyhow::Result<()> {
    let doc = parse("<package><metadata/></package>")?;
    assert_eq!(doc.metadata_entries().count(), 0);

    let doc = parse("<package><metadata><id></id><version>  </version></metadata></package>")?;
    assert_eq!(doc.metadata_entries().count(), 0);
    Ok(())
}

#[test]
fn namespace_prefixes_are_dropped() -> anyhow::Result<()> {
    let doc = parse(
        r#"<nu:package xmlns:nu="urn:nuspec"><nu:metadata><nu:id>a</nu:id></nu:metadata></nu:package>"#,
    )?;
    assert_eq!(doc.root().name(), "package");
    assert_eq!(doc.value("id"), Some("a"));
    Ok(())
}

#[test]
fn failures() {
    let cases = [
        ("", "missing root"),
        ("   ", "whitespace only"),
        ("not xml at all", "bare text"),
        ("<package><metadata></package>", "mismatched end tag"),
        ("<package><metadata><id>a</id>", "truncated"),
        ("<package><files/></package>", "no metadata"),
        ("<package><metadata/></package><package/>", "two roots"),
        ("<package><metadata/></package>trailing", "trailing text"),
        (r#"<package a="1" a="2"><metadata/></package>"#, "duplicate attribute"),
        ("<package><metadata><id>&bogus;</id></metadata></package>", "unknown entity"),
    ];

    for (xml, why) in cases {
        assert!(parse(xml).is_err(), "expected a parse failure: {why}");
    }
}

#[test]
fn failure_kinds() {
    assert!(matches!(parse(""), Err(ParseError::MissingRoot)));
    assert!(matches!(
        parse("<package><files/></package>"),
        Err(ParseError::MissingMetadata)
    ));
    assert!(matches!(
        parse("<package><metadata><id>a</id>"),
        Err(ParseError::Unclosed(name)) if name == "metadata"
    ));
    assert!(matches!(
        parse("<package><metadata/></package><package/>"),
        Err(ParseError::ContentOutsideRoot)
    ));
}

#[test]
fn reader_errors_surface() {
    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("stream reset"))
        }
    }

    let err = Nuspec::parse(Broken).unwrap_err();
    assert!(err.to_string().contains("stream reset"), "got: {err}");
}

#[test]
fn child_outlives_the_queried_name() -> anyhow::Result<()> {
    let doc = parse(FULL)?;
    let metadata = {
        let name = String::from("METADATA");
        doc.root().child(&name)
    };
    assert_eq!(metadata.map(Element::name), Some("metadata"));
    assert!(doc.root().child("FILES").is_some());
    assert!(doc.root().child("readme").is_none());
    Ok(())
}

#[test]
fn duplicate_metadata_fields() {
    assert!(matches!(
        parse("<package><metadata><id>a</id><ID>b</ID></metadata></package>"),
        Err(ParseError::DuplicateMetadata(name)) if name == "ID"
    ));
    assert_eq!(
        parse("<package><metadata><id>a</id><id>b</id></metadata></package>")
            .map_err(|e| e.to_string())
            .err()
            .as_deref(),
        Some("The manifest metadata contains the 'id' element more than once")
    );
}

#[test]
fn empty_duplicates_are_not_entries() -> anyhow::Result<()> {
    let doc = parse("<package><metadata><id></id><id>a</id></metadata></package>")?;
    assert_eq!(doc.value("id"), Some("a"));
    Ok(())
}
