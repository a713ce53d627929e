//! # Manifest Documents
//!
//! This module reads the XML manifest (`.nuspec`) into a small element tree and
//! answers the queries the rest of the engine needs: the raw metadata entries, a
//! case-insensitive value lookup, and the dependency and framework reference groups.
//!
//! Parsing is streaming (`quick-xml`) and deliberately shallow: namespaces are
//! dropped in favour of local names, and no schema is enforced beyond requiring a
//! single root element with a `metadata` child.
//!
//! ## Example Manifest
//!
//! ```xml
//! <?xml version="1.0"?>
//! <package xmlns="http://schemas.microsoft.com/packaging/2011/08/nuspec.xsd">
//!   <metadata>
//!     <id>My.Package</id>
//!     <version>1.0.0</version>
//!     <projectUrl>https://example.com/my-package</projectUrl>
//!     <dependencies>
//!       <group targetFramework="net45">
//!         <dependency id="Other.Package" version="[1.0,2.0)" />
//!       </group>
//!     </dependencies>
//!     <frameworkAssemblies>
//!       <frameworkAssembly assemblyName="System.Web" targetFramework="net40, net45" />
//!     </frameworkAssemblies>
//!   </metadata>
//! </package>
//! ```
//!
//! ```rust
//! use manifest::Nuspec;
//!
//! let xml = r#"<package><metadata><id>My.Package</id></metadata></package>"#;
//! let doc = Nuspec::parse(xml.as_bytes()).unwrap();
//! assert_eq!(doc.value("ID"), Some("My.Package"));
//! ```
#[cfg(test)]
mod tests;

use std::io::{BufReader, Read};

use quick_xml::Reader;
use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;

//================================================================================================
// Types
//================================================================================================

/// A failure to read a manifest document.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The stream could not be read or is not well-formed XML.
    #[error(transparent)]
    Xml(#[from] quick_xml::Error),
    /// An element carries a malformed attribute.
    #[error(transparent)]
    Attribute(#[from] AttrError),
    /// A name or CDATA section is not valid UTF-8.
    #[error("The manifest is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    /// The document has no root element.
    #[error("The manifest does not contain a root element")]
    MissingRoot,
    /// Text or a second element appears outside the root element.
    #[error("The manifest contains content outside of its root element")]
    ContentOutsideRoot,
    /// The input ended before an element was closed.
    #[error("The '{0}' element is not closed")]
    Unclosed(String),
    /// The root element has no `metadata` child.
    #[error("The manifest is missing the required 'metadata' element")]
    MissingMetadata,
    /// A metadata field appears more than once, ignoring case.
    #[error("The manifest metadata contains the '{0}' element more than once")]
    DuplicateMetadata(String),
}

/// An element of a parsed manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
    text: String,
}

/// A parsed manifest document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nuspec {
    root: Element,
}

/// A single dependency declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    /// The id of the package depended upon.
    pub id: String,
    /// The version range, as written; `None` when absent or empty.
    pub version_range: Option<String>,
}

/// Dependencies scoped to a target framework label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGroup {
    /// The target framework label; empty when the group applies to every framework.
    pub target_framework: String,
    /// The dependencies, in document order.
    pub dependencies: Vec<Dependency>,
}

/// Framework references scoped to a target framework label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameworkReferenceGroup {
    /// The target framework label; empty when the group applies to every framework.
    pub target_framework: String,
    /// The referenced framework assemblies or shared frameworks, in document order.
    pub references: Vec<String>,
}

//================================================================================================
// Impls
//================================================================================================

impl Element {
    /// The local name of the element, without any namespace prefix.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The element's text content, trimmed.
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    /// The child elements, in document order.
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Looks up an attribute by local name, ignoring case.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// The first child with the given local name, ignoring case.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Every child with the given local name, ignoring case.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children
            .iter()
            .filter(move |c| c.name.eq_ignore_ascii_case(name))
    }

    fn open(start: &BytesStart<'_>) -> Result<Self, ParseError> {
        let name = std::str::from_utf8(start.local_name().as_ref())?.to_owned();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr?;
            let key = attr.key.local_name();
            // namespace declarations are not data
            if attr.key.as_ref() == b"xmlns" || attr.key.as_ref().starts_with(b"xmlns:") {
                continue;
            }
            let key = std::str::from_utf8(key.as_ref())?.to_owned();
            let value = attr.unescape_value()?.trim().to_owned();
            attributes.push((key, value));
        }
        Ok(Element {
            name,
            attributes,
            ..Default::default()
        })
    }

    fn target_framework(&self) -> String {
        self.attribute("targetFramework").unwrap_or_default().to_owned()
    }

    /// Non-empty attribute values only; blank attributes read as absent.
    fn non_empty_attribute(&self, key: &str) -> Option<&str> {
        self.attribute(key).filter(|v| !v.is_empty())
    }
}

impl Nuspec {
    /// Reads a manifest document from `reader`.
    ///
    /// The reader is consumed up to the end of the document; it is not closed, and
    /// remains owned by the caller.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when the stream cannot be read, is not well-formed
    /// XML, has no `metadata` element under its root, or repeats a metadata field.
    pub fn parse<R: Read>(reader: R) -> Result<Self, ParseError> {
        let mut reader = Reader::from_reader(BufReader::new(reader));
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(start) => {
                    if stack.is_empty() && root.is_some() {
                        return Err(ParseError::ContentOutsideRoot);
                    }
                    stack.push(Element::open(&start)?);
                },
                Event::Empty(start) => {
                    let element = Element::open(&start)?;
                    Nuspec::close(element, &mut stack, &mut root)?;
                },
                Event::End(_) => {
                    let element = stack.pop().ok_or(ParseError::ContentOutsideRoot)?;
                    Nuspec::close(element, &mut stack, &mut root)?;
                },
                Event::Text(text) => {
                    let text = text.unescape()?;
                    Nuspec::append_text(&text, &mut stack)?;
                },
                Event::CData(data) => {
                    let raw = data.into_inner();
                    Nuspec::append_text(std::str::from_utf8(&raw)?, &mut stack)?;
                },
                Event::Eof => break,
                // declarations, comments, processing instructions and doctypes carry no data
                _ => (),
            }
            buf.clear();
        }

        if let Some(open) = stack.pop() {
            return Err(ParseError::Unclosed(open.name));
        }

        let root = root.ok_or(ParseError::MissingRoot)?;
        if root.child("metadata").is_none() {
            return Err(ParseError::MissingMetadata);
        }

        let doc = Nuspec { root };
        if let Some(name) = doc.duplicate_entry() {
            return Err(ParseError::DuplicateMetadata(name.to_owned()));
        }

        Ok(doc)
    }

    fn duplicate_entry(&self) -> Option<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for (name, _) in self.metadata_entries() {
            if seen.iter().any(|s| s.eq_ignore_ascii_case(name)) {
                return Some(name);
            }
            seen.push(name);
        }
        None
    }

    fn close(
        element: Element,
        stack: &mut [Element],
        root: &mut Option<Element>,
    ) -> Result<(), ParseError> {
        match stack.last_mut() {
            Some(parent) => parent.children.push(element),
            None if root.is_none() => *root = Some(element),
            None => return Err(ParseError::ContentOutsideRoot),
        }
        Ok(())
    }

    fn append_text(text: &str, stack: &mut [Element]) -> Result<(), ParseError> {
        match stack.last_mut() {
            Some(current) => current.text.push_str(text),
            None if text.trim().is_empty() => (),
            None => return Err(ParseError::ContentOutsideRoot),
        }
        Ok(())
    }

    /// The document's root element.
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// The `metadata` element.
    pub fn metadata(&self) -> &Element {
        // presence is checked by `parse`
        self.root.child("metadata").unwrap_or(&self.root)
    }

    /// Every simple metadata field: children of `metadata` without child elements and
    /// with non-empty text, as `(local name, trimmed text)` in document order.
    pub fn metadata_entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.metadata()
            .children()
            .iter()
            .filter(|e| e.children.is_empty() && !e.text().is_empty())
            .map(|e| (e.name(), e.text()))
    }

    /// Looks up a metadata field by name, ignoring case. Names are unique within a
    /// parsed document, so at most one entry matches.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.metadata_entries()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }

    /// The declared dependency groups.
    ///
    /// Both the grouped shape (`<group targetFramework="..">`) and the legacy flat
    /// shape are understood; flat dependencies form a leading group with an empty
    /// framework label. Dependencies without an id are skipped.
    pub fn dependency_groups(&self) -> Vec<DependencyGroup> {
        let Some(deps) = self.metadata().child("dependencies") else {
            return Vec::new();
        };

        let mut groups = Vec::new();

        let flat = Nuspec::dependencies_of(deps);
        if !flat.is_empty() {
            groups.push(DependencyGroup {
                target_framework: String::new(),
                dependencies: flat,
            });
        }

        for group in deps.children_named("group") {
            groups.push(DependencyGroup {
                target_framework: group.target_framework(),
                dependencies: Nuspec::dependencies_of(group),
            });
        }

        groups
    }

    fn dependencies_of(parent: &Element) -> Vec<Dependency> {
        parent
            .children_named("dependency")
            .filter_map(|dep| match dep.non_empty_attribute("id") {
                Some(id) => Some(Dependency {
                    id: id.to_owned(),
                    version_range: dep.non_empty_attribute("version").map(ToOwned::to_owned),
                }),
                None => {
                    tracing::debug!(
                        version = dep.attribute("version"),
                        "skipping dependency without an id"
                    );
                    None
                },
            })
            .collect()
    }

    /// The declared framework reference groups.
    ///
    /// Groups come from `<frameworkReferences>` first, then from the legacy
    /// `<frameworkAssemblies>` element, whose entries are grouped by each of their
    /// comma-separated framework labels in order of first appearance. References
    /// without a name are skipped.
    pub fn framework_reference_groups(&self) -> Vec<FrameworkReferenceGroup> {
        let metadata = self.metadata();
        let mut groups: Vec<FrameworkReferenceGroup> = Vec::new();

        if let Some(refs) = metadata.child("frameworkReferences") {
            for group in refs.children_named("group") {
                let references = group
                    .children_named("frameworkReference")
                    .filter_map(|r| Nuspec::named(r, "name"))
                    .collect();
                groups.push(FrameworkReferenceGroup {
                    target_framework: group.target_framework(),
                    references,
                });
            }
        }

        if let Some(assemblies) = metadata.child("frameworkAssemblies") {
            let mut legacy: Vec<FrameworkReferenceGroup> = Vec::new();
            for assembly in assemblies.children_named("frameworkAssembly") {
                let Some(name) = Nuspec::named(assembly, "assemblyName") else {
                    continue;
                };
                let labels: Vec<&str> = assembly
                    .attribute("targetFramework")
                    .unwrap_or_default()
                    .split(',')
                    .map(str::trim)
                    .collect();
                for label in labels {
                    match legacy.iter_mut().find(|g| g.target_framework == label) {
                        Some(group) => group.references.push(name.clone()),
                        None => legacy.push(FrameworkReferenceGroup {
                            target_framework: label.to_owned(),
                            references: vec![name.clone()],
                        }),
                    }
                }
            }
            groups.extend(legacy);
        }

        groups
    }

    fn named(element: &Element, attribute: &str) -> Option<String> {
        let name = element.non_empty_attribute(attribute).map(ToOwned::to_owned);
        if name.is_none() {
            tracing::debug!(element = element.name(), "skipping reference without a {attribute}");
        }
        name
    }
}
