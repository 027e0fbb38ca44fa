//! Parser for package descriptors (POM files) and repository metadata.
//!
//! Only the project's own direct `dependencies` block is read. Parent POMs,
//! dependency management, property interpolation, scopes and exclusions are
//! not resolved.

use serde::Deserialize;

use super::types::Dependency;

/// Version recorded for dependencies whose descriptor omits one.
pub const UNKNOWN_VERSION: &str = "unknown";

/// Errors that can occur while parsing descriptors.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The document is not well-formed XML or has an unexpected shape.
    #[error("Failed to parse XML: {0}")]
    Xml(#[from] quick_xml::de::DeError),

    /// Repository metadata names no usable version.
    #[error("No version could be resolved from repository metadata")]
    NoVersion,
}

/// Result type alias for parser operations.
pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Project {
    #[serde(default)]
    dependencies: Option<DependencyList>,
}

#[derive(Debug, Default, Deserialize)]
struct DependencyList {
    #[serde(default)]
    dependency: Vec<PomDependency>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PomDependency {
    group_id: Option<String>,
    artifact_id: Option<String>,
    version: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Metadata {
    #[serde(default)]
    versioning: Option<Versioning>,
}

#[derive(Debug, Default, Deserialize)]
struct Versioning {
    latest: Option<String>,
    release: Option<String>,
    #[serde(default)]
    versions: Option<VersionList>,
}

#[derive(Debug, Default, Deserialize)]
struct VersionList {
    #[serde(default)]
    version: Vec<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Extracts the direct dependencies declared by a POM, in document order.
///
/// Entries without a group or artifact (typically inherited from a parent)
/// are skipped; a missing version is recorded as [`UNKNOWN_VERSION`].
///
/// # Example
///
/// ```
/// use depscope::parser::pom::parse_dependencies;
///
/// let pom = r#"<project>
///   <dependencies>
///     <dependency>
///       <groupId>junit</groupId>
///       <artifactId>junit</artifactId>
///       <version>4.13.2</version>
///     </dependency>
///   </dependencies>
/// </project>"#;
///
/// let deps = parse_dependencies(pom).unwrap();
/// assert_eq!(deps.len(), 1);
/// assert_eq!(deps[0].to_string(), "junit:junit:4.13.2");
/// ```
pub fn parse_dependencies(content: &str) -> ParseResult<Vec<Dependency>> {
    let project: Project = quick_xml::de::from_str(content)?;

    let deps = project
        .dependencies
        .unwrap_or_default()
        .dependency
        .into_iter()
        .filter_map(|dep| {
            let group = non_empty(dep.group_id)?;
            let artifact = non_empty(dep.artifact_id)?;
            let version = non_empty(dep.version).unwrap_or_else(|| UNKNOWN_VERSION.to_string());
            Some(Dependency::new(group, artifact, version))
        })
        .collect();

    Ok(deps)
}

/// Resolves the version to fetch from a `maven-metadata.xml` document.
///
/// Preference order: `latest`, then `release`, then the last non-SNAPSHOT
/// entry of `versions`, then the last entry of `versions`.
///
/// ```
/// use depscope::parser::pom::resolve_latest_version;
///
/// let metadata = r#"<metadata>
///   <versioning>
///     <versions><version>1.0</version><version>1.1-SNAPSHOT</version></versions>
///   </versioning>
/// </metadata>"#;
///
/// assert_eq!(resolve_latest_version(metadata).unwrap(), "1.0");
/// ```
pub fn resolve_latest_version(content: &str) -> ParseResult<String> {
    let metadata: Metadata = quick_xml::de::from_str(content)?;
    let versioning = metadata.versioning.ok_or(ParseError::NoVersion)?;

    if let Some(latest) = non_empty(versioning.latest) {
        return Ok(latest);
    }
    if let Some(release) = non_empty(versioning.release) {
        return Ok(release);
    }

    let versions: Vec<String> = versioning
        .versions
        .unwrap_or_default()
        .version
        .into_iter()
        .filter_map(|v| non_empty(Some(v)))
        .collect();

    versions
        .iter()
        .rev()
        .find(|v| !v.contains("SNAPSHOT"))
        .or_else(|| versions.last())
        .cloned()
        .ok_or(ParseError::NoVersion)
}
