//! Remote repository source.
//!
//! Resolves the latest version of a package from the repository's
//! `maven-metadata.xml`, then downloads and parses that version's POM.

use std::time::Duration;

use tracing::{debug, warn};

use super::{DependencySource, SourceError, SourceResult};
use crate::parser::{self, Dependency, PackageCoordinate};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for [`RemoteSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSourceConfig {
    /// Repository root, e.g. `https://repo.maven.apache.org/maven2`
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Extra attempts after a transport failure (HTTP errors are not retried)
    pub retries: u32,
}

impl RemoteSourceConfig {
    /// Creates a config with the default timeout and no retries.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            retries: 0,
        }
    }
}

/// Dependency source backed by an HTTP repository with the standard layout.
#[derive(Debug, Clone)]
pub struct RemoteSource {
    base_url: String,
    client: reqwest::blocking::Client,
    retries: u32,
}

impl RemoteSource {
    /// Builds the HTTP client for the given repository.
    pub fn new(config: RemoteSourceConfig) -> SourceResult<Self> {
        let base_url = normalize_base_url(&config.base_url);
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("depscope/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| SourceError::Transport {
                url: base_url.clone(),
                source,
            })?;

        Ok(Self {
            base_url,
            client,
            retries: config.retries,
        })
    }

    /// Repository root this source reads from.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the package's `maven-metadata.xml`.
    pub fn metadata_url(&self, coordinate: &PackageCoordinate) -> String {
        format!("{}/maven-metadata.xml", self.package_dir(coordinate))
    }

    /// URL of the POM for a specific version.
    pub fn pom_url(&self, coordinate: &PackageCoordinate, version: &str) -> String {
        format!(
            "{}/{version}/{}-{version}.pom",
            self.package_dir(coordinate),
            coordinate.artifact
        )
    }

    fn package_dir(&self, coordinate: &PackageCoordinate) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            coordinate.group.replace('.', "/"),
            coordinate.artifact
        )
    }

    /// Resolves the version to explore from repository metadata.
    pub fn resolve_version(&self, coordinate: &PackageCoordinate) -> SourceResult<String> {
        let metadata = self.get_text(&self.metadata_url(coordinate))?;
        parser::resolve_latest_version(&metadata).map_err(|source| SourceError::Parse {
            coordinate: coordinate.clone(),
            source,
        })
    }

    fn get_text(&self, url: &str) -> SourceResult<String> {
        let mut attempt = 0;
        loop {
            match self.try_get_text(url) {
                Err(err @ SourceError::Transport { .. }) if attempt < self.retries => {
                    attempt += 1;
                    warn!(%url, attempt, error = %err, "retrying request");
                }
                result => return result,
            }
        }
    }

    fn try_get_text(&self, url: &str) -> SourceResult<String> {
        let transport = |source| SourceError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status,
            });
        }

        response.text().map_err(transport)
    }
}

impl DependencySource for RemoteSource {
    fn fetch(&self, coordinate: &PackageCoordinate) -> SourceResult<Vec<Dependency>> {
        let version = self.resolve_version(coordinate)?;
        debug!(%coordinate, %version, "resolved version");

        let url = self.pom_url(coordinate, &version);
        debug!(%url, "downloading descriptor");
        let pom = self.get_text(&url)?;

        parser::parse_dependencies(&pom).map_err(|source| SourceError::Parse {
            coordinate: coordinate.clone(),
            source,
        })
    }

    fn describe(&self) -> String {
        format!("remote repository {}", self.base_url)
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(url: &str) -> RemoteSource {
        RemoteSource::new(RemoteSourceConfig::new(url)).unwrap()
    }

    #[test]
    fn test_metadata_url() {
        let remote = source("https://repo.maven.apache.org/maven2/");
        let coord = PackageCoordinate::new("org.springframework", "spring-core");
        assert_eq!(
            remote.metadata_url(&coord),
            "https://repo.maven.apache.org/maven2/org/springframework/spring-core/maven-metadata.xml"
        );
    }

    #[test]
    fn test_pom_url() {
        let remote = source("https://repo.maven.apache.org/maven2");
        let coord = PackageCoordinate::new("junit", "junit");
        assert_eq!(
            remote.pom_url(&coord, "4.13.2"),
            "https://repo.maven.apache.org/maven2/junit/junit/4.13.2/junit-4.13.2.pom"
        );
    }

    #[test]
    fn test_describe() {
        let remote = source("http://localhost:8081/repo/");
        assert_eq!(remote.base_url(), "http://localhost:8081/repo");
        assert_eq!(remote.describe(), "remote repository http://localhost:8081/repo");
    }

    #[test]
    fn test_unreachable_repository_is_transport_error() {
        let config = RemoteSourceConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_secs(2),
            retries: 1,
        };
        let remote = RemoteSource::new(config).unwrap();

        let err = remote
            .fetch(&PackageCoordinate::new("junit", "junit"))
            .unwrap_err();
        assert!(matches!(err, SourceError::Transport { .. }));
    }
}
