//! Run configuration.
//!
//! Everything here is validated before a traversal starts; a
//! [`ConfigError`] is always fatal.

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use tracing::{info, warn};

use crate::graph::BoundaryPolicy;
use crate::parser::{CoordinateError, PackageCoordinate};
use crate::source::{
    DependencySource, FixtureSource, RemoteSource, RemoteSourceConfig, SourceResult,
};

/// Default traversal depth.
pub const DEFAULT_MAX_DEPTH: usize = 3;

/// Depths above this are accepted but logged as potentially slow.
pub const DEEP_TRAVERSAL_WARNING: usize = 100;

/// Where results can differ from a full Maven dependency resolution.
pub const LIMITATIONS: &str = "\
Results can differ from Maven's own tooling because this traversal ignores:
  - dependencyManagement inherited from parent POMs
  - profiles
  - property placeholders in versions
  - dependency scopes (compile, test, provided, runtime)
  - optional dependencies and exclusions
  - version conflict resolution
Only the requested depth is explored. Fixture and demo runs use static data.
For an exact picture use `mvn dependency:tree` or `mvn dependency:analyze`.
";

/// Errors raised while validating the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The root package is not a `group:artifact` pair.
    #[error(transparent)]
    InvalidRoot(#[from] CoordinateError),

    /// The maximum depth is zero.
    #[error("Maximum depth must be a positive number, got {0}")]
    NonPositiveDepth(usize),

    /// The repository URL does not use http or https.
    #[error("Repository URL must start with http:// or https://, got '{0}'")]
    InvalidUrl(String),

    /// A filter was given but contains only whitespace.
    #[error("Filter substring must not be blank")]
    BlankFilter,
}

/// Traversal settings handed to the graph builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalConfig {
    /// Root package
    pub root: PackageCoordinate,
    /// Number of levels explored, root included (at least 1)
    pub max_depth: usize,
    /// Optional case-insensitive substring filter
    pub filter: Option<String>,
    /// Treatment of the last level
    pub boundary: BoundaryPolicy,
}

impl TraversalConfig {
    /// Validates and creates traversal settings.
    ///
    /// ```
    /// use depscope::config::{ConfigError, TraversalConfig};
    ///
    /// assert!(TraversalConfig::new("junit:junit", 3, None).is_ok());
    /// assert!(matches!(
    ///     TraversalConfig::new("junit:junit", 0, None),
    ///     Err(ConfigError::NonPositiveDepth(0))
    /// ));
    /// ```
    pub fn new(root: &str, max_depth: usize, filter: Option<String>) -> Result<Self, ConfigError> {
        let root = PackageCoordinate::parse(root)?;

        if max_depth == 0 {
            return Err(ConfigError::NonPositiveDepth(max_depth));
        }
        if max_depth > DEEP_TRAVERSAL_WARNING {
            warn!(max_depth, "very deep traversal requested, this may take a long time");
        }
        if filter.as_deref().is_some_and(|f| f.trim().is_empty()) {
            return Err(ConfigError::BlankFilter);
        }

        Ok(Self {
            root,
            max_depth,
            filter,
            boundary: BoundaryPolicy::default(),
        })
    }

    /// Sets the boundary policy.
    pub fn with_boundary_policy(mut self, boundary: BoundaryPolicy) -> Self {
        self.boundary = boundary;
        self
    }
}

/// Where dependency lists come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceConfig {
    /// HTTP repository
    Remote(RemoteSourceConfig),
    /// JSON fixture file
    Fixture(PathBuf),
    /// Built-in demo data
    Demo,
}

impl SourceConfig {
    /// Validates and creates a remote source configuration.
    pub fn remote(url: &str, timeout: Duration, retries: u32) -> Result<Self, ConfigError> {
        let url = url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(url.to_string()));
        }

        Ok(Self::Remote(RemoteSourceConfig {
            base_url: url.to_string(),
            timeout,
            retries,
        }))
    }

    /// Opens the configured source.
    pub fn open(&self) -> SourceResult<Box<dyn DependencySource>> {
        let source: Box<dyn DependencySource> = match self {
            Self::Remote(config) => Box::new(RemoteSource::new(config.clone())?),
            Self::Fixture(path) => Box::new(FixtureSource::from_file(path)?),
            Self::Demo => Box::new(FixtureSource::demo()),
        };
        Ok(source)
    }

    /// Human-readable description of the source.
    pub fn describe(&self) -> String {
        match self {
            Self::Remote(config) => format!("remote repository {}", config.base_url),
            Self::Fixture(path) => format!("fixture file {}", path.display()),
            Self::Demo => String::from("built-in demo data"),
        }
    }
}

/// Which renderings to produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputOptions {
    /// Print the ASCII tree
    pub tree: bool,
    /// Write the D2 diagram and try to render it
    pub visualize: bool,
    /// Print the JSON export
    pub json: bool,
    /// Directory for generated files
    pub output_dir: PathBuf,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            tree: false,
            visualize: false,
            json: false,
            output_dir: PathBuf::from("."),
        }
    }
}

/// Complete validated configuration of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// What to explore and how deep
    pub traversal: TraversalConfig,
    /// Where dependency lists come from
    pub source: SourceConfig,
    /// Renderings to produce
    pub output: OutputOptions,
}

impl AppConfig {
    /// The effective settings as `(name, value)` pairs, in display order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let flag = |on: bool| if on { "yes" } else { "no" }.to_string();
        vec![
            ("package", self.traversal.root.to_string()),
            ("source", self.source.describe()),
            ("max_depth", self.traversal.max_depth.to_string()),
            (
                "filter",
                self.traversal.filter.clone().unwrap_or_else(|| "none".to_string()),
            ),
            ("boundary", format!("{:?}", self.traversal.boundary)),
            ("tree", flag(self.output.tree)),
            ("visualize", flag(self.output.visualize)),
            ("json", flag(self.output.json)),
            ("output_dir", self.output.output_dir.display().to_string()),
        ]
    }

    /// Writes the effective settings as an aligned block.
    pub fn write_summary<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let rule = "-".repeat(40);
        writeln!(writer, "Configuration")?;
        writeln!(writer, "{}", rule)?;
        for (key, value) in self.entries() {
            writeln!(writer, "{:<12}: {}", key, value)?;
        }
        writeln!(writer, "{}", rule)
    }

    /// Logs the effective configuration.
    pub fn log_summary(&self) {
        info!(
            package = %self.traversal.root,
            source = %self.source.describe(),
            max_depth = self.traversal.max_depth,
            filter = self.traversal.filter.as_deref().unwrap_or("none"),
            boundary = ?self.traversal.boundary,
            tree = self.output.tree,
            visualize = self.output.visualize,
            json = self.output.json,
            "configuration loaded"
        );
    }
}
