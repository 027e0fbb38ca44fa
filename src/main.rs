use std::io;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use depscope::config::{
    AppConfig, OutputOptions, SourceConfig, TraversalConfig, DEFAULT_MAX_DEPTH, LIMITATIONS,
};
use depscope::export::{self, d2, ExportData, ExportFormat, RenderOutcome};
use depscope::graph::{BoundaryPolicy, DependencyGraph, GraphBuilder};
use depscope::parser::PackageCoordinate;
use depscope::source::DependencySource;

/// Packages explored by `--demo`.
const DEMO_PACKAGES: [&str; 3] = [
    "junit:junit",
    "org.springframework:spring-core",
    "com.example:my-app",
];

#[derive(Parser)]
#[command(name = "depscope")]
#[command(author = "Zachary Woods <143150513+zach-fau@users.noreply.github.com>")]
#[command(version)]
#[command(
    about = "Explore the transitive dependency graph of a group:artifact package",
    long_about = None
)]
struct Cli {
    /// Package to analyze (format: groupId:artifactId)
    #[arg(short, long)]
    package: String,

    /// Repository URL (remote mode)
    #[arg(short, long, env = "DEPSCOPE_REPO_URL", conflicts_with = "fixture")]
    url: Option<String>,

    /// JSON fixture file with dependency data (offline mode)
    #[arg(long)]
    fixture: Option<PathBuf>,

    /// Maximum traversal depth
    #[arg(short = 'd', long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Only keep dependencies whose group:artifact:version contains this substring
    #[arg(short, long)]
    filter: Option<String>,

    /// Print the dependency tree
    #[arg(short, long)]
    tree: bool,

    /// Write a D2 diagram and render it if d2 is installed
    #[arg(long)]
    visualize: bool,

    /// Print the graph as JSON
    #[arg(long)]
    json: bool,

    /// Directory for generated diagram files
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Record packages on the last level as leaves without fetching them
    #[arg(long)]
    leaf_at_boundary: bool,

    /// Request timeout in seconds (remote mode)
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Extra attempts after a connection failure (remote mode)
    #[arg(long, default_value_t = 0)]
    retries: u32,

    /// Also summarize a few well-known packages from the same source
    #[arg(long)]
    demo: bool,

    /// Print the effective configuration before running
    #[arg(long)]
    show_config: bool,

    /// Explain how results can differ from Maven's own tooling
    #[arg(long)]
    explain: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn into_config(self) -> Result<AppConfig> {
        let boundary = if self.leaf_at_boundary {
            BoundaryPolicy::LeafAtBoundary
        } else {
            BoundaryPolicy::RecordEdges
        };
        let traversal = TraversalConfig::new(&self.package, self.max_depth, self.filter)?
            .with_boundary_policy(boundary);

        let source = match (self.url, self.fixture) {
            (Some(url), _) => {
                SourceConfig::remote(&url, Duration::from_secs(self.timeout), self.retries)?
            }
            (None, Some(path)) => SourceConfig::Fixture(path),
            (None, None) => SourceConfig::Demo,
        };

        Ok(AppConfig {
            traversal,
            source,
            output: OutputOptions {
                tree: self.tree,
                visualize: self.visualize,
                json: self.json,
                output_dir: self.output_dir,
            },
        })
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn print_section(title: &str) {
    println!("\n{}", title);
    println!("{}", "-".repeat(60));
}

fn print_outputs(config: &AppConfig, graph: &DependencyGraph) -> Result<()> {
    let root = &config.traversal.root;
    let data = ExportData::new(root, graph, config.traversal.max_depth);
    let direct = graph.dependencies(root).map_or(0, <[_]>::len);

    print_section(&format!("Direct dependencies of {} ({})", root, direct));
    print!("{}", export::export_to_string(ExportFormat::List, &data)?);

    if config.output.tree {
        print_section(&format!("Dependency tree for {}", root));
        print!("{}", export::export_to_string(ExportFormat::Tree, &data)?);
    }

    if config.output.visualize {
        visualize(root, graph, &config.output.output_dir)?;
    }

    if config.output.json {
        print_section("JSON");
        print!("{}", export::export_to_string(ExportFormat::Json, &data)?);
    }

    Ok(())
}

fn visualize(root: &PackageCoordinate, graph: &DependencyGraph, dir: &Path) -> Result<()> {
    print_section("D2 diagram");
    print!("{}", d2::serialize_diagram(graph));

    let path = d2::write_diagram(graph, root, dir)
        .with_context(|| format!("Failed to write diagram into {}", dir.display()))?;
    println!("Diagram saved to {}", path.display());

    match d2::render_image(&path) {
        RenderOutcome::Rendered(image) => println!("Image saved to {}", image.display()),
        RenderOutcome::RendererMissing => {
            println!("Install D2 (https://d2lang.com/) to render the diagram as an image")
        }
        RenderOutcome::Failed(reason) => warn!(%reason, "d2 failed to render the diagram"),
    }
    Ok(())
}

fn print_summary(graph: &DependencyGraph) {
    println!(
        "\nPackages: {}  Edges: {}",
        graph.node_count(),
        graph.edge_count()
    );
    for cycle in graph.detect_cycles() {
        println!("Circular dependency: {}", cycle.cycle_path());
    }
}

fn run_demo(source: &dyn DependencySource, config: &TraversalConfig) {
    print_section("Examples");
    let builder = GraphBuilder::from_config(source, config);
    for package in DEMO_PACKAGES {
        match builder.build(package) {
            Ok(graph) => println!(
                "{:<35} packages: {:>3}  edges: {:>3}",
                package,
                graph.node_count(),
                graph.edge_count()
            ),
            Err(err) => warn!(%package, error = %err, "skipping example"),
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let (demo, show_config, explain) = (cli.demo, cli.show_config, cli.explain);
    let config = cli.into_config()?;
    config.log_summary();

    if show_config {
        config.write_summary(&mut io::stdout().lock())?;
    }

    let source = config
        .source
        .open()
        .with_context(|| format!("Failed to open {}", config.source.describe()))?;

    info!(package = %config.traversal.root, "building dependency graph");
    let graph = GraphBuilder::from_config(&*source, &config.traversal)
        .build_from(&config.traversal.root);

    print_outputs(&config, &graph)?;
    print_summary(&graph);

    if demo {
        run_demo(&*source, &config.traversal);
    }

    if explain {
        print_section("Comparison with Maven tooling");
        print!("{}", LIMITATIONS);
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("Error: {:#}", err);
        process::exit(1);
    }
}
