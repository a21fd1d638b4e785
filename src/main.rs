use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process;

use notegraph::config::{get_config_path, load_config, save_config, WorkspaceConfig};
use notegraph::graph::GraphQueryManager;
use notegraph::snapshot::{export_graph, load_snapshot};
use notegraph::types::*;
use notegraph::uri::Uri;
use notegraph::workspace::Workspace;

/// Link graph queries over a snapshot of parsed notes.
#[derive(Parser)]
#[command(name = "notegraph", about = "Wikilink and backlink resolution for note collections")]
struct Cli {
    /// Workspace root holding `.notegraph/config.json` (default: current directory)
    #[arg(short, long, global = true)]
    root: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration
    Init {
        /// Overwrite an existing configuration
        #[arg(short, long)]
        force: bool,
    },
    /// List the targets a resource links to
    Links {
        /// Snapshot file produced by the document parser
        snapshot: PathBuf,
        /// Resource identity
        uri: String,
    },
    /// List the resources linking to a resource, grouped by source
    Backlinks {
        /// Snapshot file produced by the document parser
        snapshot: PathBuf,
        /// Resource identity
        uri: String,
    },
    /// List unresolved link targets
    Placeholders {
        /// Snapshot file produced by the document parser
        snapshot: PathBuf,
    },
    /// List resources without any connection
    Orphans {
        /// Snapshot file produced by the document parser
        snapshot: PathBuf,
    },
    /// Print the shortest wikilink key for a resource
    Identifier {
        /// Snapshot file produced by the document parser
        snapshot: PathBuf,
        /// Resource identity
        uri: String,
    },
    /// Export the resolved graph as JSON
    Export {
        /// Snapshot file produced by the document parser
        snapshot: PathBuf,
        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("notegraph=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> notegraph::Result<()> {
    let root = resolve_path(cli.root);
    match cli.command {
        Commands::Init { force } => {
            let config_path = get_config_path(&root);
            if config_path.exists() && !force {
                println!(
                    "Configuration already exists at {} (use --force to overwrite)",
                    config_path.display()
                );
            } else {
                save_config(&root, &WorkspaceConfig::default())?;
                println!("Initialized notegraph at {}", root.display());
            }
        }
        Commands::Links { snapshot, uri } => {
            let ws = open_workspace(&root, &snapshot)?;
            let uri = Uri::parse(&uri)?;
            ws.get(&uri)?;
            for connection in ws.graph().connections_from(&uri) {
                let start = connection.link.range().start;
                println!(
                    "{}:{} {} -> {}",
                    start.line,
                    start.column,
                    connection.link.target_text(),
                    connection.target
                );
            }
        }
        Commands::Backlinks { snapshot, uri } => {
            let ws = open_workspace(&root, &snapshot)?;
            let uri = Uri::parse(&uri)?;
            ws.get(&uri)?;
            print_backlinks(&ws, &uri);
        }
        Commands::Placeholders { snapshot } => {
            let ws = open_workspace(&root, &snapshot)?;
            let qm = GraphQueryManager::new(ws.store(), ws.graph());
            for (placeholder, count) in qm.find_placeholders() {
                println!("{} ({} links)", placeholder.path(), count);
            }
        }
        Commands::Orphans { snapshot } => {
            let ws = open_workspace(&root, &snapshot)?;
            for resource in ws.orphans() {
                println!("{} ({})", resource.uri(), resource.kind().as_str());
            }
        }
        Commands::Identifier { snapshot, uri } => {
            let ws = open_workspace(&root, &snapshot)?;
            let uri = Uri::parse(&uri)?;
            ws.get(&uri)?;
            println!("{}", ws.identifier_for(&uri));
        }
        Commands::Export { snapshot, pretty } => {
            let ws = open_workspace(&root, &snapshot)?;
            let export = export_graph(&ws);
            let json = if pretty {
                serde_json::to_string_pretty(&export)?
            } else {
                serde_json::to_string(&export)?
            };
            println!("{}", json);
        }
    }
    Ok(())
}

/// Prints backlinks grouped by source note, notes sorted by title and each
/// note's links by position.
fn print_backlinks(ws: &Workspace, uri: &Uri) {
    let mut groups: BTreeMap<(String, String), Vec<&Connection>> = BTreeMap::new();
    for connection in ws.graph().connections_to(uri) {
        let title = ws
            .get(&connection.source)
            .map(|r| r.title().to_string())
            .unwrap_or_default();
        groups
            .entry((title, connection.source.to_string()))
            .or_default()
            .push(connection);
    }

    if groups.is_empty() {
        println!("No backlinks found for '{}'", uri);
        return;
    }

    for ((title, source), mut connections) in groups {
        connections.sort_by_key(|c| c.link.range().start);
        println!("{} ({})", title, source);
        for connection in connections {
            let start = connection.link.range().start;
            println!("  {}:{} {}", start.line, start.column, connection.link.target_text());
        }
    }
}

fn open_workspace(root: &Path, snapshot: &Path) -> notegraph::Result<Workspace> {
    let config = load_config(root)?;
    let snapshot = load_snapshot(snapshot, &config)?;
    Ok(Workspace::with_resources(config, snapshot.resources))
}

/// Resolves an optional path argument to a `PathBuf`.
///
/// Defaults to the current working directory if no path is provided.
fn resolve_path(path: Option<String>) -> PathBuf {
    match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}
