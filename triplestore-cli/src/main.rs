// Copyright 2025 Sushanth (https://github.com/sushanthpy)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! Triplestore CLI
//!
//! Command-line interface for local triple stores.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use triplestore_core::{
    EventKind, Graph, GraphName, GraphScope, ResultSet, RoutingKeyBuilder, Term, TriplePattern,
    TripleStoreConfig,
};
use triplestore_service::{
    InMemoryBus, MessageBus, SchemaLoad, SubscriptionFilter, TripleStoreService,
};
use triplestore_storage::{codec, FilesystemTripleStore};

#[derive(Parser)]
#[command(name = "triplestore")]
#[command(about = "Triplestore - partitioned RDF store", long_about = None)]
struct Cli {
    /// Store directory
    #[arg(short, long, default_value = "./triplestore-data")]
    store: PathBuf,

    /// TOML configuration file (overrides --store)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose mode
    #[arg(short, long)]
    verbose: bool,

    /// Output as JSON (machine-readable)
    #[arg(long)]
    json: bool,

    /// Print every published mutation event to stderr
    #[arg(long)]
    events: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    Insert,
    Delete,
}

impl From<Kind> for EventKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Insert => EventKind::Insert,
            Kind::Delete => EventKind::Delete,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Insert the triples of a Turtle file
    Insert {
        file: PathBuf,

        /// Target named graph (default graph if omitted)
        #[arg(long)]
        graph: Option<String>,
    },

    /// Remove the triples of a Turtle file
    Remove {
        file: PathBuf,

        #[arg(long)]
        graph: Option<String>,
    },

    /// Run a SPARQL query against the whole store
    Query { sparql: String },

    /// Run a SPARQL query against one view
    QueryView { view: String, sparql: String },

    /// Print the partition of one subject
    Subject { iri: String },

    /// List materialized views
    Views,

    /// Load schema files with change tracking
    LoadSchema {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Print the union of all loaded schemas
    Schema,

    /// Named graph management
    Graphs {
        #[command(subcommand)]
        command: GraphCommands,
    },

    /// Print the routing key of one N-Triples statement
    RoutingKey {
        /// e.g. '<http://example.org/s> <http://example.org/p> "o"'
        statement: String,

        #[arg(long, value_enum, default_value = "insert")]
        kind: Kind,

        #[arg(long)]
        graph: Option<String>,
    },

    /// Print the subscription pattern for a filter
    Pattern {
        #[arg(long, value_enum)]
        kind: Option<Kind>,

        /// `*` (any), `default`, or a graph IRI
        #[arg(long, default_value = "*")]
        graph: String,

        /// N-Triples terms, e.g. '<http://example.org/s>'
        #[arg(long)]
        subject: Option<String>,

        #[arg(long)]
        predicate: Option<String>,

        #[arg(long)]
        object: Option<String>,
    },
}

#[derive(Subcommand)]
enum GraphCommands {
    List,
    Create { iri: String },
    Drop { iri: String },
    /// Clear a graph (the default graph if no IRI is given)
    Clear { iri: Option<String> },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Commands that don't touch a store
    match &cli.command {
        Commands::RoutingKey {
            statement,
            kind,
            graph,
        } => return print_routing_key(statement, (*kind).into(), graph.as_deref(), cli.json),
        Commands::Pattern {
            kind,
            graph,
            subject,
            predicate,
            object,
        } => {
            return print_pattern(
                kind.map(Into::into),
                graph,
                [subject.as_deref(), predicate.as_deref(), object.as_deref()],
                cli.json,
            )
        }
        _ => {}
    }

    let config = match &cli.config {
        Some(path) => TripleStoreConfig::load(path)
            .with_context(|| format!("Failed to load config {:?}", path))?,
        None => TripleStoreConfig::at(&cli.store),
    };

    let store = Arc::new(
        FilesystemTripleStore::open_with_config(&config).context("Failed to open store")?,
    );
    let bus = if cli.events {
        let bus: Arc<dyn MessageBus> = Arc::new(InMemoryBus::new());
        Some(bus)
    } else {
        None
    };
    let service = TripleStoreService::new(store.clone(), bus, &config)
        .context("Failed to start service")?;
    if cli.events {
        service.subscribe(
            &SubscriptionFilter::default(),
            Arc::new(|payload: &[u8]| eprint!("event: {}", String::from_utf8_lossy(payload))),
        )?;
    }
    info!("Opened store at {:?}", config.store_path);

    match cli.command {
        Commands::RoutingKey { .. } | Commands::Pattern { .. } => {}

        Commands::Insert { file, graph } => {
            let triples = read_turtle(&file)?;
            service.insert(&triples, &GraphName::from_option(graph.as_deref()))?;
            report(cli.json, "inserted", triples.len());
        }

        Commands::Remove { file, graph } => {
            let triples = read_turtle(&file)?;
            service.remove(&triples, &GraphName::from_option(graph.as_deref()))?;
            report(cli.json, "removed", triples.len());
        }

        Commands::Query { sparql } => {
            print_results(&service.query(&sparql)?, cli.json)?;
        }

        Commands::QueryView { view, sparql } => {
            print_results(&service.query_view(&view, &sparql)?, cli.json)?;
        }

        Commands::Subject { iri } => {
            let graph = service.get_subject_graph(&Term::iri(iri))?;
            print_graph(&graph, cli.json)?;
        }

        Commands::Views => {
            let views = store.list_views()?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&views)?);
            } else {
                for view in views {
                    println!("{}", view);
                }
            }
        }

        Commands::LoadSchema { files } => {
            let loaded = service.load_schemas(&files);
            if cli.json {
                let rows: Vec<_> = loaded
                    .iter()
                    .map(|(path, outcome)| {
                        serde_json::json!({
                            "path": path.to_string_lossy(),
                            "outcome": describe(outcome),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                for (path, outcome) in &loaded {
                    println!("✓ {:?}: {}", path, describe(outcome));
                }
            }
            if loaded.len() < files.len() {
                bail!("{} of {} schemas failed to load", files.len() - loaded.len(), files.len());
            }
        }

        Commands::Schema => {
            print_graph(&service.get_schema_graph()?, cli.json)?;
        }

        Commands::Graphs { command } => match command {
            GraphCommands::List => {
                let graphs = service.list_graphs()?;
                if cli.json {
                    println!("{}", serde_json::to_string_pretty(&graphs)?);
                } else {
                    for graph in graphs {
                        println!("{}", graph);
                    }
                }
            }
            GraphCommands::Create { iri } => {
                service.create_graph(&iri)?;
                println!("✓ Created graph <{}>", iri);
            }
            GraphCommands::Drop { iri } => {
                service.drop_graph(&iri)?;
                println!("✓ Dropped graph <{}>", iri);
            }
            GraphCommands::Clear { iri } => {
                service.clear_graph(iri.as_deref())?;
                match iri {
                    Some(iri) => println!("✓ Cleared graph <{}>", iri),
                    None => println!("✓ Cleared default graph"),
                }
            }
        },
    }

    Ok(())
}

fn read_turtle(path: &Path) -> Result<Graph> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    codec::parse(&contents).with_context(|| format!("Failed to parse {:?}", path))
}

/// Parse one N-Triples term by wrapping it in a statement.
fn parse_term(term: &str) -> Result<Term> {
    let graph = codec::parse(&format!("<urn:triplestore:s> <urn:triplestore:p> {} .", term))
        .with_context(|| format!("Invalid term: {}", term))?;
    graph
        .into_iter()
        .next()
        .map(|t| t.object)
        .ok_or_else(|| anyhow!("Invalid term: {}", term))
}

fn report(json: bool, action: &str, count: usize) {
    if json {
        println!("{}", serde_json::json!({ action: count }));
    } else {
        println!("✓ {} {} triples", capitalize(action), count);
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn describe(outcome: &SchemaLoad) -> String {
    match outcome {
        SchemaLoad::Loaded { record, triples } => format!("loaded {} triples as {}", triples, record),
        SchemaLoad::Updated { added, removed } => format!("updated (+{} -{})", added, removed),
        SchemaLoad::Unchanged => "unchanged".to_string(),
    }
}

fn print_graph(graph: &Graph, json: bool) -> Result<()> {
    if json {
        let triples: Vec<_> = graph.iter().collect();
        println!("{}", serde_json::to_string_pretty(&triples)?);
    } else {
        print!("{}", codec::serialize(graph));
    }
    Ok(())
}

fn print_results(results: &ResultSet, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&results.to_json())?);
        return Ok(());
    }
    match results {
        ResultSet::Solutions(solutions) => {
            println!("{}", solutions.variables().join("\t"));
            for row in solutions.iter() {
                let cells: Vec<String> = solutions
                    .variables()
                    .iter()
                    .map(|v| row.get(v).map_or_else(String::new, Term::to_n3))
                    .collect();
                println!("{}", cells.join("\t"));
            }
            println!("({} rows)", solutions.len());
        }
        ResultSet::Boolean(b) => println!("{}", b),
        ResultSet::Graph(graph) => print!("{}", graph.to_ntriples()),
    }
    Ok(())
}

fn print_routing_key(statement: &str, kind: EventKind, graph: Option<&str>, json: bool) -> Result<()> {
    let statement = statement.trim().trim_end_matches('.');
    let parsed = codec::parse(&format!("{} .", statement))
        .with_context(|| format!("Invalid statement: {}", statement))?;
    let triple = parsed
        .iter()
        .next()
        .ok_or_else(|| anyhow!("No triple in statement"))?;
    let key = RoutingKeyBuilder::key(kind, &GraphName::from_option(graph), triple);
    if json {
        println!("{}", serde_json::json!({ "topic": triplestore_core::DEFAULT_TOPIC, "routing_key": key }));
    } else {
        println!("{}", key);
    }
    Ok(())
}

fn print_pattern(
    kind: Option<EventKind>,
    graph: &str,
    terms: [Option<&str>; 3],
    json: bool,
) -> Result<()> {
    let scope = match graph {
        "*" => GraphScope::Any,
        "default" => GraphScope::Default,
        iri => GraphScope::Named(iri.trim_start_matches('<').trim_end_matches('>').to_string()),
    };
    let [subject, predicate, object] = terms.map(|t| t.map(parse_term).transpose());
    let pattern = TriplePattern::new(subject?, predicate?, object?);
    let filter = SubscriptionFilter {
        pattern,
        kind,
        graph: scope,
    };
    let routing_pattern = filter.routing_pattern();
    if json {
        println!("{}", serde_json::json!({ "pattern": routing_pattern }));
    } else {
        println!("{}", routing_pattern);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_term() {
        assert_eq!(
            parse_term("<http://example.org/s>").unwrap(),
            Term::iri("http://example.org/s")
        );
        assert_eq!(parse_term("\"o\"").unwrap(), Term::literal("o"));
        assert!(parse_term("not a term").is_err());
    }
}
