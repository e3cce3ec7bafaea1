use clap::{Parser, Subcommand};
use collab_graph::config::{load_config, DEFAULT_CONFIG_PATH};
use collab_graph::engine::Engine;
use collab_graph::logger::{self, init_logger, TracingLogger};
use collab_graph::scrapers::cancel::CancellationToken;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "collab-graph")]
#[command(about = "Co-authorship graph ingestion & maintenance engine", long_about = None)]
struct Cli {
    /// Path to the JSON configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Override the snapshot path from the configuration
    #[arg(long)]
    snapshot: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Track a new author (no-op if the name is already tracked)
    Add {
        #[arg(long)]
        name: String,
        /// arXiv category clause, e.g. "cat:cs.LG OR cat:stat.ML"
        #[arg(long, default_value = "")]
        cats: String,
    },
    /// Remove an author and everything that depended on it
    Remove {
        #[arg(long)]
        id: u64,
    },
    /// Fetch an author's papers from arXiv and merge them into the graph
    Fetch {
        #[arg(long)]
        id: u64,
    },
    /// Download a paper's PDF
    Download {
        #[arg(long)]
        id: String,
    },
    /// Print the node/edge view
    Graph,
    /// Print an author's papers
    Papers {
        #[arg(long)]
        id: u64,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    init_logger(TracingLogger);

    let cli = Cli::parse();

    let mut config = load_config(&cli.config)?;
    if let Some(snapshot) = cli.snapshot {
        config.snapshot_path = snapshot;
    }

    let engine = Engine::open(config)?;

    match cli.command {
        Commands::Add { name, cats } => {
            let author = engine.add_author(&name, &cats).await?;
            print_json(&author)?;
        }
        Commands::Remove { id } => {
            let report = engine.remove_author(id).await?;
            logger::info(&format!(
                "Removed author {} ({} paper(s) deleted)",
                report.author_id,
                report.papers_deleted.len()
            ));
        }
        Commands::Fetch { id } => {
            let cancel = CancellationToken::new();
            let on_signal = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    logger::warn("Interrupt received; stopping after the current page");
                    on_signal.cancel();
                }
            });

            let report = engine.ingest_with_cancel(id, &cancel).await?;
            logger::info(&format!(
                "Fetched {} page(s), merged {} entries",
                report.pages_fetched, report.entries_merged
            ));
        }
        Commands::Download { id } => {
            let paper = engine.download_paper(&id).await?;
            print_json(&paper)?;
        }
        Commands::Graph => {
            print_json(&engine.graph_view().await)?;
        }
        Commands::Papers { id } => {
            print_json(&engine.papers_of(id).await?)?;
        }
    }

    Ok(())
}
