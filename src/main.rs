//! vecgate: HTTP gateway for managed vector search

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use vecgate::{
    backend::IndexClient,
    config::Config,
    http::{AppState, HttpServer},
    ingest,
    retrieval::Retriever,
};

#[derive(Parser)]
#[command(name = "vecgate")]
#[command(about = "HTTP gateway for dense, sparse, and hybrid vector search")]
#[command(version)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server
    Serve {
        /// Listen address (overrides VECGATE_LISTEN_ADDR)
        #[arg(short, long)]
        listen: Option<String>,
    },

    /// Chunk a JSONL dataset and upsert it to both indexes
    Load {
        /// Path to the JSONL dataset
        path: PathBuf,

        /// Field of each item to sentence-chunk
        #[arg(short, long, default_value = "target")]
        field: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = Config::from_env()?;

    match cli.command {
        Commands::Serve { listen } => {
            if let Some(addr) = listen {
                config.http.listen_addr = addr;
            }
            serve(config).await
        }
        Commands::Load { path, field } => load(config, path, field).await,
    }
}

async fn serve(config: Config) -> Result<()> {
    let dense = IndexClient::new(
        &config.backend.dense_index_host,
        &config.backend.api_key,
        config.backend.timeout_secs,
    )?;
    let sparse = IndexClient::new(
        &config.backend.sparse_index_host,
        &config.backend.api_key,
        config.backend.timeout_secs,
    )?;

    info!(
        "Connecting to dense index '{}' and sparse index '{}', namespace '{}'",
        config.backend.dense_index_host,
        config.backend.sparse_index_host,
        config.retrieval.namespace
    );

    let retriever = Arc::new(Retriever::new(dense, sparse, config.retrieval.clone()));
    let state = AppState { retriever };

    HttpServer::new(config.http, state).run().await
}

async fn load(config: Config, path: PathBuf, field: String) -> Result<()> {
    let dense = IndexClient::new(
        &config.backend.dense_index_host,
        &config.backend.api_key,
        config.backend.timeout_secs,
    )?;
    let sparse = IndexClient::new(
        &config.backend.sparse_index_host,
        &config.backend.api_key,
        config.backend.timeout_secs,
    )?;

    info!("Loading dataset from {}", path.display());

    let stats = ingest::load_dataset(
        &path,
        &field,
        &config.retrieval.namespace,
        &dense,
        &sparse,
    )
    .await?;

    println!("\nIngestion complete!");
    println!("==================");
    println!("Items read:      {}", stats.items_read);
    println!("Chunks created:  {}", stats.chunks_created);
    println!("Batches upserted: {}", stats.batches_upserted);
    println!("Batches failed:   {}", stats.batches_failed);

    Ok(())
}
