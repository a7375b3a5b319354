use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use docqa::config::{self, DemoConfig, WorkspaceAuth};
use docqa::logging;
use docqa::processing::{IngestionService, PdfTextExtractor};
use docqa::sink::JsonlSink;
use docqa::staging;
use docqa::vector_search::{DeltaSyncIndexSpec, SearchMatch, VectorSearchService};

/// Demo questions run when `query` is invoked without arguments.
const DEMO_QUERIES: [&str; 5] = [
    "Onde fala sobre multa por rescisão antecipada?",
    "Qual o aviso prévio para cancelar?",
    "Quais são os prazos de liquidação para débito e crédito à vista?",
    "Qual a garantia do equipamento e o que não cobre?",
    "Por quanto tempo vale o desconto aplicado e quando ele pode ser removido?",
];

const EXCERPT_CHARS: usize = 650;

#[derive(Parser)]
#[command(
    name = "docqa",
    about = "Document QA demo pipeline: stage PDFs, chunk text, sync a vector search index"
)]
struct Cli {
    /// Path to the demo configuration file.
    #[arg(long, global = true, default_value = "conf/demo_config.yml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the resolved configuration and derived volume paths.
    Config,
    /// Copy the demo PDFs into the storage volume.
    Stage {
        /// Directory holding the source PDFs.
        #[arg(long, default_value = "assets/pdfs/pt-br")]
        source: PathBuf,
        /// Override for the local volume directory.
        #[arg(long)]
        volume_dir: Option<PathBuf>,
    },
    /// Extract and chunk staged PDFs into the chunk record file.
    Ingest {
        /// Override for the local volume directory.
        #[arg(long)]
        volume_dir: Option<PathBuf>,
    },
    /// Ensure the vector search endpoint and delta-sync index exist and are ready.
    Index,
    /// Run similarity queries against the index and print the matches.
    Query {
        /// Questions to ask; the built-in demo questions run when omitted.
        queries: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_tracing();
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    match cli.command {
        Command::Config => show_config(&cfg),
        Command::Stage { source, volume_dir } => {
            let dest = volume_dir.unwrap_or_else(|| PathBuf::from(cfg.volume_local_path()));
            let copied = staging::stage_pdfs(&source, &dest)?;
            println!("Staged {copied} PDF(s) into {}", dest.display());
        }
        Command::Ingest { volume_dir } => ingest(&cfg, volume_dir).await?,
        Command::Index => index(&cfg).await?,
        Command::Query { queries } => query(&cfg, queries).await?,
    }

    Ok(())
}

fn show_config(cfg: &DemoConfig) {
    println!("Catalog:               {}", cfg.catalog);
    println!("Schema:                {}", cfg.schema);
    println!("Volume (uri):          {}", cfg.volume_uri());
    println!("Volume (local):        {}", cfg.volume_local_path());
    println!("Source table:          {}", cfg.source_table);
    println!("Vector search endpoint: {}", cfg.vector_search_endpoint);
    println!("Vector search index:   {}", cfg.vector_search_index);
    println!("Chat model endpoint:   {}", cfg.chat_model_endpoint);
    println!("Embedding endpoint:    {}", cfg.embedding_model_endpoint);
    println!("Chunk window:          {} chars", cfg.max_chars());
    println!("Chunk overlap:         {} chars", cfg.overlap());
    println!("Language tag:          {}", cfg.lang);
}

async fn ingest(cfg: &DemoConfig, volume_dir: Option<PathBuf>) -> anyhow::Result<()> {
    let volume_dir = volume_dir.unwrap_or_else(|| PathBuf::from(cfg.volume_local_path()));
    let sink = JsonlSink::new(volume_dir.join("chunks.jsonl"));
    let service = IngestionService::new(
        Box::new(PdfTextExtractor::new()),
        Box::new(sink),
        cfg.max_chars(),
        cfg.overlap(),
    );

    let outcome = service
        .ingest_dir(&volume_dir, &cfg.volume_uri(), &cfg.lang)
        .await?;

    println!(
        "Ingested {} document(s), {} page(s), {} chunk(s) for table {}",
        outcome.documents, outcome.pages, outcome.chunks, cfg.source_table
    );
    Ok(())
}

async fn index(cfg: &DemoConfig) -> anyhow::Result<()> {
    let auth = WorkspaceAuth::from_env()?;
    let service = VectorSearchService::new(&auth)?;

    service.ensure_endpoint(&cfg.vector_search_endpoint).await?;

    let spec = DeltaSyncIndexSpec {
        endpoint_name: cfg.vector_search_endpoint.clone(),
        index_name: cfg.vector_search_index.clone(),
        source_table: cfg.source_table.clone(),
        primary_key: "doc_id".to_string(),
        embedding_source_column: "content".to_string(),
        embedding_model_endpoint: cfg.embedding_model_endpoint.clone(),
        columns_to_sync: vec![
            "source_path".to_string(),
            "doc_name".to_string(),
            "page".to_string(),
            "chunk_id".to_string(),
            "content".to_string(),
            "lang".to_string(),
        ],
    };
    service.ensure_index(&spec).await?;

    println!(
        "Endpoint '{}' and index '{}' are ready",
        cfg.vector_search_endpoint, cfg.vector_search_index
    );
    Ok(())
}

async fn query(cfg: &DemoConfig, queries: Vec<String>) -> anyhow::Result<()> {
    let auth = WorkspaceAuth::from_env()?;
    let service = VectorSearchService::new(&auth)?;
    let queries = if queries.is_empty() {
        DEMO_QUERIES.iter().map(|q| q.to_string()).collect()
    } else {
        queries
    };

    for question in &queries {
        println!("\n{}", "=".repeat(100));
        println!("Q: {question}");

        let rows = service
            .similarity_search(
                &cfg.vector_search_index,
                question,
                &SearchMatch::COLUMNS,
                4,
            )
            .await?;

        for (rank, row) in rows.iter().enumerate() {
            let Some(hit) = SearchMatch::from_row(row) else {
                tracing::warn!(?row, "Skipping result row with unexpected shape");
                continue;
            };
            println!(
                "\n--- Match {} | {} | page {} ---",
                rank + 1,
                hit.doc_name,
                hit.page
            );
            println!("{}", excerpt(&hit.content, EXCERPT_CHARS));
        }
    }

    Ok(())
}

/// First `limit` characters of `text`, with an ellipsis when truncated.
fn excerpt(text: &str, limit: usize) -> String {
    let mut taken: String = text.chars().take(limit).collect();
    if text.chars().count() > limit {
        taken.push_str("...");
    }
    taken
}
