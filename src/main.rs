use std::path::Path;
use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use ragweave::config::AppConfig;
use ragweave::rag::MemoryRagService;
use ragweave::Result;
use tracing::info;

#[derive(Parser)]
#[command(name = "ragweave")]
#[command(about = "Ensemble-retrieval RAG over a document collection")]
#[command(version)]
struct Cli {
    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split documents and index them into the vector and keyword stores
    Ingest {
        /// Files to ingest
        file: Vec<PathBuf>,
        /// Drop and rebuild the collection instead of appending
        #[arg(long)]
        drop_old: bool,
    },
    /// Ingest documents and answer a question against them
    Ask {
        /// The question to answer
        query: String,
        /// Files to ingest before answering
        #[arg(short, long)]
        file: Vec<PathBuf>,
    },
    /// Ingest documents and show the selected context chunks without generation
    Search {
        /// The search query
        query: String,
        /// Files to ingest before searching
        #[arg(short, long)]
        file: Vec<PathBuf>,
        /// Print chunks as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write a default config.example.toml to the current directory
    InitConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::InitConfig = cli.command {
        let config = AppConfig::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| ragweave::RagweaveError::ConfigError(e.to_string()))?;
        std::fs::write("config.example.toml", content)?;
        println!("Wrote config.example.toml");
        return Ok(());
    }

    let config = AppConfig::load()?;
    if cli.verbose {
        ragweave::logging::init_logging_with_config(None)?;
    } else {
        ragweave::logging::init_logging_with_config(Some(&config))?;
    }

    let service = MemoryRagService::from_config(&config)?;

    match cli.command {
        Commands::Ingest { file, drop_old } => {
            // drop_old rebuilds once; subsequent files append
            let mut drop_old = drop_old;
            for path in &file {
                let content = std::fs::read_to_string(path)?;
                let source = source_name(path);
                let count = service.ingest_document(&source, &content, drop_old).await?;
                drop_old = false;
                println!("Ingested {count} chunks from {source}");
            }
        }
        Commands::Ask { query, file } => {
            ingest_files(&service, &file).await?;
            let answer = service.answer(&query).await?;
            println!("{answer}");
        }
        Commands::Search { query, file, json } => {
            ingest_files(&service, &file).await?;
            let chunks = service.search(&query).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&chunks)?);
            } else {
                for chunk in &chunks {
                    println!("--- {} (score {:.3})", chunk.key, chunk.score);
                    println!("{}", chunk.text);
                }
            }
        }
        Commands::InitConfig => unreachable!("handled above"),
    }

    Ok(())
}

fn source_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

async fn ingest_files(service: &MemoryRagService, files: &[PathBuf]) -> Result<()> {
    for path in files {
        let content = std::fs::read_to_string(path)?;
        let source = source_name(path);
        let count = service.ingest_document(&source, &content, false).await?;
        info!("Ingested {count} chunks from {source}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_ingest_subcommand() {
        let cli = Cli::try_parse_from(["ragweave", "ingest", "a.txt", "b.txt", "--drop-old"])
            .unwrap();
        match cli.command {
            Commands::Ingest { file, drop_old } => {
                assert_eq!(file.len(), 2);
                assert!(drop_old);
            }
            _ => panic!("expected ingest subcommand"),
        }
    }
}
