use anyhow::Context;
use clap::{Parser, Subcommand};
use propper::calculator::FlipCalculator;
use propper::config::Config;
use propper::pipeline::{preview_upload, process_upload};
use propper::server::{start_server, AppState};
use propper::{logging, metrics};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "propper")]
#[command(about = "Property listing deduplication and flip calculator")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Port to listen on (overrides config)
        #[arg(long)]
        port: Option<u16>,
        /// Address to bind (overrides config)
        #[arg(long)]
        host: Option<String>,
    },
    /// Process a local CSV/Excel export and print the JSON result
    Process {
        /// Path to a .csv, .xlsx or .xls file
        file: PathBuf,
        /// Only parse and print the upload preview
        #[arg(long)]
        preview: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config = Config::load()?;
    logging::init_logging(&config.logging);

    let calculator = FlipCalculator::new(config.calculator.clone())?;

    match cli.command {
        Commands::Serve { port, host } => {
            metrics::init_metrics();

            let state = Arc::new(AppState {
                calculator: Arc::new(calculator),
                preview_limit: config.server.preview_limit,
                max_upload_bytes: config.server.max_upload_bytes,
            });
            let host = host.unwrap_or(config.server.host);
            let port = port.unwrap_or(config.server.port);

            info!("Starting server on {}:{}", host, port);
            if let Err(e) = start_server(state, &host, port).await {
                error!("Server failed: {}", e);
                return Err(e);
            }
        }
        Commands::Process { file, preview } => {
            let bytes = std::fs::read(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let filename = file
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();

            let output = if preview {
                serde_json::to_string_pretty(&preview_upload(
                    &bytes,
                    &filename,
                    config.server.preview_limit,
                )?)?
            } else {
                serde_json::to_string_pretty(&process_upload(&bytes, &filename, &calculator)?)?
            };
            println!("{output}");
        }
    }

    Ok(())
}
