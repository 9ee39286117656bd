use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use askpdf::client::{run_terminal, AskPdfClient};
use askpdf::config::Config;
use askpdf::provider::{ChatPdfClient, DocumentQaProvider};
use askpdf::storage::{DocumentStore, LocalStorage};
use askpdf::{create_router, AppState};

#[derive(Parser)]
#[command(name = "askpdf")]
#[command(about = "Upload a PDF and ask questions about it")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Upload a PDF to a running server and ask questions from the terminal
    Ask {
        /// PDF to upload
        file: PathBuf,
        /// Base URL of the askpdf server
        #[arg(long, default_value = "http://localhost:5000")]
        server: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "askpdf=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve().await,
        Command::Ask { file, server } => {
            let client = AskPdfClient::new(&server)?;
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let session = run_terminal(&client, &file, stdin, tokio::io::stdout()).await?;
            tracing::debug!(turns = session.transcript.len(), "Session finished");
            Ok(())
        }
    }
}

async fn serve() -> anyhow::Result<()> {
    let config = Config::from_env();
    config.validate()?;

    let storage = LocalStorage::from_config(&config.storage);
    tracing::info!("Storing uploads in {}", storage.root().display());
    let store: Arc<dyn DocumentStore> = Arc::new(storage);

    tracing::info!("Using document QA provider at {}", config.provider.base_url);
    let provider: Arc<dyn DocumentQaProvider> = Arc::new(ChatPdfClient::new(&config.provider)?);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = create_router(AppState::new(config, store, provider));

    tracing::info!("AskPDF starting on http://{}", addr);
    tracing::info!("  Health check: http://{}/health", addr);
    tracing::info!("  API docs:     http://{}/docs", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, stopping server...");
}
