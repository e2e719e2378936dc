//! PDF chat server binary
//!
//! Run with: cargo run -p pdf-chat --bin pdf-chat-server

use clap::Parser;
use pdf_chat::{config::ChatConfig, server::ChatServer};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "pdf-chat-server", version, about = "Chat with an uploaded PDF")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the bind host
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdf_chat=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = ChatConfig::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    tracing::info!("Configuration loaded");
    tracing::info!("  - Model: {}", config.llm.model);
    tracing::info!("  - API base: {}", config.llm.base_url);
    tracing::info!("  - Upload dir: {}", config.server.upload_dir.display());
    tracing::info!("  - Max upload: {} bytes", config.server.max_upload_size);

    let server = ChatServer::new(config)?;

    println!("\nServer starting...");
    println!("  UI: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  POST /upload - Upload a PDF (multipart field \"file\")");
    println!("  POST /chat   - Ask a question {{message, filename}}");
    println!("  GET  /files  - List uploaded PDFs");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
