//! Campus content server

use campus_content::MemoryStore;
use campus_server::{serve, ApiState, Config};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "campus-server")]
#[command(about = "Content API for the campus site", long_about = None)]
struct Cli {
    /// Config file (defaults to campus.config.json in the working directory)
    #[arg(short, long, env = "CAMPUS_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(short, long, env = "CAMPUS_BIND")]
    bind: Option<String>,

    /// Bearer token required by write endpoints
    #[arg(long, env = "CAMPUS_EDITOR_TOKEN", hide_env_values = true)]
    editor_token: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("campus=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_file(path)?,
        None => Config::load(&std::env::current_dir()?)?,
    };
    if let Some(bind) = cli.bind {
        config.bind = bind;
    }
    if let Some(token) = cli.editor_token {
        config.editor_token = Some(token);
    }

    if config.editor_token.is_none() {
        warn!("no editor token configured, write endpoints will reject every request");
    }
    info!(geocoder = %config.geocoder.base_url, "starting campus server");

    let store = Arc::new(MemoryStore::new());
    let state = Arc::new(ApiState::new(store.clone(), store, &config)?);
    serve(state, &config.bind).await
}
