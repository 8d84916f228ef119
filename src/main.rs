use anyhow::Result;
use clap::Parser;
use dialbridge::{create_router, AppState, Config};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dialbridge", about = "Telephony audio bridge service")]
struct Cli {
    /// Override the configured bind address
    #[arg(long)]
    bind: Option<String>,

    /// Override the configured port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("dialbridge=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    let mut cfg = Config::load()?;
    if let Some(bind) = cli.bind {
        cfg.http_bind = bind;
    }
    if let Some(port) = cli.port {
        cfg.http_port = port;
    }

    info!("dialbridge v{}", env!("CARGO_PKG_VERSION"));
    info!("transcripts: {}", cfg.transcription_dir);
    info!(
        "call timeout: {}s, transcription credentials {}",
        cfg.call_timeout_secs,
        if cfg.elevenlabs_api_key.is_some() {
            "present"
        } else {
            "absent (degraded mode)"
        }
    );

    let addr = format!("{}:{}", cfg.http_bind, cfg.http_port);
    let app = create_router(AppState::new(cfg));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
