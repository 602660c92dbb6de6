mod api;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use clashdash_lib::cache::MemoryCache;
use clashdash_lib::roster::RosterClient;
use clashdash_lib::session::ApiSession;
use clashdash_lib::Aggregator;

#[derive(Parser)]
#[command(name = "clashdash")]
#[command(about = "Aggregation backend for the clan community site")]
struct Cli {
    /// Port to bind the HTTP server to (falls back to PORT, then 8080)
    #[arg(long)]
    port: Option<u16>,

    /// Published-CSV URL of the roster sheet (falls back to ROSTER_URL)
    #[arg(long)]
    roster_url: Option<String>,

    /// Result cache TTL in seconds (falls back to CACHE_TTL_SECS, then 600)
    #[arg(long)]
    cache_ttl_secs: Option<u64>,

    /// Override the game API base URL (falls back to COC_API_BASE_URL)
    #[arg(long)]
    api_base_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("clashdash=info".parse().unwrap()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let port = cli
        .port
        .or_else(|| std::env::var("PORT").ok().and_then(|v| v.parse().ok()))
        .unwrap_or(8080);
    let roster_url = cli
        .roster_url
        .or_else(|| std::env::var("ROSTER_URL").ok())
        .context("ROSTER_URL is not set")?;
    let cache_ttl = cli
        .cache_ttl_secs
        .or_else(|| {
            std::env::var("CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
        })
        .unwrap_or(600);
    let api_base_url = cli
        .api_base_url
        .or_else(|| std::env::var("COC_API_BASE_URL").ok());

    // Token absence is reported per request, not at startup; see ApiSession.
    let token = std::env::var("COC_API_TOKEN").ok();
    let session = match api_base_url {
        Some(base) => ApiSession::with_base_url(token, &base),
        None => ApiSession::new(token),
    };

    let aggregator = Arc::new(Aggregator::new(
        session,
        RosterClient::new(&roster_url),
        MemoryCache::new(Duration::from_secs(cache_ttl)),
    ));

    let app = api::router(aggregator);
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
