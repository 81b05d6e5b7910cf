use anyhow::Context;
use clap::Parser;
use reelsync::{Config, SyncDriver, SyncOptions};
use reelsync_metadata::TmdbClient;
use reelsync_notion::{NotionClient, PropertySchema, TitleFilter};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Fill pending Notion pages with TMDB metadata.
#[derive(Debug, Parser)]
#[command(name = "reelsync", version, about)]
struct Args {
    /// Sync the page whose title equals this value instead of every pending page.
    #[arg(long)]
    title: Option<String>,

    /// Search, fetch and normalize, but do not write to Notion.
    #[arg(long)]
    dry_run: bool,

    /// Skip the TMDB API key check at startup.
    #[arg(long)]
    skip_auth_check: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env first so RUST_LOG can come from it
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    let config = Config::from_env().context("failed to load configuration")?;
    let languages = config
        .language_table()
        .context("failed to load language table")?;
    info!(languages = languages.len(), "language table loaded");

    let tmdb = TmdbClient::new(config.tmdb_api_key.clone());
    if !args.skip_auth_check {
        tmdb.authenticate()
            .await
            .context("TMDB API key check failed")?;
    }

    let notion = NotionClient::new(
        config.notion_api_key.clone(),
        config.database_id.clone(),
        PropertySchema::new(config.title_property.clone()),
    );

    let filter = args
        .title
        .map(TitleFilter::Equals)
        .unwrap_or_else(TitleFilter::pending);

    let driver = SyncDriver::new(
        &tmdb,
        &notion,
        &languages,
        SyncOptions {
            dry_run: args.dry_run,
        },
    );
    let report = driver.run(&filter).await.context("sync failed")?;

    info!(
        updated = report.updated,
        dry_run = report.dry_run,
        skipped = report.skipped,
        failed = report.failed,
        "sync complete"
    );
    Ok(())
}
