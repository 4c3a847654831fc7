use std::sync::Arc;

use anyhow::Context as _;
use board_client::Client;
use feed::{FeedView, Intent, ManualViewport};
use tokio::{io::BufReader, sync::mpsc};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod terminal;

fn main() -> anyhow::Result<()> {
    let runtime = tokio::runtime::Runtime::new()
        .context("failed to start tokio runtime")?;
    let result = runtime.block_on(run());
    // a stdin read may still be parked on the blocking pool
    runtime.shutdown_background();
    result
}

async fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path = std::env::var("BAMBOO_CONFIG")
        .unwrap_or_else(|_| "Config.toml".to_string());
    let config = util::load_config(&config_path)?;

    let client = Client::from_config(&config)
        .context("failed to build board client")?;
    let feed_config =
        feed::init_config(&config).context("failed to load feed config")?;
    info!(
        task = "start bamboo",
        base_url = client.base_url(),
        page_size = feed_config.page_size
    );

    let viewport = ManualViewport::default();
    let view = FeedView::mount(&feed_config, viewport.clone());

    let (tx, rx) = mpsc::channel(32);
    tx.send(Intent::AttachSentinel(terminal::SENTINEL)).await?;
    let stdin = BufReader::new(tokio::io::stdin());
    let reader = tokio::spawn(terminal::read_commands(stdin, viewport, tx));

    let mut renderer = terminal::Terminal;
    feed::run(view, Arc::new(client), rx, &mut renderer).await;

    reader.abort();
    Ok(())
}
