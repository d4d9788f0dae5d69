use anyhow::{anyhow, Result};
use clap::Parser;
use tracing::{info, Level};

use price_extremes::api::ChartClient;
use price_extremes::models::{Batch, Config};
use price_extremes::pipeline::Pipeline;
use price_extremes::store::TableStore;

/// Update price extremes for one third of the symbol universe
#[derive(Parser)]
#[command(name = "update_extremes_batch")]
struct Args {
    /// Which third of the symbol list to process: 1, 2, or 3
    batch: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    let args = Args::parse();
    let batch = Batch::from_arg(args.batch)
        .ok_or_else(|| anyhow!("batch must be 1, 2, or 3 (got {})", args.batch))?;

    info!("🚀 Starting price extremes update for batch {}", args.batch);

    // Load configuration
    let config = Config::from_env()?;

    let provider = ChartClient::new(&config)?;
    let store = TableStore::new(&config)?;

    let pipeline = Pipeline::new(provider, store);
    let summary = pipeline.run(Some(batch)).await?;

    info!(
        "✅ Done: {} records updated on {}",
        summary.updated.len(),
        summary.run_date
    );

    Ok(())
}
