use anyhow::Result;
use tracing::{info, Level};

use price_extremes::api::ChartClient;
use price_extremes::models::Config;
use price_extremes::pipeline::Pipeline;
use price_extremes::store::TableStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    info!("🚀 Starting price extremes update for the full symbol universe");

    // Load configuration
    let config = Config::from_env()?;

    let provider = ChartClient::new(&config)?;
    let store = TableStore::new(&config)?;

    let pipeline = Pipeline::new(provider, store);
    let summary = pipeline.run(None).await?;

    info!(
        "✅ Done: {} records updated on {}",
        summary.updated.len(),
        summary.run_date
    );

    Ok(())
}
