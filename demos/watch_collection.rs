use std::sync::Arc;

use listing_watch_sdk::kv::FileKvStore;
use listing_watch_sdk::{FilterConfig, ListingWatcher};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Alert history persists under ./watch-state, so restarts never
    // re-raise listings that already alerted.
    let kv = Arc::new(FileKvStore::new("./watch-state"));
    let watcher = ListingWatcher::with_defaults(kv).await?;

    // Optional CLI override: watch_collection [trait_name trait_value threshold]
    let args: Vec<String> = std::env::args().collect();
    if args.len() == 4 {
        watcher
            .set_filter(FilterConfig::new(&args[1], &args[2], &args[3]))
            .await;
    }

    watcher.start().await;
    println!("Watching... press Ctrl+C to stop.");

    tokio::signal::ctrl_c().await?;
    watcher.stop().await;

    let metrics = watcher.metrics().await;
    println!(
        "Session summary: {} cycles ({} failed), {} alerts raised",
        metrics.cycles_total, metrics.cycles_failed, metrics.alerts_raised
    );
    for alert in watcher.alerts().await.iter().take(10) {
        println!(
            "  #{} at {} ({})",
            alert.token_id.as_deref().unwrap_or("?"),
            alert.price,
            alert.time.format("%Y-%m-%d %H:%M:%S")
        );
    }

    Ok(())
}
