//! DeDust pool tracker binary.
//!
//! Watches a DeDust pool for trades and posts each new batch, with a
//! freshly settled price, to a Telegram channel.

mod format;
mod telegram;

use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use format::TradeFormatter;
use std::sync::Arc;
use std::time::Duration;
use telegram::TelegramNotifier;
use tontracker_data::DedustClient;
use tontracker_monitor::{MonitorConfig, TradeMonitor};
use tracing::info;

const BOT_TOKEN_ENV: &str = "TG_BOT_TOKEN";

#[derive(Parser)]
#[command(name = "tontracker")]
#[command(about = "DeDust pool price tracker and trade notifier", long_about = None)]
struct Args {
    /// Telegram bot token; falls back to the TG_BOT_TOKEN environment
    /// variable when omitted
    token: Option<String>,

    /// Monitored pool address
    #[arg(long, default_value = "EQClitEiuIqbEs7QX06Bo75E6nx9C6h4VYS1TDxh2dAYtKpQ")]
    pool: String,

    /// TON/jUSDT pool used to express prices in dollars
    #[arg(long, default_value = "EQCk6tGPlFoQ_1TgZJjuiulfSJz5aoJgnyy29eLsXtOmeYDw")]
    quote_pool: String,

    /// Jetton master address of the tracked token
    #[arg(long, default_value = "EQDf84FT8tdHZeI2-LXdb8gPMRqHRSABrmi8jI7MzvVpGJKZ")]
    token_address: String,

    /// Ticker shown in messages
    #[arg(long, default_value = "OPEN")]
    symbol: String,

    /// Decimals of the tracked token
    #[arg(long, default_value_t = 5)]
    decimals: u32,

    /// Telegram channel receiving the notifications
    #[arg(long, default_value_t = -1_002_056_517_262)]
    chat_id: i64,

    /// Seconds between polls (also used as the transient-failure backoff)
    #[arg(long, default_value_t = 10)]
    poll_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let token = args
        .token
        .clone()
        .or_else(|| std::env::var(BOT_TOKEN_ENV).ok())
        .with_context(|| {
            format!(
                "set the telegram bot token via the {BOT_TOKEN_ENV} environment variable \
                 or pass it as the first argument (argument takes priority)"
            )
        })?;

    let formatter = TradeFormatter {
        symbol: args.symbol.clone(),
        asset_address: args.token_address.clone(),
        decimals: args.decimals,
        explorer_base: "https://tonviewer.com/".to_string(),
    };
    let sink = Arc::new(TelegramNotifier::new(
        token,
        args.chat_id,
        formatter,
        format!("https://dedust.io/swap/TON/{}", args.symbol),
        format!("https://dyor.io/token/{}", args.token_address),
    ));
    let source = Arc::new(DedustClient::new().context("failed to build the DeDust client")?);

    let mut config = MonitorConfig::new(args.pool, args.quote_pool);
    config.token_decimals = Some(args.decimals);
    config.poll_interval = Duration::from_secs(args.poll_secs);
    config.fetch_backoff = config.poll_interval;

    let mut monitor = TradeMonitor::new(source, sink, config);
    let handle = monitor.handle();
    let worker = tokio::spawn(async move { monitor.run().await });

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for the shutdown signal")?;
    info!("shutdown requested");
    handle.stop();
    let _ = worker.await;
    Ok(())
}
