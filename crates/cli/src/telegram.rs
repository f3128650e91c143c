//! Telegram delivery for trade notifications.

use crate::format::{BAR_CHART, MONEY_BAG, TradeFormatter};
use anyhow::{Context, bail};
use async_trait::async_trait;
use serde_json::json;
use tontracker_monitor::{NotificationSink, TradeUpdate};
use tracing::debug;

const BOT_API_BASE: &str = "https://api.telegram.org";

/// Posts rendered updates to a Telegram channel via the Bot API.
pub struct TelegramNotifier {
    http: reqwest::Client,
    token: String,
    chat_id: i64,
    formatter: TradeFormatter,
    reply_markup: serde_json::Value,
}

impl TelegramNotifier {
    pub fn new(
        token: impl Into<String>,
        chat_id: i64,
        formatter: TradeFormatter,
        buy_url: impl Into<String>,
        chart_url: impl Into<String>,
    ) -> Self {
        let reply_markup = json!({
            "inline_keyboard": [[
                { "text": format!("{MONEY_BAG}Buy on DeDust"), "url": buy_url.into() },
                { "text": format!("{BAR_CHART}Chart"), "url": chart_url.into() },
            ]]
        });
        Self {
            http: reqwest::Client::new(),
            token: token.into(),
            chat_id,
            formatter,
            reply_markup,
        }
    }
}

#[async_trait]
impl NotificationSink for TelegramNotifier {
    async fn publish(&self, update: &TradeUpdate) -> anyhow::Result<()> {
        let text = self.formatter.render(update);
        let url = format!("{}/bot{}/sendMessage", BOT_API_BASE, self.token);
        let body = json!({
            "chat_id": self.chat_id,
            "text": text,
            "parse_mode": "MarkdownV2",
            "disable_web_page_preview": true,
            "reply_markup": self.reply_markup,
        });
        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("telegram request failed")?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("telegram returned {status}: {body}");
        }
        debug!(chat_id = self.chat_id, "notification delivered");
        Ok(())
    }
}
