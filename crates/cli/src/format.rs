//! MarkdownV2 rendering for trade notifications.

use std::fmt::Write as _;
use tontracker_domain::{AssetKind, Trade};
use tontracker_monitor::TradeUpdate;

pub const GREEN_DOT: char = '\u{1F7E2}';
pub const RED_DOT: char = '\u{1F534}';
pub const BAR_CHART: char = '\u{1F4CA}';
pub const UPTREND_CHART: char = '\u{1F4C8}';
pub const DOWNTREND_CHART: char = '\u{1F4C9}';
pub const MONEY_BAG: char = '\u{1F4B0}';

/// Decimals of the chain's native coin.
const TON_DECIMALS: i32 = 9;

/// Escapes every character MarkdownV2 reserves.
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(
            c,
            '_' | '*'
                | '['
                | ']'
                | '('
                | ')'
                | '~'
                | '`'
                | '>'
                | '#'
                | '+'
                | '-'
                | '='
                | '|'
                | '{'
                | '}'
                | '.'
                | '!'
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Shortens an address to its first and last four characters.
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 8 {
        return address.to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

/// Renders trade batches in the channel message format.
#[derive(Debug, Clone)]
pub struct TradeFormatter {
    /// Ticker of the tracked jetton.
    pub symbol: String,
    /// Jetton master address of the tracked token.
    pub asset_address: String,
    /// Decimals used to render jetton amounts.
    pub decimals: u32,
    /// Explorer base URL for sender links.
    pub explorer_base: String,
}

impl TradeFormatter {
    /// Renders the full message: one line per trade, a blank line, then
    /// the settled price line.
    pub fn render(&self, update: &TradeUpdate) -> String {
        let mut text = String::new();
        // USD value per TON at the settled price; the per-trade dollar
        // figures are marginal-rate approximations.
        let usd_per_ton = if update.quote > 0.0 {
            update.secondary_quote / update.quote
        } else {
            0.0
        };
        for trade in &update.trades {
            self.push_trade_line(&mut text, trade, usd_per_ton);
        }
        text.push('\n');
        self.push_price_line(&mut text, update);
        text
    }

    /// `🔴SELL 500 TOKEN for 5 TON ($2.50) [EQAA...FOO_](explorer)`
    fn push_trade_line(&self, text: &mut String, trade: &Trade, usd_per_ton: f64) {
        let is_buy = trade.asset_out.kind == AssetKind::Jetton
            && trade.asset_out.address == self.asset_address;
        let (marker, side) = if is_buy {
            (GREEN_DOT, "BUY")
        } else {
            (RED_DOT, "SELL")
        };
        let (ton_raw, jetton_raw) = if is_buy {
            (trade.amount_in, trade.amount_out)
        } else {
            (trade.amount_out, trade.amount_in)
        };
        let ton = ton_raw as f64 / 10f64.powi(TON_DECIMALS);
        let jetton = jetton_raw as f64 / 10f64.powi(self.decimals as i32);
        let usd = ton * usd_per_ton;
        let _ = writeln!(
            text,
            "{marker}{side} {jetton} {symbol} for {ton} TON \\(${usd}\\) [{sender}]({base}{address})",
            jetton = escape_markdown(&format!("{jetton:.2}")),
            symbol = self.symbol,
            ton = escape_markdown(&format!("{ton:.2}")),
            usd = escape_markdown(&format!("{usd:.2}")),
            sender = escape_markdown(&short_address(&trade.sender)),
            base = self.explorer_base,
            address = trade.sender,
        );
    }

    /// `📊Price: 0.000001 TON ($0.000002) 📈 +0.42%`
    fn push_price_line(&self, text: &mut String, update: &TradeUpdate) {
        let (arrow, sign) = if update.is_up() {
            (UPTREND_CHART, '+')
        } else {
            (DOWNTREND_CHART, '-')
        };
        let _ = write!(
            text,
            "{BAR_CHART}Price: {price} TON \\(${usd}\\) {arrow} \\{sign}{percent}%",
            price = escape_markdown(&format!("{:.6}", update.quote)),
            usd = escape_markdown(&format!("{:.6}", update.secondary_quote)),
            percent = escape_markdown(&format!("{:.2}", update.price_change.abs() * 100.0)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tontracker_domain::TradeAsset;

    const TOKEN: &str = "EQDf84FT8tdHZeI2-LXdb8gPMRqHRSABrmi8jI7MzvVpGJKZ";

    fn formatter() -> TradeFormatter {
        TradeFormatter {
            symbol: "OPEN".to_string(),
            asset_address: TOKEN.to_string(),
            decimals: 5,
            explorer_base: "https://tonviewer.com/".to_string(),
        }
    }

    fn buy_trade() -> Trade {
        Trade {
            sender: "EQAAsenderaddressxxxxxxxxxxxxxxxxxxxxxxxxxxxFOO_".to_string(),
            asset_in: TradeAsset {
                kind: AssetKind::Native,
                address: String::new(),
            },
            asset_out: TradeAsset {
                kind: AssetKind::Jetton,
                address: TOKEN.to_string(),
            },
            amount_in: 5_000_000_000,      // 5 TON
            amount_out: 50_000_000,        // 500 OPEN at 5 decimals
            lt: 100,
            created_at: Utc::now(),
        }
    }

    fn sell_trade() -> Trade {
        let buy = buy_trade();
        Trade {
            asset_in: buy.asset_out.clone(),
            asset_out: buy.asset_in.clone(),
            amount_in: buy.amount_out,
            amount_out: buy.amount_in,
            ..buy
        }
    }

    fn update(trades: Vec<Trade>) -> TradeUpdate {
        TradeUpdate {
            trades,
            quote: 0.5,
            secondary_quote: 1.25,
            price_change: 0.0042,
        }
    }

    #[test]
    fn escapes_every_reserved_character() {
        assert_eq!(escape_markdown("1.50"), "1\\.50");
        assert_eq!(escape_markdown("a_b*c"), "a\\_b\\*c");
        assert_eq!(escape_markdown("[x](y)"), "\\[x\\]\\(y\\)");
        assert_eq!(escape_markdown("plain"), "plain");
    }

    #[test]
    fn shortens_long_addresses_only() {
        assert_eq!(
            short_address("EQAAsenderaddressxxxFOO_"),
            "EQAA...FOO_"
        );
        assert_eq!(short_address("short"), "short");
    }

    #[test]
    fn classifies_buy_and_sell_sides() {
        let f = formatter();
        let rendered = f.render(&update(vec![buy_trade(), sell_trade()]));
        let lines: Vec<&str> = rendered.lines().collect();
        assert!(lines[0].contains("BUY"));
        assert!(lines[0].starts_with(GREEN_DOT));
        assert!(lines[1].contains("SELL"));
        assert!(lines[1].starts_with(RED_DOT));
    }

    #[test]
    fn renders_amounts_in_human_units() {
        let f = formatter();
        let rendered = f.render(&update(vec![buy_trade()]));
        // 500 OPEN for 5 TON, at 2.5 USD per TON -> $12.50
        assert!(rendered.contains("500\\.00 OPEN"));
        assert!(rendered.contains("5\\.00 TON"));
        assert!(rendered.contains("\\($12\\.50\\)"));
        assert!(rendered.contains("https://tonviewer.com/EQAAsender"));
    }

    #[test]
    fn price_line_reports_signed_percent_change() {
        let f = formatter();
        let up = f.render(&update(vec![buy_trade()]));
        assert!(up.contains(&format!("{UPTREND_CHART} \\+0\\.42%")));

        let mut down = update(vec![buy_trade()]);
        down.price_change = -0.013;
        let rendered = f.render(&down);
        assert!(rendered.contains(&format!("{DOWNTREND_CHART} \\-1\\.30%")));
    }

    #[test]
    fn price_line_reports_settled_quotes() {
        let f = formatter();
        let rendered = f.render(&update(vec![buy_trade()]));
        assert!(rendered.contains("Price: 0\\.500000 TON \\($1\\.250000\\)"));
    }
}
