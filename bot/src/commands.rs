// Chat command routing: text in, reply out. No indicator math happens here;
// price and chart requests are delegated to an engine backend.
use std::future::Future;

use shared::models::PriceQuote;
use shared::symbol::Symbol;
use shared::utils::format_price;

use crate::error::ClientError;

/// Charts requested from chat always cover the last 100 hourly candles.
pub const CHART_INTERVAL: &str = "1h";
pub const CHART_LIMIT: u32 = 100;

pub const USAGE: &str = "Usage:\n\
/price <pair>  current price, e.g. /price BTC-USDT\n\
/chart <pair>  1h chart with EMA 20/50, RSI and volume, e.g. /chart XRP/EUR";

const WELCOME: &str = "Hi! I fetch market prices and draw charts.";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Start,
    Price(String),
    Chart(String),
    Help,
}

impl Command {
    /// First token is the command word, the next one its symbol argument.
    /// Anything unrecognized, or a command without its argument, is `Help`.
    pub fn parse(text: &str) -> Command {
        let mut tokens = text.split_whitespace();
        let Some(word) = tokens.next() else {
            return Command::Help;
        };
        // "/chart@SomeBot" is how group chats address a specific bot.
        let word = word.split('@').next().unwrap_or_default().to_lowercase();
        let argument = tokens.next().map(str::to_string);

        match (word.as_str(), argument) {
            ("/start", _) => Command::Start,
            ("/price", Some(pair)) => Command::Price(pair),
            ("/chart", Some(pair)) => Command::Chart(pair),
            _ => Command::Help,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Text(String),
    Photo { png: Vec<u8>, caption: String },
}

/// What the router needs from the chart engine.
pub trait EngineBackend: Send + Sync + 'static {
    fn price(&self, symbol: &Symbol) -> impl Future<Output = Result<PriceQuote, ClientError>> + Send;

    fn chart(
        &self,
        symbol: &Symbol,
        interval: &str,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<u8>, ClientError>> + Send;
}

pub struct CommandRouter<B> {
    backend: B,
}

impl<B: EngineBackend> CommandRouter<B> {
    pub fn new(backend: B) -> Self {
        CommandRouter { backend }
    }

    /// Always produces something to send back; backend failures become text.
    pub async fn handle(&self, text: &str) -> Reply {
        let command = Command::parse(text);
        tracing::debug!(?command, "Parsed chat command");
        match command {
            Command::Start => Reply::Text(format!("{}\n\n{}", WELCOME, USAGE)),
            Command::Help => Reply::Text(USAGE.to_string()),
            Command::Price(raw) => self.price(Symbol::parse(&raw)).await,
            Command::Chart(raw) => self.chart(Symbol::parse(&raw)).await,
        }
    }

    async fn price(&self, symbol: Symbol) -> Reply {
        if symbol.is_empty() {
            return Reply::Text(USAGE.to_string());
        }
        match self.backend.price(&symbol).await {
            Ok(quote) => Reply::Text(format!("{}: {}", symbol.display(), format_price(quote.price))),
            Err(e) => {
                tracing::warn!(symbol = %symbol.canonical(), error = %e, "Price lookup failed");
                Reply::Text(format!("Could not get the price of {}: {}", symbol.display(), e))
            }
        }
    }

    async fn chart(&self, symbol: Symbol) -> Reply {
        if symbol.is_empty() {
            return Reply::Text(USAGE.to_string());
        }
        match self.backend.chart(&symbol, CHART_INTERVAL, CHART_LIMIT).await {
            Ok(png) => Reply::Photo {
                png,
                caption: format!("{} ({})", symbol.display(), CHART_INTERVAL),
            },
            Err(e) => {
                tracing::warn!(symbol = %symbol.canonical(), error = %e, "Chart request failed");
                Reply::Text(format!("Could not draw a chart for {}: {}", symbol.display(), e))
            }
        }
    }
}
