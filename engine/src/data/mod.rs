// Market data access: the upstream candle source and its wire format.
pub mod binance_client;
pub mod klines;

pub use binance_client::MarketDataClient;
