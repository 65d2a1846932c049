pub mod models;
pub mod symbol;
pub mod utils;

// Models and helpers shared by the engine and the chat bot.
pub use models::{Candle, CandleSeries, IndicatorSeries, PriceQuote, TimeFrame};
pub use symbol::{normalize, Symbol};
