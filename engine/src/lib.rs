// Engine library root
// Candle retrieval, indicator math and chart rendering behind an HTTP API.

pub mod chart;
pub mod config;
pub mod data;
pub mod error;
pub mod indicators;
pub mod services;

#[cfg(test)]
mod test_support;
