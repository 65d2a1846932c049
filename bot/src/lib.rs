// Bot library root
// Chat command routing on top of the chart engine's HTTP API.

pub mod commands;
pub mod config;
pub mod error;
pub mod services;

#[cfg(test)]
mod test_support;
