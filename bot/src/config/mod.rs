// Bot configuration: where it listens and which engine it talks to
use anyhow::Context;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BotSettings {
    pub host: String,
    pub port: u16,
    pub engine_url: String,
    /// Covers a full chart round trip, upstream fetch and render included.
    pub timeout_secs: u64,
}

impl Default for BotSettings {
    fn default() -> Self {
        BotSettings {
            host: "0.0.0.0".to_string(),
            port: 8081,
            engine_url: "http://localhost:8080".to_string(),
            timeout_secs: 30,
        }
    }
}

impl BotSettings {
    /// Reads the JSON file named by `BOT_CONFIG` (defaults when unset), then
    /// applies the `PORT` and `ENGINE_URL` overrides.
    pub fn load() -> Result<Self, anyhow::Error> {
        let mut settings = match std::env::var("BOT_CONFIG") {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };
        settings.apply_overrides(std::env::var("PORT").ok(), std::env::var("ENGINE_URL").ok())?;
        Ok(settings)
    }

    pub fn from_file(path: &str) -> Result<Self, anyhow::Error> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read bot config '{}'", path))?;
        serde_json::from_str(&raw).with_context(|| format!("Invalid bot config '{}'", path))
    }

    fn apply_overrides(&mut self, port: Option<String>, engine_url: Option<String>) -> Result<(), anyhow::Error> {
        if let Some(port) = port {
            self.port = port
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a number, got '{}'", port))?;
        }
        if let Some(url) = engine_url.filter(|u| !u.trim().is_empty()) {
            self.engine_url = url.trim().to_string();
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
