// Engine settings, loaded from an optional JSON file plus environment overrides
use anyhow::Context;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EngineSettings {
    pub host: String,
    pub port: u16,
    pub upstream: UpstreamSettings,
    pub defaults: RequestDefaults,
    pub chart: ChartSettings,
}

/// Where candles and prices come from.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct UpstreamSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

/// Values used when a chart request leaves a parameter out.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RequestDefaults {
    pub symbol: String,
    pub interval: String,
    pub limit: u32,
    pub max_limit: u32,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ChartSettings {
    pub width: u32,
    pub height: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            host: "0.0.0.0".to_string(),
            port: 8080,
            upstream: UpstreamSettings::default(),
            defaults: RequestDefaults::default(),
            chart: ChartSettings::default(),
        }
    }
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        UpstreamSettings {
            base_url: "https://api.binance.com".to_string(),
            timeout_secs: 8,
        }
    }
}

impl Default for RequestDefaults {
    fn default() -> Self {
        RequestDefaults {
            symbol: "BTCUSDT".to_string(),
            interval: "1h".to_string(),
            limit: 100,
            max_limit: 1000, // Binance klines maximum
        }
    }
}

impl Default for ChartSettings {
    fn default() -> Self {
        ChartSettings { width: 1200, height: 900 }
    }
}

impl UpstreamSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl EngineSettings {
    /// Reads the JSON file named by `ENGINE_CONFIG` (defaults when unset), then
    /// applies the `PORT` and `BINANCE_BASE_URL` overrides.
    pub fn load() -> Result<Self, anyhow::Error> {
        let mut settings = match std::env::var("ENGINE_CONFIG") {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };
        settings.apply_overrides(std::env::var("PORT").ok(), std::env::var("BINANCE_BASE_URL").ok())?;
        Ok(settings)
    }

    pub fn from_file(path: &str) -> Result<Self, anyhow::Error> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read engine config '{}'", path))?;
        let settings: EngineSettings = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid engine config '{}'", path))?;
        Ok(settings)
    }

    fn apply_overrides(&mut self, port: Option<String>, base_url: Option<String>) -> Result<(), anyhow::Error> {
        if let Some(port) = port {
            self.port = port
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a number, got '{}'", port))?;
        }
        if let Some(base_url) = base_url.filter(|u| !u.trim().is_empty()) {
            self.upstream.base_url = base_url.trim().to_string();
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let settings = EngineSettings::default();
        assert_eq!(settings.bind_addr(), "0.0.0.0:8080");
        assert_eq!(settings.upstream.timeout(), Duration::from_secs(8));
        assert_eq!(settings.defaults.symbol, "BTCUSDT");
        assert_eq!(settings.defaults.interval, "1h");
        assert_eq!(settings.defaults.limit, 100);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{ "port": 9000, "upstream": {{ "timeout_secs": 3 }}, "chart": {{ "width": 800 }} }}"#).unwrap();
        file.flush().unwrap();

        let settings = EngineSettings::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(settings.port, 9000);
        assert_eq!(settings.upstream.timeout_secs, 3);
        assert_eq!(settings.upstream.base_url, "https://api.binance.com");
        assert_eq!(settings.chart.width, 800);
        assert_eq!(settings.chart.height, 900);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not json").unwrap();
        assert!(EngineSettings::from_file(file.path().to_str().unwrap()).is_err());
        assert!(EngineSettings::from_file("/definitely/missing/engine.json").is_err());
    }

    #[test]
    fn test_overrides() {
        let mut settings = EngineSettings::default();
        settings
            .apply_overrides(Some("3000".to_string()), Some("http://127.0.0.1:9999".to_string()))
            .unwrap();
        assert_eq!(settings.port, 3000);
        assert_eq!(settings.upstream.base_url, "http://127.0.0.1:9999");

        assert!(settings.apply_overrides(Some("abc".to_string()), None).is_err());
    }
}
