// Engine configuration, built once at startup and passed down explicitly.
pub mod settings;

pub use settings::{ChartSettings, EngineSettings, RequestDefaults, UpstreamSettings};
