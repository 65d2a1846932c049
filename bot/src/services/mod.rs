pub mod engine_client;
pub mod webhook;

pub use engine_client::EngineClient;
