use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// The engine could not be reached or its answer could not be read.
    #[error("Chart engine unavailable: {0}")]
    Request(#[from] reqwest::Error),

    /// The engine answered with an error body.
    #[error("{message}")]
    Engine { status: u16, message: String },

    #[error("Configuration error: {0}")]
    Config(String),
}
