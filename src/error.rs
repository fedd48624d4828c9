//! Error types for autofocus-rs.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The camera reported a fault while focusing or cancelling.
    #[error("camera error: {0}")]
    Camera(String),

    #[error("no tokio runtime available to schedule autofocus")]
    NoRuntime,

    #[error("config error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
