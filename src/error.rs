//! Crate error type.
//!
//! Hooks never surface these to pages: a failed projection is logged and the
//! previous state is kept. Everything around the hooks (config, file feed,
//! layout, terminal I/O) propagates them with `?`.

use thiserror::Error;

/// Errors raised by the application shell and by snapshot projection.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("layout error: {0}")]
    Layout(#[from] taffy::TaffyError),

    #[error("invalid route: {0}")]
    InvalidRoute(String),

    #[error("invalid store path: {0}")]
    InvalidPath(String),

    /// A snapshot arrived but could not be shaped into the entity.
    #[error("cannot decode snapshot at '{path}': {message}")]
    Decode { path: String, message: String },
}

impl Error {
    pub(crate) fn decode(path: &str, message: impl std::fmt::Display) -> Self {
        Error::Decode {
            path: path.to_string(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
