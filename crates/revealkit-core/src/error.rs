use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Page layout error: {0}")]
    Layout(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid scroll anchor: {0}")]
    InvalidAnchor(String),

    #[error("Invalid timeline position: {0}")]
    InvalidPosition(String),

    #[error("Unknown easing: {0}")]
    InvalidEasing(String),
}

pub type Result<T> = std::result::Result<T, Error>;
