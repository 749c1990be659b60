//! Error types for the trip concierge

use thiserror::Error;

/// Result type alias for concierge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the trip concierge
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Audio device or codec error
    #[error("audio error: {0}")]
    Audio(String),

    /// Speech-to-text error
    #[error("STT error: {0}")]
    Stt(String),

    /// Text-to-speech error
    #[error("TTS error: {0}")]
    Tts(String),

    /// Language model completion error
    #[error("completion error: {0}")]
    Completion(String),

    /// Image search error
    #[error("image search error: {0}")]
    ImageSearch(String),

    /// Extraction response could not be turned into a trip
    #[error("parse error: {0}")]
    Parse(#[from] crate::trip::ParseFailure),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("toml write error: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    /// Malformed URL
    #[error("url error: {0}")]
    Url(#[from] url::ParseError),
}
