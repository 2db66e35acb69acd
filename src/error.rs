//! Error types for Kirti gateway

use thiserror::Error;

/// Result type alias for Kirti operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in Kirti gateway
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Audio device error
    #[error("audio error: {0}")]
    Audio(String),

    /// Speech-to-text error
    #[error("STT error: {0}")]
    Stt(String),

    /// Text-to-speech error
    #[error("TTS error: {0}")]
    Tts(String),

    /// Answer source error (lookup table or generative fallback)
    #[error("answer error: {0}")]
    Answer(String),

    /// Face comparison error
    #[error("face error: {0}")]
    Face(String),

    /// Attendance bookkeeping error (invalid event)
    #[error("attendance error: {0}")]
    Attendance(String),

    /// Durable store read/write failure
    #[error("storage error: {0}")]
    Storage(String),

    /// Resource not found
    #[error("not found: {0}")]
    NotFound(String),

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

    /// `SQLite` error
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}
