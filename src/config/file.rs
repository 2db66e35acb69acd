//! TOML configuration file loading
//!
//! Supports `~/.config/kirti/config.toml` as a persistent config source.
//! All fields are optional — the file is a partial overlay on top of
//! defaults, and environment variables override both.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::Result;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct KirtiConfigFile {
    /// Server/runtime configuration
    #[serde(default)]
    pub server: ServerFileConfig,

    /// Voice/audio configuration
    #[serde(default)]
    pub voice: VoiceFileConfig,

    /// Assistant configuration
    #[serde(default)]
    pub assistant: AssistantFileConfig,

    /// Attendance configuration
    #[serde(default)]
    pub attendance: AttendanceFileConfig,

    /// API keys for external services
    #[serde(default)]
    pub api_keys: ApiKeysFileConfig,
}

/// Server/runtime configuration
#[derive(Debug, Default, Deserialize)]
pub struct ServerFileConfig {
    /// API server port
    pub port: Option<u16>,

    /// Path to static files directory (kiosk web UI)
    pub static_dir: Option<PathBuf>,

    /// UI listener endpoint for spoken-text notifications
    pub notify_url: Option<String>,
}

/// Voice processing configuration
#[derive(Debug, Default, Deserialize)]
pub struct VoiceFileConfig {
    /// Enable the voice assistant loop
    pub enabled: Option<bool>,

    /// STT provider ("google" or "whisper")
    pub stt_provider: Option<String>,

    /// Whisper model (e.g. "whisper-1")
    pub stt_model: Option<String>,

    /// Recognition/synthesis language code (e.g. "en-IN")
    pub language: Option<String>,

    /// TTS provider ("google" or "openai")
    pub tts_provider: Option<String>,

    /// TTS voice identifier (e.g. "en-IN-Wavenet-B")
    pub tts_voice: Option<String>,

    /// TTS speed multiplier
    pub tts_speed: Option<f32>,
}

/// Assistant configuration
#[derive(Debug, Default, Deserialize)]
pub struct AssistantFileConfig {
    /// Path to the Q&A table JSON file
    pub qa_file: Option<PathBuf>,

    /// Gemini model for the generative fallback
    pub model: Option<String>,
}

/// Attendance configuration
#[derive(Debug, Default, Deserialize)]
pub struct AttendanceFileConfig {
    /// Directory of labeled reference face images
    pub images_dir: Option<PathBuf>,

    /// Minimum face similarity confidence (0-100)
    pub similarity_threshold: Option<f32>,
}

/// API keys configuration
#[derive(Debug, Default, Deserialize)]
pub struct ApiKeysFileConfig {
    pub google: Option<String>,
    pub gemini: Option<String>,
    pub openai: Option<String>,
    pub facepp_key: Option<String>,
    pub facepp_secret: Option<String>,
}

impl KirtiConfigFile {
    /// Load the config file if it exists; a missing file is the default
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let parsed = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "config file loaded");
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = KirtiConfigFile::load(dir.path().join("config.toml")).unwrap();
        assert!(config.server.port.is_none());
        assert!(config.voice.enabled.is_none());
    }

    #[test]
    fn test_partial_overlay_parses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
            [server]
            port = 8080

            [voice]
            enabled = true
            tts_voice = "en-IN-Wavenet-B"

            [attendance]
            similarity_threshold = 90.0
            "#,
        )
        .unwrap();

        let config = KirtiConfigFile::load(&path).unwrap();
        assert_eq!(config.server.port, Some(8080));
        assert_eq!(config.voice.enabled, Some(true));
        assert_eq!(config.voice.tts_voice.as_deref(), Some("en-IN-Wavenet-B"));
        assert_eq!(config.attendance.similarity_threshold, Some(90.0));
        // Untouched sections stay default
        assert!(config.api_keys.google.is_none());
    }
}
