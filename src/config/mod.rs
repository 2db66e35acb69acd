//! Configuration management for Kirti gateway

pub mod file;

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::{Error, Result};
use file::KirtiConfigFile;

/// Default API server port
const DEFAULT_PORT: u16 = 5005;

/// Default minimum face similarity confidence
const DEFAULT_SIMILARITY_THRESHOLD: f32 = 85.0;

/// Kirti gateway configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the data directory (database, images, Q&A table)
    pub data_dir: PathBuf,

    /// HTTP API server configuration
    pub server: ServerConfig,

    /// Voice configuration
    pub voice: VoiceConfig,

    /// Assistant configuration
    pub assistant: AssistantConfig,

    /// Attendance configuration
    pub attendance: AttendanceConfig,

    /// API keys
    pub api_keys: ApiKeys,
}

/// HTTP API server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,

    /// Path to static files directory (kiosk web UI)
    pub static_dir: Option<PathBuf>,

    /// UI listener endpoint for spoken-text notifications.
    /// Defaults to this gateway's own `/api/speak` endpoint.
    pub notify_url: Option<String>,
}

/// Voice processing configuration
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// Enable the voice assistant loop
    pub enabled: bool,

    /// STT provider ("google" or "whisper")
    pub stt_provider: String,

    /// Whisper model, when the whisper provider is selected
    pub stt_model: String,

    /// Recognition/synthesis language code
    pub language: String,

    /// TTS provider ("google" or "openai")
    pub tts_provider: String,

    /// TTS voice identifier
    pub tts_voice: String,

    /// TTS speed multiplier
    pub tts_speed: f32,
}

/// Assistant configuration
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// Path to the Q&A table JSON file; defaults to
    /// `<data_dir>/questions.json` when present
    pub qa_file: Option<PathBuf>,

    /// Gemini model for the generative fallback
    pub model: Option<String>,
}

/// Attendance configuration
#[derive(Debug, Clone)]
pub struct AttendanceConfig {
    /// Directory of labeled reference face images
    pub images_dir: PathBuf,

    /// Minimum face similarity confidence (0-100)
    pub similarity_threshold: f32,
}

/// API keys for external services
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    /// Google API key (Cloud Speech and Cloud TTS)
    pub google: Option<String>,

    /// Gemini API key (generative fallback)
    pub gemini: Option<String>,

    /// `OpenAI` API key (Whisper and TTS alternates)
    pub openai: Option<String>,

    /// Face++ API key (face comparison)
    pub facepp_key: Option<String>,

    /// Face++ API secret
    pub facepp_secret: Option<String>,
}

impl Config {
    /// Load configuration: defaults, then the config file overlay, then
    /// environment variables
    ///
    /// # Errors
    ///
    /// Returns error if the platform directories cannot be determined or
    /// the config file is malformed
    pub fn load() -> Result<Self> {
        let dirs = ProjectDirs::from("dev", "kirti", "kirti")
            .ok_or_else(|| Error::Config("cannot determine platform directories".to_string()))?;

        let file = KirtiConfigFile::load(dirs.config_dir().join("config.toml"))?;

        let data_dir = env_var("KIRTI_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| dirs.data_dir().to_path_buf());
        std::fs::create_dir_all(&data_dir)?;

        let port = env_var("KIRTI_PORT")
            .and_then(|v| v.parse().ok())
            .or(file.server.port)
            .unwrap_or(DEFAULT_PORT);

        let server = ServerConfig {
            port,
            static_dir: env_var("KIRTI_STATIC_DIR")
                .map(PathBuf::from)
                .or(file.server.static_dir),
            notify_url: env_var("KIRTI_NOTIFY_URL")
                .or(file.server.notify_url)
                .or_else(|| Some(format!("http://localhost:{port}/api/speak"))),
        };

        let voice = VoiceConfig {
            enabled: env_var("KIRTI_VOICE")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .or(file.voice.enabled)
                .unwrap_or(false),
            stt_provider: file
                .voice
                .stt_provider
                .unwrap_or_else(|| "google".to_string()),
            stt_model: file
                .voice
                .stt_model
                .unwrap_or_else(|| "whisper-1".to_string()),
            language: file.voice.language.unwrap_or_else(|| "en-IN".to_string()),
            tts_provider: file
                .voice
                .tts_provider
                .unwrap_or_else(|| "google".to_string()),
            tts_voice: file
                .voice
                .tts_voice
                .unwrap_or_else(|| "en-IN-Wavenet-B".to_string()),
            tts_speed: file.voice.tts_speed.unwrap_or(1.0),
        };

        let qa_file = env_var("KIRTI_QA_FILE")
            .map(PathBuf::from)
            .or(file.assistant.qa_file)
            .or_else(|| {
                let default = data_dir.join("questions.json");
                default.exists().then_some(default)
            });

        let assistant = AssistantConfig {
            qa_file,
            model: file.assistant.model,
        };

        let attendance = AttendanceConfig {
            images_dir: env_var("KIRTI_IMAGES_DIR")
                .map(PathBuf::from)
                .or(file.attendance.images_dir)
                .unwrap_or_else(|| data_dir.join("images")),
            similarity_threshold: file
                .attendance
                .similarity_threshold
                .unwrap_or(DEFAULT_SIMILARITY_THRESHOLD),
        };

        let api_keys = ApiKeys {
            google: env_var("GOOGLE_API_KEY").or(file.api_keys.google),
            gemini: env_var("GEMINI_API_KEY").or(file.api_keys.gemini),
            openai: env_var("OPENAI_API_KEY").or(file.api_keys.openai),
            facepp_key: env_var("FACEPP_API_KEY").or(file.api_keys.facepp_key),
            facepp_secret: env_var("FACEPP_API_SECRET").or(file.api_keys.facepp_secret),
        };

        Ok(Self {
            data_dir,
            server,
            voice,
            assistant,
            attendance,
            api_keys,
        })
    }

    /// Path to the attendance database file
    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("attendance.db")
    }
}

/// Read a non-empty environment variable
fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
