//! Voice processing module
//!
//! Handles microphone capture, utterance endpointing, playback, and the
//! cloud STT/TTS clients.

mod capture;
mod playback;
mod stt;
mod tts;
mod utterance;

pub use capture::{Microphone, SAMPLE_RATE, samples_to_wav};
pub use playback::Speaker;
pub use stt::SpeechToText;
pub use tts::TextToSpeech;
pub use utterance::UtteranceDetector;
