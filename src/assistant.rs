//! The voice assistant interaction loop
//!
//! Greets on startup, then cycles: capture one utterance, transcribe,
//! answer, speak. Sensory failures (no speech, STT errors) abort only
//! the current cycle; the loop ends when the user says "exit" or "stop".

use std::time::{Duration, Instant};

use chrono::{Local, Timelike};

use crate::answer::AnswerSource;
use crate::config::Config;
use crate::notify::UiNotifier;
use crate::voice::{Microphone, Speaker, SpeechToText, TextToSpeech, UtteranceDetector, samples_to_wav};
use crate::{Error, QaTable, Result, TextGenClient};

/// How long one listen cycle waits for speech before giving up
const LISTEN_TIMEOUT: Duration = Duration::from_secs(30);

/// How often the capture buffer is drained into the detector
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Voice-driven Q&A assistant
pub struct Assistant {
    microphone: Microphone,
    speaker: Speaker,
    stt: SpeechToText,
    tts: TextToSpeech,
    answers: AnswerSource,
    notifier: UiNotifier,
}

impl Assistant {
    /// Build the assistant from configuration
    ///
    /// # Errors
    ///
    /// Returns error if audio devices cannot be opened or the configured
    /// providers are missing their API keys
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            microphone: Microphone::open()?,
            speaker: Speaker::open()?,
            stt: build_stt(config)?,
            tts: build_tts(config)?,
            answers: build_answer_source(config)?,
            notifier: UiNotifier::new(config.server.notify_url.clone()),
        })
    }

    /// Run the assistant until the user asks it to stop
    ///
    /// # Errors
    ///
    /// Returns error only for unrecoverable audio failures; per-cycle
    /// misses are logged and skipped
    pub async fn run(&mut self) -> Result<()> {
        let hour = Local::now().hour();
        self.speak(greeting_for_hour(hour)).await;
        self.speak("I am your smart assistant. Ask me anything.").await;

        loop {
            let query = match self.listen().await {
                Ok(Some(query)) => query,
                Ok(None) => continue,
                Err(e) => {
                    tracing::warn!(error = %e, "interaction cycle aborted");
                    continue;
                }
            };

            if query.contains("exit") || query.contains("stop") {
                self.speak("Goodbye! Have a nice day!").await;
                return Ok(());
            }

            let reply = self.answers.reply(&query).await;
            self.speak(&reply).await;
        }
    }

    /// Capture and transcribe one utterance
    ///
    /// Returns `Ok(None)` when nothing was recognized within the listen
    /// window — the no-speech outcome, not an error.
    async fn listen(&mut self) -> Result<Option<String>> {
        self.microphone.start()?;
        tracing::debug!("listening");

        let mut detector = UtteranceDetector::new();
        let deadline = Instant::now() + LISTEN_TIMEOUT;

        let samples = loop {
            tokio::time::sleep(POLL_INTERVAL).await;

            let chunk = self.microphone.drain();
            if !chunk.is_empty() && detector.process(&chunk) {
                break detector.take_utterance();
            }

            if Instant::now() > deadline {
                // Stop so playback doesn't feed back into the capture buffer
                self.microphone.stop();
                tracing::debug!("no speech within listen window");
                return Ok(None);
            }
        };
        self.microphone.stop();

        let wav = samples_to_wav(&samples, self.microphone.sample_rate())?;
        let transcript = self.stt.transcribe(&wav).await?.trim().to_lowercase();

        if transcript.is_empty() {
            tracing::debug!("could not recognize speech");
            return Ok(None);
        }

        tracing::info!(query = %transcript, "heard");
        Ok(Some(transcript))
    }

    /// Speak a line: notify the UI, synthesize, play
    ///
    /// All failures are logged and swallowed; a broken speaker must not
    /// take the loop down.
    pub async fn speak(&mut self, text: &str) {
        tracing::info!(reply = %text, "assistant");
        self.notifier.notify(text).await;

        match self.tts.synthesize(text).await {
            Ok(audio) => {
                if let Err(e) = self.speaker.play_mp3(&audio) {
                    tracing::warn!(error = %e, "playback failed");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "synthesis failed");
            }
        }
    }
}

/// Build the configured STT client
///
/// # Errors
///
/// Returns error for an unknown provider or missing API key
pub fn build_stt(config: &Config) -> Result<SpeechToText> {
    match config.voice.stt_provider.as_str() {
        "google" => SpeechToText::new_google(
            config.api_keys.google.clone().unwrap_or_default(),
            config.voice.language.clone(),
        ),
        "whisper" => SpeechToText::new_whisper(
            config.api_keys.openai.clone().unwrap_or_default(),
            config.voice.stt_model.clone(),
        ),
        other => Err(Error::Config(format!("unknown STT provider: {other}"))),
    }
}

/// Build the configured TTS client
///
/// # Errors
///
/// Returns error for an unknown provider or missing API key
pub fn build_tts(config: &Config) -> Result<TextToSpeech> {
    match config.voice.tts_provider.as_str() {
        "google" => TextToSpeech::new_google(
            config.api_keys.google.clone().unwrap_or_default(),
            config.voice.tts_voice.clone(),
            config.voice.language.clone(),
            config.voice.tts_speed,
        ),
        "openai" => TextToSpeech::new_openai(
            config.api_keys.openai.clone().unwrap_or_default(),
            config.voice.tts_voice.clone(),
            config.voice.tts_speed,
        ),
        other => Err(Error::Config(format!("unknown TTS provider: {other}"))),
    }
}

/// Build the answer source: Q&A table plus optional generative fallback
///
/// # Errors
///
/// Returns error if a configured Q&A file cannot be loaded
pub fn build_answer_source(config: &Config) -> Result<AnswerSource> {
    let table = match &config.assistant.qa_file {
        Some(path) => QaTable::load(path)?,
        None => {
            tracing::warn!("no Q&A table configured, every query goes to the fallback");
            QaTable::default()
        }
    };

    let textgen = match &config.api_keys.gemini {
        Some(key) => {
            let client = TextGenClient::new(key.clone())?;
            Some(match &config.assistant.model {
                Some(model) => client.with_model(model.clone()),
                None => client,
            })
        }
        None => None,
    };

    Ok(AnswerSource::new(table, textgen))
}

/// Greeting line for a local hour of day
fn greeting_for_hour(hour: u32) -> &'static str {
    if hour < 12 {
        "Good morning!"
    } else if hour < 18 {
        "Good afternoon!"
    } else {
        "Good evening!"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_by_hour() {
        assert_eq!(greeting_for_hour(0), "Good morning!");
        assert_eq!(greeting_for_hour(11), "Good morning!");
        assert_eq!(greeting_for_hour(12), "Good afternoon!");
        assert_eq!(greeting_for_hour(17), "Good afternoon!");
        assert_eq!(greeting_for_hour(18), "Good evening!");
        assert_eq!(greeting_for_hour(23), "Good evening!");
    }
}
