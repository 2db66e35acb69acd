use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::sync::{Mutex, RwLock};
use tracing_subscriber::EnvFilter;

use kirti_gateway::api::{self, ApiState};
use kirti_gateway::attendance::{AttendanceLedger, SqliteStore, SystemClock};
use kirti_gateway::identity::{FaceCompareClient, FaceMatchResolver, IdentityResolver, ReferenceGallery};
use kirti_gateway::voice::{Microphone, Speaker};
use kirti_gateway::{Assistant, Config, assistant, db};

/// Kirti - Voice assistant and face check-in attendance gateway
#[derive(Parser)]
#[command(name = "kirti", version, about)]
struct Cli {
    /// Port to listen on (overrides config)
    #[arg(long, env = "KIRTI_PORT")]
    port: Option<u16>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable the voice assistant loop (for headless servers)
    #[arg(long, env = "KIRTI_DISABLE_VOICE")]
    disable_voice: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Test microphone input
    TestMic {
        /// Duration in seconds
        #[arg(short, long, default_value = "5")]
        duration: u64,
    },
    /// Test speaker output
    TestSpeaker,
    /// Test TTS output
    TestTts {
        /// Text to speak
        #[arg(default_value = "Hello! This is a test of the text to speech system.")]
        text: String,
    },
    /// Answer a question in text mode (no audio)
    Ask {
        /// The question to answer
        question: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,kirti_gateway=info",
        1 => "info,kirti_gateway=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

#[allow(clippy::future_not_send)]
async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if cli.disable_voice {
        config.voice.enabled = false;
    }

    // Handle subcommands
    if let Some(cmd) = cli.command {
        return match cmd {
            Command::TestMic { duration } => test_mic(duration).await,
            Command::TestSpeaker => test_speaker(),
            Command::TestTts { text } => test_tts(&config, &text).await,
            Command::Ask { question } => ask(&config, &question).await,
        };
    }

    tracing::info!(
        port = config.server.port,
        voice = config.voice.enabled,
        "starting kirti gateway"
    );

    // Attendance ledger over the durable store
    let pool = db::init(config.db_path())?;
    let ledger = AttendanceLedger::open(
        Box::new(SqliteStore::new(pool.clone())),
        Box::new(SystemClock),
    )?;

    // Reference gallery and face matching
    let gallery = ReferenceGallery::load(&config.attendance.images_dir)?;
    let resolver: Option<Arc<dyn IdentityResolver>> = match (
        &config.api_keys.facepp_key,
        &config.api_keys.facepp_secret,
    ) {
        (Some(key), Some(secret)) => {
            let client = FaceCompareClient::new(key.clone(), secret.clone())?;
            Some(Arc::new(FaceMatchResolver::new(
                gallery.clone(),
                client,
                config.attendance.similarity_threshold,
            )))
        }
        _ => {
            tracing::warn!("Face++ credentials missing, attendance matching disabled");
            None
        }
    };

    let state = Arc::new(ApiState {
        db: pool,
        ledger: Mutex::new(ledger),
        resolver,
        gallery,
        clock: Arc::new(SystemClock),
        latest_message: RwLock::new("Say something...".to_string()),
        images_dir: config.attendance.images_dir.clone(),
        static_dir: config.server.static_dir.clone(),
        voice_enabled: config.voice.enabled,
    });

    if config.voice.enabled {
        let mut assistant = Assistant::from_config(&config)?;
        tracing::info!("kirti gateway ready - listening for questions");

        tokio::select! {
            result = api::serve(state.clone(), config.server.port) => result?,
            result = assistant.run() => {
                result?;
                tracing::info!("assistant loop ended, shutting down");
            }
        }
    } else {
        tracing::info!("kirti gateway ready (attendance-only mode, voice disabled)");
        api::serve(state, config.server.port).await?;
    }

    Ok(())
}

/// Test microphone input
#[allow(clippy::future_not_send)]
async fn test_mic(duration: u64) -> anyhow::Result<()> {
    println!("Testing microphone for {duration} seconds...");
    println!("Speak into your microphone!\n");

    let mut microphone = Microphone::open()?;
    microphone.start()?;

    println!("Sample rate: {} Hz", microphone.sample_rate());
    println!("---");

    for i in 0..duration {
        tokio::time::sleep(Duration::from_secs(1)).await;

        let samples = microphone.drain();
        let energy = calculate_rms(&samples);
        let peak = samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max);

        // Visual meter
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let meter_len = (energy * 100.0).min(50.0) as usize;
        let meter: String = "#".repeat(meter_len) + &" ".repeat(50 - meter_len);

        println!(
            "[{:2}s] RMS: {:.4} | Peak: {:.4} | [{}]",
            i + 1,
            energy,
            peak,
            meter
        );
    }

    microphone.stop();
    println!("\nMicrophone test complete.");
    Ok(())
}

/// Test speaker output with a short tone
fn test_speaker() -> anyhow::Result<()> {
    println!("Playing a 440 Hz test tone...");

    let speaker = Speaker::open()?;
    speaker.play_tone(440.0, 1.0)?;

    println!("Speaker test complete.");
    Ok(())
}

/// Test TTS output
#[allow(clippy::future_not_send)]
async fn test_tts(config: &Config, text: &str) -> anyhow::Result<()> {
    println!("Synthesizing: {text}");

    let tts = assistant::build_tts(config)?;
    let audio = tts.synthesize(text).await?;
    println!("Received {} bytes of audio", audio.len());

    let speaker = Speaker::open()?;
    speaker.play_mp3(&audio)?;

    println!("TTS test complete.");
    Ok(())
}

/// Answer a question in text mode
#[allow(clippy::future_not_send)]
async fn ask(config: &Config, question: &str) -> anyhow::Result<()> {
    let answers = assistant::build_answer_source(config)?;
    let reply = answers.reply(&question.to_lowercase()).await;
    println!("{reply}");
    Ok(())
}

/// RMS level of a sample window
#[allow(clippy::cast_precision_loss)]
fn calculate_rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: f32 = samples.iter().map(|s| s * s).sum();
    (sum_squares / samples.len() as f32).sqrt()
}
