//! Kirti Gateway - Voice assistant and face check-in attendance gateway
//!
//! This library provides the core functionality for the Kirti gateway:
//! - Voice interaction (capture, STT, Q&A answering, TTS, playback)
//! - Face-match attendance check-in/check-out over HTTP
//! - A durable per-day attendance ledger
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                    Interfaces                        │
//! │     Microphone/Speakers   │   Kiosk web UI (HTTP)   │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                  Kirti Gateway                       │
//! │  Assistant loop │ Identity resolution │ Ledger      │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                Cloud services                        │
//! │   STT  │  TTS  │  Text generation  │  Face compare  │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod answer;
pub mod api;
pub mod assistant;
pub mod attendance;
pub mod config;
pub mod db;
pub mod error;
pub mod identity;
pub mod notify;
pub mod voice;

pub use answer::{AnswerSource, QaTable, TextGenClient};
pub use assistant::Assistant;
pub use attendance::{
    AttendanceLedger, AttendanceRecord, AttendanceStore, Clock, EventResult, SqliteStore,
    SystemClock,
};
pub use config::Config;
pub use db::{DbConn, DbPool};
pub use error::{Error, Result};
pub use identity::{FaceCompareClient, FaceMatchResolver, IdentityResolver, ReferenceGallery};
pub use notify::UiNotifier;
