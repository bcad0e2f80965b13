//! PDF Audiobook — turns page ranges of a PDF into spoken audio.
//!
//! ```text
//! PDF ──extract──▶ text ──tts──▶ audiobook.mp3 ──playback (capped)──▶ speakers
//! ```
//!
//! * [`extract`]  — page windows and per-page text extraction (`lopdf`).
//! * [`tts`]      — text-to-speech synthesis into MP3 artifacts.
//! * [`playback`] — time-capped playback with a fixed poll interval (`rodio`).
//! * [`pipeline`] — interactive (single window) and batch (many windows) runs.
//! * [`config`]   — `settings.toml` persistence.

pub mod config;
pub mod extract;
pub mod pipeline;
pub mod playback;
pub mod tts;
