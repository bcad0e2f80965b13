//! Extraction-to-speech pipeline.
//!
//! This module ties the [`extract`](crate::extract), [`tts`](crate::tts) and
//! [`playback`](crate::playback) stages together, one page window at a time.
//!
//! # Architecture
//!
//! ```text
//! ConversionRequest ──▶ Orchestrator::run_single ──▶ WindowReport
//! PDF path          ──▶ Orchestrator::run_batch  ──▶ BatchReport (one WindowReport per window)
//!
//! per window:  Extract ──▶ Synthesize ──▶ Play (capped)
//!              WindowState tracks where the window stopped
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use pdf_audiobook::config::AppConfig;
//! use pdf_audiobook::extract::LopdfLoader;
//! use pdf_audiobook::pipeline::Orchestrator;
//! use pdf_audiobook::playback::{Player, RodioBackend};
//! use pdf_audiobook::tts::GoogleTtsSynthesizer;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let config = AppConfig::load().unwrap_or_default();
//!     let player = Player::new(Box::new(RodioBackend::new()), config.playback.poll_interval());
//!     let mut orchestrator = Orchestrator::new(
//!         config.clone(),
//!         Arc::new(LopdfLoader),
//!         Arc::new(GoogleTtsSynthesizer::from_config(&config.speech)),
//!         player,
//!     );
//!
//!     let report = orchestrator.run_batch(Path::new("book.pdf")).await.unwrap();
//!     println!("{} of {} windows played", report.played(), report.windows.len());
//! }
//! ```

pub mod request;
pub mod runner;
pub mod state;

pub use request::{ConversionRequest, PageSelection};
pub use runner::{Orchestrator, PipelineError};
pub use state::{BatchReport, WindowReport, WindowState};
