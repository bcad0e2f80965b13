//! Text-to-speech module.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │               SpeechSynthesizer (trait)                   │
//! │                                                          │
//! │   text ──chunk_text──▶ ≤100-char fragments               │
//! │                          │                               │
//! │                          ▼                               │
//! │              GoogleTtsSynthesizer::fetch  (one per chunk) │
//! │                          │                               │
//! │                          ▼                               │
//! │        MP3 segments concatenated ──▶ output path          │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use pdf_audiobook::config::SpeechConfig;
//! use pdf_audiobook::tts::{GoogleTtsSynthesizer, SpeechSynthesizer};
//!
//! #[tokio::main]
//! async fn main() {
//!     let tts = GoogleTtsSynthesizer::from_config(&SpeechConfig::default());
//!     let artifact = tts
//!         .synthesize("Olá, mundo!", Path::new("hello.mp3"), "pt")
//!         .await
//!         .unwrap();
//!     println!("saved {}", artifact.path.display());
//! }
//! ```

pub mod chunk;
pub mod google;

pub use chunk::chunk_text;
pub use google::GoogleTtsSynthesizer;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// SynthesisError
// ---------------------------------------------------------------------------

/// Errors that can occur while converting text to an audio file.
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// Nothing speakable in the input (empty, whitespace or punctuation only).
    #[error("no text to speak")]
    EmptyText,

    /// HTTP transport or connection error.
    #[error("TTS request failed: {0}")]
    Request(String),

    /// A request did not complete within the configured timeout.
    #[error("TTS request timed out")]
    Timeout,

    /// The engine answered with a non-success status.
    #[error("TTS engine returned HTTP {status}")]
    Status { status: u16 },

    /// The engine answered successfully but sent no audio.
    #[error("TTS engine returned no audio")]
    EmptyResponse,

    /// The audio file could not be written.
    #[error("cannot write {}: {reason}", path.display())]
    Write { path: PathBuf, reason: String },
}

impl From<reqwest::Error> for SynthesisError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SynthesisError::Timeout
        } else {
            SynthesisError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// AudioArtifact
// ---------------------------------------------------------------------------

/// An audio file produced by a [`SpeechSynthesizer`].
///
/// Artifacts stay on disk after a run; nothing cleans them up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioArtifact {
    pub path: PathBuf,
    /// Language code the speech was synthesised in.
    pub language: String,
}

impl AudioArtifact {
    pub fn new(path: impl Into<PathBuf>, language: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            language: language.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// SpeechSynthesizer trait
// ---------------------------------------------------------------------------

/// Async trait for text-to-speech engines.
///
/// Implementations write the whole audio for `text` to `output`, replacing
/// any existing file, and must report failure rather than leave it silent.
/// A partially written file is not cleaned up.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(
        &self,
        text: &str,
        output: &Path,
        language: &str,
    ) -> Result<AudioArtifact, SynthesisError>;
}

// ---------------------------------------------------------------------------
// MockSynthesizer  (test-only)
// ---------------------------------------------------------------------------

/// Test double that writes a placeholder file and records every call.
#[cfg(test)]
pub struct MockSynthesizer {
    fail: bool,
    calls: std::sync::Mutex<Vec<(String, PathBuf)>>,
}

#[cfg(test)]
impl MockSynthesizer {
    /// A synthesizer that succeeds for any speakable text.
    pub fn ok() -> Self {
        Self {
            fail: false,
            calls: Default::default(),
        }
    }

    /// A synthesizer whose engine always fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            calls: Default::default(),
        }
    }

    /// `(text, output path)` of every call so far, in order.
    pub fn calls(&self) -> Vec<(String, PathBuf)> {
        self.calls.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    async fn synthesize(
        &self,
        text: &str,
        output: &Path,
        language: &str,
    ) -> Result<AudioArtifact, SynthesisError> {
        self.calls
            .lock()
            .unwrap()
            .push((text.to_string(), output.to_path_buf()));

        if self.fail {
            return Err(SynthesisError::Status { status: 503 });
        }
        if chunk_text(text, 100).is_empty() {
            return Err(SynthesisError::EmptyText);
        }

        std::fs::write(output, format!("{language}:{text}")).map_err(|e| {
            SynthesisError::Write {
                path: output.to_path_buf(),
                reason: e.to_string(),
            }
        })?;
        Ok(AudioArtifact::new(output, language))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
