//! Audio playback with a duration cap.
//!
//! # Overview
//!
//! [`AudioBackend`] is the start/stop/poll surface of an audio engine.
//! [`RodioBackend`] is the production implementation; its output stream is
//! opened once, on first use, and reused for every later artifact.
//!
//! [`Player::play_limited`] starts an artifact and polls the backend at a
//! fixed interval until playback ends by itself or the cap is reached,
//! whichever comes first.  When both happen in the same tick the cap wins,
//! so a cap of zero always reports [`PlaybackOutcome::StoppedAtCap`].
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::time::Duration;
//! use pdf_audiobook::playback::{Player, RodioBackend};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let mut player = Player::new(Box::new(RodioBackend::new()), Duration::from_millis(100));
//!     let outcome = player
//!         .play_limited(Path::new("audiobook.mp3"), Duration::from_secs(120))
//!         .await
//!         .unwrap();
//!     println!("{outcome:?}");
//! }
//! ```

pub mod rodio_backend;
pub mod session;

pub use rodio_backend::RodioBackend;
pub use session::{PlaybackSession, Player};

#[cfg(test)]
pub use session::FakeBackend;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// PlaybackError
// ---------------------------------------------------------------------------

/// Failures to load or start an artifact.
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("audio file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("cannot decode audio: {0}")]
    Decode(String),

    /// The audio output device could not be opened or used.
    #[error("audio output unavailable: {0}")]
    Output(String),
}

// ---------------------------------------------------------------------------
// PlaybackOutcome
// ---------------------------------------------------------------------------

/// How a successfully started playback ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PlaybackOutcome {
    /// The audio ran to its end before the cap.
    Finished { elapsed: Duration },
    /// Playback was stopped because the cap was reached.
    StoppedAtCap { elapsed: Duration },
}

impl PlaybackOutcome {
    pub fn elapsed(&self) -> Duration {
        match self {
            PlaybackOutcome::Finished { elapsed } | PlaybackOutcome::StoppedAtCap { elapsed } => {
                *elapsed
            }
        }
    }
}

// ---------------------------------------------------------------------------
// AudioBackend trait
// ---------------------------------------------------------------------------

/// Start/stop/poll interface of an audio engine.
///
/// Backends are not required to be `Send`: audio output streams are often
/// tied to the thread that opened them, so the [`Player`] stays on the thread
/// driving the pipeline.  Calls are strictly sequential.
pub trait AudioBackend {
    /// Load `path` and start playing it immediately, replacing anything
    /// already playing.
    fn play(&mut self, path: &Path) -> Result<(), PlaybackError>;

    /// `true` while audio is still playing.
    fn is_busy(&self) -> bool;

    /// Stop playback.  A no-op when nothing is playing.
    fn stop(&mut self);
}

// Compile-time assertion: Box<dyn AudioBackend> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn AudioBackend>) {}
};
