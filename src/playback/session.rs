//! Capped playback loop.
//!
//! [`Player`] owns the process's [`AudioBackend`].  Each call to
//! [`Player::play_limited`] lives for one [`PlaybackSession`]: start the
//! artifact, then poll every `poll_interval` until it ends or the cap runs
//! out.  Sleeps never overshoot the cap, so a capped stop is observed at an
//! elapsed time in `[cap, cap + poll_interval)`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::time::Instant;

use super::{AudioBackend, PlaybackError, PlaybackOutcome};

// ---------------------------------------------------------------------------
// PlaybackSession
// ---------------------------------------------------------------------------

/// State of one playback: what is playing, since when, and for how long it
/// may run.
#[derive(Debug, Clone)]
pub struct PlaybackSession {
    pub path: PathBuf,
    pub started: Instant,
    pub cap: Duration,
}

impl PlaybackSession {
    pub fn start(path: &Path, cap: Duration) -> Self {
        Self {
            path: path.to_path_buf(),
            started: Instant::now(),
            cap,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn cap_reached(&self) -> bool {
        self.elapsed() >= self.cap
    }

    /// Time left before the cap; zero once it has been reached.
    pub fn remaining(&self) -> Duration {
        self.cap.saturating_sub(self.elapsed())
    }
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// Plays artifacts through one shared backend, enforcing a time cap.
pub struct Player {
    backend: Box<dyn AudioBackend>,
    poll_interval: Duration,
}

impl Player {
    pub fn new(backend: Box<dyn AudioBackend>, poll_interval: Duration) -> Self {
        Self {
            backend,
            poll_interval: poll_interval.max(Duration::from_millis(1)),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Play `path`, stopping once `cap` has elapsed.
    ///
    /// Blocks the calling task until playback is over.
    ///
    /// # Errors
    ///
    /// [`PlaybackError`] when the artifact cannot be loaded or started.
    pub async fn play_limited(
        &mut self,
        path: &Path,
        cap: Duration,
    ) -> Result<PlaybackOutcome, PlaybackError> {
        self.backend.play(path)?;
        let session = PlaybackSession::start(path, cap);
        log::debug!("playback: started {} (cap {:?})", path.display(), cap);

        loop {
            // Cap is checked first: a tie with natural completion counts as capped.
            if session.cap_reached() {
                self.backend.stop();
                let elapsed = session.elapsed();
                log::info!(
                    "playback: stopped {} at cap after {:.1}s",
                    session.path.display(),
                    elapsed.as_secs_f32()
                );
                return Ok(PlaybackOutcome::StoppedAtCap { elapsed });
            }

            if !self.backend.is_busy() {
                let elapsed = session.elapsed();
                log::info!(
                    "playback: finished {} after {:.1}s",
                    session.path.display(),
                    elapsed.as_secs_f32()
                );
                return Ok(PlaybackOutcome::Finished { elapsed });
            }

            tokio::time::sleep(self.poll_interval.min(session.remaining())).await;
        }
    }
}

// ---------------------------------------------------------------------------
// FakeBackend  (test-only)
// ---------------------------------------------------------------------------

/// Backend whose "audio" lasts a fixed time on the tokio clock.
///
/// Counters are shared through `Rc`, so a clone kept by the test observes the
/// instance moved into a [`Player`].
#[cfg(test)]
#[derive(Clone)]
pub struct FakeBackend {
    natural: Duration,
    fail: bool,
    started: std::rc::Rc<std::cell::Cell<Option<Instant>>>,
    stops: std::rc::Rc<std::cell::Cell<usize>>,
    played: std::rc::Rc<std::cell::RefCell<Vec<PathBuf>>>,
}

#[cfg(test)]
impl FakeBackend {
    /// Every artifact plays for `natural` before ending by itself.
    pub fn lasting(natural: Duration) -> Self {
        Self {
            natural,
            fail: false,
            started: Default::default(),
            stops: Default::default(),
            played: Default::default(),
        }
    }

    /// Every `play` fails as if the file could not be decoded.
    pub fn broken() -> Self {
        Self {
            fail: true,
            ..Self::lasting(Duration::ZERO)
        }
    }

    pub fn stops(&self) -> usize {
        self.stops.get()
    }

    pub fn played(&self) -> Vec<PathBuf> {
        self.played.borrow().clone()
    }
}

#[cfg(test)]
impl AudioBackend for FakeBackend {
    fn play(&mut self, path: &Path) -> Result<(), PlaybackError> {
        if self.fail {
            return Err(PlaybackError::Decode("unsupported format".into()));
        }
        self.played.borrow_mut().push(path.to_path_buf());
        self.started.set(Some(Instant::now()));
        Ok(())
    }

    fn is_busy(&self) -> bool {
        self.started
            .get()
            .is_some_and(|started| started.elapsed() < self.natural)
    }

    fn stop(&mut self) {
        self.started.set(None);
        self.stops.set(self.stops.get() + 1);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
