//! `rodio` audio backend.
//!
//! rodio's `OutputStream` is `!Send`, so [`RodioBackend`] must stay on the
//! thread that created it.  The stream is opened lazily on the first
//! [`AudioBackend::play`] and kept for the life of the backend; every later
//! artifact gets a fresh `Sink` on the same stream.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

use super::{AudioBackend, PlaybackError};

/// Plays MP3 (and any other format rodio decodes) on the default output
/// device.
#[derive(Default)]
pub struct RodioBackend {
    /// `(stream, handle)`; the stream must outlive every sink built on it.
    output: Option<(OutputStream, OutputStreamHandle)>,
    sink: Option<Sink>,
}

impl RodioBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&mut self) -> Result<&OutputStreamHandle, PlaybackError> {
        if self.output.is_none() {
            let output = OutputStream::try_default()
                .map_err(|e| PlaybackError::Output(e.to_string()))?;
            log::debug!("playback: default output stream opened");
            self.output = Some(output);
        }
        match &self.output {
            Some((_, handle)) => Ok(handle),
            None => Err(PlaybackError::Output("output stream not initialised".into())),
        }
    }
}

impl AudioBackend for RodioBackend {
    fn play(&mut self, path: &Path) -> Result<(), PlaybackError> {
        let file = File::open(path).map_err(|_| PlaybackError::FileNotFound(path.to_path_buf()))?;
        let source =
            Decoder::new(BufReader::new(file)).map_err(|e| PlaybackError::Decode(e.to_string()))?;

        self.stop();

        let sink = Sink::try_new(self.handle()?).map_err(|e| PlaybackError::Output(e.to_string()))?;
        sink.append(source);
        self.sink = Some(sink);
        Ok(())
    }

    fn is_busy(&self) -> bool {
        self.sink.as_ref().is_some_and(|sink| !sink.empty())
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    // These paths fail before the output device is touched, so they run on
    // machines without audio hardware.

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.mp3");

        let mut backend = RodioBackend::new();
        assert!(matches!(
            backend.play(&path),
            Err(PlaybackError::FileNotFound(p)) if p == path
        ));
        assert!(!backend.is_busy());
    }

    #[test]
    fn garbage_file_fails_to_decode() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("noise.mp3");
        std::fs::write(&path, b"definitely not audio").unwrap();

        let mut backend = RodioBackend::new();
        assert!(matches!(backend.play(&path), Err(PlaybackError::Decode(_))));
    }

    #[test]
    fn idle_backend_is_not_busy_and_stop_is_noop() {
        let mut backend = RodioBackend::new();
        assert!(!backend.is_busy());
        backend.stop();
        assert!(!backend.is_busy());
    }
}
