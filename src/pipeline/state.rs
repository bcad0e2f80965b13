//! Per-window state machine and run reports.
//!
//! Every page window moves through [`WindowState`] on its own.  A failure or
//! an empty extraction ends that window only; other windows of a batch are
//! unaffected.
//!
//! [`WindowReport`] records where a window ended up, and [`BatchReport`]
//! collects them for a whole document.  Both serialise to JSON so any
//! front-end can render them.

use std::path::PathBuf;

use serde::Serialize;

use crate::extract::PageWindow;
use crate::playback::PlaybackOutcome;
use crate::tts::AudioArtifact;

// ---------------------------------------------------------------------------
// WindowState
// ---------------------------------------------------------------------------

/// States of one window's extract → synthesise → play cycle.
///
/// ```text
/// Pending ──▶ Extracting ──▶ Extracted ──▶ Synthesizing ──▶ Synthesized ──▶ Playing
///                  │                            │                             │
///                  ├─▶ ExtractionFailed         └─▶ SynthesisFailed           ├─▶ PlayedToCompletion
///                  └─▶ EmptyExtraction                                        ├─▶ PlayedToCap
///                                                                             └─▶ PlaybackFailed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowState {
    #[default]
    Pending,
    Extracting,
    Extracted,
    ExtractionFailed,
    EmptyExtraction,
    Synthesizing,
    Synthesized,
    SynthesisFailed,
    Playing,
    PlayedToCompletion,
    PlayedToCap,
    PlaybackFailed,
}

impl WindowState {
    /// `true` once the window can make no further progress.
    ///
    /// ```
    /// use pdf_audiobook::pipeline::WindowState;
    ///
    /// assert!(!WindowState::Extracting.is_terminal());
    /// assert!(WindowState::EmptyExtraction.is_terminal());
    /// assert!(WindowState::PlayedToCap.is_terminal());
    /// ```
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            WindowState::ExtractionFailed
                | WindowState::EmptyExtraction
                | WindowState::SynthesisFailed
                | WindowState::PlayedToCompletion
                | WindowState::PlayedToCap
                | WindowState::PlaybackFailed
        )
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            WindowState::ExtractionFailed
                | WindowState::SynthesisFailed
                | WindowState::PlaybackFailed
        )
    }

    /// `true` when the window's audio was played (to its end or to the cap).
    pub fn is_played(&self) -> bool {
        matches!(
            self,
            WindowState::PlayedToCompletion | WindowState::PlayedToCap
        )
    }

    /// Whether `next` is a legal successor of `self`.
    pub fn can_advance_to(&self, next: WindowState) -> bool {
        use WindowState::*;
        matches!(
            (self, next),
            (Pending, Extracting)
                | (Extracting, Extracted | ExtractionFailed | EmptyExtraction)
                | (Extracted, Synthesizing)
                | (Synthesizing, Synthesized | SynthesisFailed)
                | (Synthesized, Playing)
                | (Playing, PlayedToCompletion | PlayedToCap | PlaybackFailed)
        )
    }

    /// A short human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            WindowState::Pending => "Pending",
            WindowState::Extracting => "Extracting",
            WindowState::Extracted => "Extracted",
            WindowState::ExtractionFailed => "Extraction failed",
            WindowState::EmptyExtraction => "No text",
            WindowState::Synthesizing => "Synthesizing",
            WindowState::Synthesized => "Synthesized",
            WindowState::SynthesisFailed => "Synthesis failed",
            WindowState::Playing => "Playing",
            WindowState::PlayedToCompletion => "Played",
            WindowState::PlayedToCap => "Played (capped)",
            WindowState::PlaybackFailed => "Playback failed",
        }
    }
}

impl From<PlaybackOutcome> for WindowState {
    fn from(outcome: PlaybackOutcome) -> Self {
        match outcome {
            PlaybackOutcome::Finished { .. } => WindowState::PlayedToCompletion,
            PlaybackOutcome::StoppedAtCap { .. } => WindowState::PlayedToCap,
        }
    }
}

// ---------------------------------------------------------------------------
// WindowReport
// ---------------------------------------------------------------------------

/// Where one window's run ended.
#[derive(Debug, Clone, Serialize)]
pub struct WindowReport {
    /// `None` when the whole document was processed as one window.
    pub window: Option<PageWindow>,
    pub state: WindowState,
    /// Set once synthesis succeeded.
    pub artifact: Option<AudioArtifact>,
    /// Set once playback ran.
    pub playback: Option<PlaybackOutcome>,
    /// Message of the error that ended the window, if any.
    pub error: Option<String>,
}

impl WindowReport {
    pub fn new(window: Option<PageWindow>) -> Self {
        Self {
            window,
            state: WindowState::Pending,
            artifact: None,
            playback: None,
            error: None,
        }
    }

    /// Human-readable description of the window (`"pages 1-10"` or
    /// `"entire document"`).
    pub fn scope(&self) -> String {
        self.window
            .map_or_else(|| "entire document".to_string(), |w| w.to_string())
    }

    /// One-line summary suitable for a notice or log line.
    pub fn summary(&self) -> String {
        match (&self.artifact, &self.error) {
            (_, Some(error)) => format!("{}: {} ({error})", self.scope(), self.state.label()),
            (Some(artifact), None) => format!(
                "{}: audio saved to {} [{}]",
                self.scope(),
                artifact.path.display(),
                self.state.label()
            ),
            (None, None) => format!("{}: {}", self.scope(), self.state.label()),
        }
    }
}

// ---------------------------------------------------------------------------
// BatchReport
// ---------------------------------------------------------------------------

/// Outcome of a batch run: one report per window, in page order.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub document: PathBuf,
    pub total_pages: usize,
    pub windows: Vec<WindowReport>,
}

impl BatchReport {
    pub fn played(&self) -> usize {
        self.count(WindowState::is_played)
    }

    pub fn failed(&self) -> usize {
        self.count(WindowState::is_failure)
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| *s == WindowState::EmptyExtraction)
    }

    fn count(&self, pred: impl Fn(&WindowState) -> bool) -> usize {
        self.windows.iter().filter(|w| pred(&w.state)).count()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const ALL: [WindowState; 12] = [
        WindowState::Pending,
        WindowState::Extracting,
        WindowState::Extracted,
        WindowState::ExtractionFailed,
        WindowState::EmptyExtraction,
        WindowState::Synthesizing,
        WindowState::Synthesized,
        WindowState::SynthesisFailed,
        WindowState::Playing,
        WindowState::PlayedToCompletion,
        WindowState::PlayedToCap,
        WindowState::PlaybackFailed,
    ];

    #[test]
    fn default_is_pending() {
        assert_eq!(WindowState::default(), WindowState::Pending);
    }

    #[test]
    fn terminal_states_have_no_successor() {
        for from in ALL.iter().filter(|s| s.is_terminal()) {
            for to in ALL {
                assert!(!from.can_advance_to(to), "{from:?} -> {to:?}");
            }
        }
    }

    #[test]
    fn non_terminal_states_have_a_successor() {
        for from in ALL.iter().filter(|s| !s.is_terminal()) {
            assert!(ALL.iter().any(|to| from.can_advance_to(*to)), "{from:?} is stuck");
        }
    }

    #[test]
    fn happy_path_is_legal() {
        let path = [
            WindowState::Pending,
            WindowState::Extracting,
            WindowState::Extracted,
            WindowState::Synthesizing,
            WindowState::Synthesized,
            WindowState::Playing,
            WindowState::PlayedToCap,
        ];
        for pair in path.windows(2) {
            assert!(pair[0].can_advance_to(pair[1]), "{:?} -> {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn cannot_skip_synthesis() {
        assert!(!WindowState::Extracted.can_advance_to(WindowState::Playing));
        assert!(!WindowState::EmptyExtraction.can_advance_to(WindowState::Synthesizing));
    }

    #[test]
    fn failures_are_terminal() {
        for s in ALL.iter().filter(|s| s.is_failure()) {
            assert!(s.is_terminal());
            assert!(!s.is_played());
        }
    }

    #[test]
    fn playback_outcome_maps_to_state() {
        let finished = PlaybackOutcome::Finished {
            elapsed: Duration::from_secs(3),
        };
        let capped = PlaybackOutcome::StoppedAtCap {
            elapsed: Duration::from_secs(120),
        };
        assert_eq!(WindowState::from(finished), WindowState::PlayedToCompletion);
        assert_eq!(WindowState::from(capped), WindowState::PlayedToCap);
    }

    #[test]
    fn summary_mentions_artifact_or_error() {
        let mut report = WindowReport::new(Some(PageWindow::new(0, 10)));
        report.state = WindowState::PlayedToCap;
        report.artifact = Some(AudioArtifact::new("/out/audiobook_1_to_10.mp3", "pt"));
        assert_eq!(
            report.summary(),
            "pages 1-10: audio saved to /out/audiobook_1_to_10.mp3 [Played (capped)]"
        );

        let mut failed = WindowReport::new(None);
        failed.state = WindowState::SynthesisFailed;
        failed.error = Some("TTS request timed out".into());
        assert_eq!(
            failed.summary(),
            "entire document: Synthesis failed (TTS request timed out)"
        );
    }

    #[test]
    fn batch_counts() {
        let mk = |state| WindowReport {
            state,
            ..WindowReport::new(None)
        };
        let report = BatchReport {
            document: PathBuf::from("book.pdf"),
            total_pages: 40,
            windows: vec![
                mk(WindowState::PlayedToCap),
                mk(WindowState::EmptyExtraction),
                mk(WindowState::SynthesisFailed),
                mk(WindowState::PlayedToCompletion),
            ],
        };
        assert_eq!(report.played(), 2);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.failed(), 1);
    }

    #[test]
    fn report_serialises_to_json() {
        let mut report = WindowReport::new(Some(PageWindow::new(20, 25)));
        report.state = WindowState::EmptyExtraction;
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["state"], "empty_extraction");
        assert_eq!(json["window"]["start"], 20);
        assert_eq!(json["window"]["end"], 25);
    }
}
