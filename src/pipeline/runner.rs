//! Pipeline orchestrator — drives extract → synthesise → play per window.
//!
//! # Interactive run ([`Orchestrator::run_single`])
//!
//! ```text
//! ConversionRequest
//!   └─▶ resolve page selection          (InvalidRange: stop, nothing opened)
//!   └─▶ spawn_blocking(open PDF)         (DocumentOpen: stop)
//!   └─▶ spawn_blocking(extract window)   (blank text: NoTextExtracted)
//!   └─▶ tts.synthesize → <pdf dir>/audiobook.mp3
//!   └─▶ player.play_limited(cap)
//! ```
//!
//! # Batch run ([`Orchestrator::run_batch`])
//!
//! ```text
//! open PDF once ─▶ partition(total_pages, pages_per_part)
//!   for each window, in page order:
//!     extract ─▶ (blank → skip window) ─▶ synthesize audiobook_<a>_to_<b>.mp3 ─▶ play(cap)
//!   a failed window is recorded and the batch moves on
//! ```
//!
//! Windows run strictly one after another; the next window is not extracted
//! until the previous one has finished playing.  PDF parsing is pushed onto
//! `tokio::task::spawn_blocking` so the runtime never stalls.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::config::AppConfig;
use crate::extract::{extract_text, partition, DocumentLoader, ExtractError, PageWindow, PdfDocument};
use crate::playback::{PlaybackError, Player};
use crate::tts::{AudioArtifact, SpeechSynthesizer, SynthesisError};

use super::request::ConversionRequest;
use super::state::{BatchReport, WindowReport, WindowState};

// ---------------------------------------------------------------------------
// PipelineError
// ---------------------------------------------------------------------------

/// Errors that end a run (interactive) or a window (batch).
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The PDF is missing or corrupt.
    #[error(transparent)]
    DocumentOpen(ExtractError),

    /// The requested pages do not form a valid window.
    #[error("invalid page range: {0}")]
    InvalidRange(String),

    /// Extraction worked but produced nothing to speak.
    #[error("no text could be extracted from {0}")]
    NoTextExtracted(String),

    #[error("speech synthesis failed: {0}")]
    Synthesis(#[from] SynthesisError),

    #[error("playback failed: {0}")]
    Playback(#[from] PlaybackError),

    /// The batch output directory could not be created.
    #[error("cannot create output directory {}: {reason}", path.display())]
    OutputDir { path: PathBuf, reason: String },

    /// A blocking task died before returning.
    #[error("internal error: {0}")]
    Internal(String),
}

/// A window that stopped early: the terminal state plus its cause.
struct WindowFailure {
    state: WindowState,
    error: PipelineError,
    /// Set when the window failed after its audio was written.
    artifact: Option<AudioArtifact>,
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Runs the extraction-to-speech pipeline over page windows.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use pdf_audiobook::config::AppConfig;
/// use pdf_audiobook::extract::LopdfLoader;
/// use pdf_audiobook::pipeline::{ConversionRequest, Orchestrator};
/// use pdf_audiobook::playback::{Player, RodioBackend};
/// use pdf_audiobook::tts::GoogleTtsSynthesizer;
///
/// # async fn example() {
/// let config = AppConfig::default();
/// let player = Player::new(Box::new(RodioBackend::new()), config.playback.poll_interval());
/// let mut orchestrator = Orchestrator::new(
///     config.clone(),
///     Arc::new(LopdfLoader),
///     Arc::new(GoogleTtsSynthesizer::from_config(&config.speech)),
///     player,
/// );
///
/// let report = orchestrator
///     .run_single(&ConversionRequest::pages("book.pdf", 1, 10))
///     .await
///     .unwrap();
/// println!("{}", report.summary());
/// # }
/// ```
pub struct Orchestrator {
    config: AppConfig,
    loader: Arc<dyn DocumentLoader>,
    tts: Arc<dyn SpeechSynthesizer>,
    player: Player,
}

impl Orchestrator {
    /// Create a new orchestrator.
    ///
    /// # Arguments
    ///
    /// * `config` — language, batch size, playback cap and output locations.
    /// * `loader` — opens PDFs (e.g. `LopdfLoader`).
    /// * `tts`    — speech engine (e.g. `GoogleTtsSynthesizer`).
    /// * `player` — owns the process's audio backend.
    pub fn new(
        config: AppConfig,
        loader: Arc<dyn DocumentLoader>,
        tts: Arc<dyn SpeechSynthesizer>,
        player: Player,
    ) -> Self {
        Self {
            config,
            loader,
            tts,
            player,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Interactive mode
    // -----------------------------------------------------------------------

    /// Convert one page selection of one PDF and play it.
    ///
    /// The artifact is written next to the PDF as
    /// `output.interactive_file_name`.
    ///
    /// # Errors
    ///
    /// Any [`PipelineError`].  An invalid selection fails before the PDF is
    /// opened.
    pub async fn run_single(
        &mut self,
        request: &ConversionRequest,
    ) -> Result<WindowReport, PipelineError> {
        let window = request.selection.resolve()?;
        let doc = self.open(&request.pdf_path).await?;

        let output = request
            .pdf_path
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(&self.config.output.interactive_file_name);

        match self.process_window(doc, window, output).await {
            Ok(report) => {
                log::info!("pipeline: {}", report.summary());
                Ok(report)
            }
            Err(failure) => {
                log::error!("pipeline error: {}", failure.error);
                Err(failure.error)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Batch mode
    // -----------------------------------------------------------------------

    /// Convert a whole PDF in windows of `batch.pages_per_part` pages.
    ///
    /// Each window gets its own artifact, `audiobook_<first>_to_<last>.mp3`,
    /// in `output.batch_dir`.  Window failures and empty windows are recorded
    /// in the report; the batch always continues to the last window and never
    /// removes artifacts of earlier windows.
    ///
    /// # Errors
    ///
    /// [`PipelineError::InvalidRange`] for a zero window size,
    /// [`PipelineError::DocumentOpen`] when the PDF cannot be opened and
    /// [`PipelineError::OutputDir`] when `output.batch_dir` cannot be created.
    pub async fn run_batch(&mut self, pdf_path: &Path) -> Result<BatchReport, PipelineError> {
        let pages_per_part = self.config.batch.pages_per_part;
        if pages_per_part == 0 {
            return Err(PipelineError::InvalidRange(
                "pages per part must be at least 1".into(),
            ));
        }

        let doc = self.open(pdf_path).await?;
        let total_pages = doc.page_count();
        let windows = partition(total_pages, pages_per_part);

        let out_dir = self.config.output.batch_dir();
        tokio::fs::create_dir_all(&out_dir)
            .await
            .map_err(|e| PipelineError::OutputDir {
                path: out_dir.clone(),
                reason: e.to_string(),
            })?;

        log::info!(
            "pipeline: {} has {total_pages} pages, {} window(s) of up to {pages_per_part}",
            pdf_path.display(),
            windows.len()
        );

        let mut reports = Vec::with_capacity(windows.len());
        for window in windows {
            let output = out_dir.join(window.artifact_name());
            let report = match self.process_window(Arc::clone(&doc), Some(window), output).await {
                Ok(report) => {
                    log::info!("pipeline: {}", report.summary());
                    report
                }
                Err(failure) => {
                    let mut report = WindowReport::new(Some(window));
                    report.state = failure.state;
                    report.artifact = failure.artifact;
                    report.error = Some(failure.error.to_string());
                    if failure.state == WindowState::EmptyExtraction {
                        log::warn!("pipeline: {}", report.summary());
                    } else {
                        log::error!("pipeline: {}", report.summary());
                    }
                    report
                }
            };
            reports.push(report);
        }

        Ok(BatchReport {
            document: pdf_path.to_path_buf(),
            total_pages,
            windows: reports,
        })
    }

    // -----------------------------------------------------------------------
    // Shared per-window cycle
    // -----------------------------------------------------------------------

    async fn process_window(
        &mut self,
        doc: Arc<dyn PdfDocument>,
        window: Option<PageWindow>,
        output: PathBuf,
    ) -> Result<WindowReport, WindowFailure> {
        let mut report = WindowReport::new(window);
        let scope = report.scope();

        // ── 1. Extract ───────────────────────────────────────────────────
        advance(&mut report, WindowState::Extracting);
        let text = tokio::task::spawn_blocking(move || extract_text(doc.as_ref(), window))
            .await
            .map_err(|e| WindowFailure {
                state: WindowState::ExtractionFailed,
                error: PipelineError::Internal(e.to_string()),
                artifact: None,
            })?;

        if text.trim().is_empty() {
            return Err(WindowFailure {
                state: WindowState::EmptyExtraction,
                error: PipelineError::NoTextExtracted(scope),
                artifact: None,
            });
        }
        advance(&mut report, WindowState::Extracted);

        // ── 2. Synthesise ────────────────────────────────────────────────
        advance(&mut report, WindowState::Synthesizing);
        let artifact = self
            .tts
            .synthesize(&text, &output, &self.config.speech.language)
            .await
            .map_err(|e| WindowFailure {
                state: WindowState::SynthesisFailed,
                error: e.into(),
                artifact: None,
            })?;
        report.artifact = Some(artifact.clone());
        advance(&mut report, WindowState::Synthesized);

        // ── 3. Play (capped) ─────────────────────────────────────────────
        advance(&mut report, WindowState::Playing);
        let outcome = self
            .player
            .play_limited(&artifact.path, self.config.playback.cap())
            .await
            .map_err(|e| WindowFailure {
                state: WindowState::PlaybackFailed,
                error: e.into(),
                artifact: Some(artifact.clone()),
            })?;
        report.playback = Some(outcome);
        advance(&mut report, outcome.into());

        Ok(report)
    }

    async fn open(&self, path: &Path) -> Result<Arc<dyn PdfDocument>, PipelineError> {
        let loader = Arc::clone(&self.loader);
        let path = path.to_path_buf();

        tokio::task::spawn_blocking(move || loader.open(&path))
            .await
            .map_err(|e| PipelineError::Internal(e.to_string()))?
            .map_err(PipelineError::DocumentOpen)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn advance(report: &mut WindowReport, next: WindowState) {
    debug_assert!(
        report.state.can_advance_to(next),
        "illegal transition {:?} -> {next:?}",
        report.state
    );
    log::debug!(
        "pipeline: {} {} -> {}",
        report.scope(),
        report.state.label(),
        next.label()
    );
    report.state = next;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use tempfile::{tempdir, TempDir};

    use crate::extract::{FakeDocument, FakeLoader};
    use crate::pipeline::PageSelection;
    use crate::playback::{FakeBackend, PlaybackOutcome};
    use crate::tts::MockSynthesizer;

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    struct Rig {
        orchestrator: Orchestrator,
        loader: Arc<FakeLoader>,
        tts: Arc<MockSynthesizer>,
        backend: FakeBackend,
        dir: TempDir,
    }

    fn rig(loader: FakeLoader, tts: MockSynthesizer, backend: FakeBackend) -> Rig {
        let dir = tempdir().expect("temp dir");
        let mut config = AppConfig::default();
        config.output.batch_dir = Some(dir.path().join("batch"));

        let loader = Arc::new(loader);
        let tts = Arc::new(tts);
        let player = Player::new(Box::new(backend.clone()), config.playback.poll_interval());
        let orchestrator = Orchestrator::new(
            config,
            Arc::clone(&loader) as Arc<dyn DocumentLoader>,
            Arc::clone(&tts) as Arc<dyn SpeechSynthesizer>,
            player,
        );

        Rig {
            orchestrator,
            loader,
            tts,
            backend,
            dir,
        }
    }

    fn short_audio() -> FakeBackend {
        FakeBackend::lasting(Duration::from_secs(2))
    }

    fn pdf_in(dir: &TempDir) -> PathBuf {
        dir.path().join("book.pdf")
    }

    // -----------------------------------------------------------------------
    // Interactive mode
    // -----------------------------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn full_document_is_converted_next_to_pdf() {
        let mut r = rig(
            FakeLoader::with(FakeDocument::numbered(3)),
            MockSynthesizer::ok(),
            short_audio(),
        );
        let pdf = pdf_in(&r.dir);

        let report = r
            .orchestrator
            .run_single(&ConversionRequest::full_document(&pdf))
            .await
            .expect("run");

        let expected = r.dir.path().join("audiobook.mp3");
        assert_eq!(report.state, WindowState::PlayedToCompletion);
        assert_eq!(report.window, None);
        assert_eq!(report.artifact.as_ref().unwrap().path, expected);
        assert_eq!(r.tts.calls(), vec![("[p1][p2][p3]".to_string(), expected.clone())]);
        assert_eq!(r.backend.played(), vec![expected]);
    }

    #[tokio::test(start_paused = true)]
    async fn page_range_extracts_only_those_pages() {
        let mut r = rig(
            FakeLoader::with(FakeDocument::numbered(8)),
            MockSynthesizer::ok(),
            short_audio(),
        );
        let pdf = pdf_in(&r.dir);

        r.orchestrator
            .run_single(&ConversionRequest::pages(&pdf, 2, 4))
            .await
            .expect("run");

        assert_eq!(r.tts.calls()[0].0, "[p2][p3][p4]");
    }

    #[tokio::test(start_paused = true)]
    async fn checked_full_document_ignores_page_fields() {
        let mut r = rig(
            FakeLoader::with(FakeDocument::numbered(2)),
            MockSynthesizer::ok(),
            short_audio(),
        );
        let selection = PageSelection::from_form(true, "9", "1").unwrap();
        let request = ConversionRequest::new(pdf_in(&r.dir), selection);

        let report = r.orchestrator.run_single(&request).await.expect("run");
        assert!(report.state.is_played());
        assert_eq!(r.tts.calls()[0].0, "[p1][p2]");
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_range_fails_before_opening_the_pdf() {
        let mut r = rig(
            FakeLoader::with(FakeDocument::numbered(5)),
            MockSynthesizer::ok(),
            short_audio(),
        );
        let pdf = pdf_in(&r.dir);

        let result = r
            .orchestrator
            .run_single(&ConversionRequest::pages(&pdf, 1, 0))
            .await;

        assert!(matches!(result, Err(PipelineError::InvalidRange(_))));
        assert_eq!(r.loader.open_count(), 0);
        assert!(r.tts.calls().is_empty());
        assert!(r.backend.played().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn unopenable_pdf_is_document_open_error() {
        let mut r = rig(FakeLoader::broken(), MockSynthesizer::ok(), short_audio());
        let pdf = pdf_in(&r.dir);

        let result = r
            .orchestrator
            .run_single(&ConversionRequest::full_document(&pdf))
            .await;

        assert!(matches!(
            result,
            Err(PipelineError::DocumentOpen(ExtractError::Open { .. }))
        ));
        assert!(r.tts.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn blank_pages_are_no_text_extracted() {
        let doc = FakeDocument::new(vec![Some(String::new()), Some("  \n".into()), None]);
        let mut r = rig(FakeLoader::with(doc), MockSynthesizer::ok(), short_audio());
        let pdf = pdf_in(&r.dir);

        let result = r
            .orchestrator
            .run_single(&ConversionRequest::full_document(&pdf))
            .await;

        assert!(matches!(result, Err(PipelineError::NoTextExtracted(_))));
        assert!(r.tts.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn range_past_last_page_is_no_text_extracted() {
        let mut r = rig(
            FakeLoader::with(FakeDocument::numbered(3)),
            MockSynthesizer::ok(),
            short_audio(),
        );
        let pdf = pdf_in(&r.dir);

        let result = r
            .orchestrator
            .run_single(&ConversionRequest::pages(&pdf, 7, 9))
            .await;

        assert!(matches!(result, Err(PipelineError::NoTextExtracted(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn synthesis_failure_skips_playback() {
        let mut r = rig(
            FakeLoader::with(FakeDocument::numbered(2)),
            MockSynthesizer::failing(),
            short_audio(),
        );
        let pdf = pdf_in(&r.dir);

        let result = r
            .orchestrator
            .run_single(&ConversionRequest::full_document(&pdf))
            .await;

        assert!(matches!(result, Err(PipelineError::Synthesis(_))));
        assert!(r.backend.played().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn playback_failure_is_reported() {
        let mut r = rig(
            FakeLoader::with(FakeDocument::numbered(2)),
            MockSynthesizer::ok(),
            FakeBackend::broken(),
        );
        let pdf = pdf_in(&r.dir);

        let result = r
            .orchestrator
            .run_single(&ConversionRequest::full_document(&pdf))
            .await;

        assert!(matches!(result, Err(PipelineError::Playback(_))));
        // The artifact was still written.
        assert!(r.dir.path().join("audiobook.mp3").exists());
    }

    #[tokio::test(start_paused = true)]
    async fn long_audio_is_capped_at_configured_duration() {
        let mut r = rig(
            FakeLoader::with(FakeDocument::numbered(2)),
            MockSynthesizer::ok(),
            FakeBackend::lasting(Duration::from_secs(3600)),
        );
        let pdf = pdf_in(&r.dir);

        let report = r
            .orchestrator
            .run_single(&ConversionRequest::full_document(&pdf))
            .await
            .expect("run");

        assert_eq!(report.state, WindowState::PlayedToCap);
        let elapsed = report.playback.map(|o| o.elapsed()).unwrap();
        assert!(elapsed >= Duration::from_secs(120));
        assert!(elapsed < Duration::from_secs(120) + Duration::from_millis(100));
        assert_eq!(r.backend.stops(), 1);
    }

    // -----------------------------------------------------------------------
    // Batch mode
    // -----------------------------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn batch_of_25_pages_makes_three_artifacts() {
        let mut r = rig(
            FakeLoader::with(FakeDocument::numbered(25)),
            MockSynthesizer::ok(),
            short_audio(),
        );
        let pdf = pdf_in(&r.dir);
        let out = r.dir.path().join("batch");

        let report = r.orchestrator.run_batch(&pdf).await.expect("batch");

        assert_eq!(report.total_pages, 25);
        assert_eq!(report.windows.len(), 3);
        assert_eq!(report.played(), 3);

        let expected: Vec<PathBuf> = [
            "audiobook_1_to_10.mp3",
            "audiobook_11_to_20.mp3",
            "audiobook_21_to_25.mp3",
        ]
        .iter()
        .map(|name| out.join(name))
        .collect();

        let written: Vec<PathBuf> = r.tts.calls().into_iter().map(|(_, p)| p).collect();
        assert_eq!(written, expected);
        assert_eq!(r.backend.played(), expected);
        for path in &expected {
            assert!(path.exists(), "{} missing", path.display());
        }

        let texts: Vec<String> = r.tts.calls().into_iter().map(|(t, _)| t).collect();
        assert!(texts[0].starts_with("[p1]") && texts[0].ends_with("[p10]"));
        assert_eq!(texts[2], "[p21][p22][p23][p24][p25]");
    }

    #[tokio::test(start_paused = true)]
    async fn empty_window_is_skipped_and_batch_continues() {
        let mut pages: Vec<Option<String>> = (1..=6).map(|n| Some(format!("[p{n}]"))).collect();
        pages[2] = Some(String::new());
        pages[3] = Some(" ".into());
        let mut r = rig(FakeLoader::with(FakeDocument::new(pages)), MockSynthesizer::ok(), short_audio());
        r.orchestrator.config.batch.pages_per_part = 2;
        let pdf = pdf_in(&r.dir);

        let report = r.orchestrator.run_batch(&pdf).await.expect("batch");

        let states: Vec<WindowState> = report.windows.iter().map(|w| w.state).collect();
        assert_eq!(
            states,
            vec![
                WindowState::PlayedToCompletion,
                WindowState::EmptyExtraction,
                WindowState::PlayedToCompletion,
            ]
        );
        assert_eq!(report.skipped(), 1);
        assert_eq!(r.tts.calls().len(), 2);
        assert!(report.windows[1].artifact.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn unreadable_page_does_not_abort_its_window() {
        let doc = FakeDocument::new(vec![Some("a".into()), None, Some("c".into())]);
        let mut r = rig(FakeLoader::with(doc), MockSynthesizer::ok(), short_audio());
        let pdf = pdf_in(&r.dir);

        let report = r.orchestrator.run_batch(&pdf).await.expect("batch");

        assert_eq!(report.played(), 1);
        assert_eq!(r.tts.calls()[0].0, "ac");
    }

    #[tokio::test(start_paused = true)]
    async fn panicking_page_does_not_abort_its_window() {
        let doc = FakeDocument::numbered(3).panicking_on(1);
        let mut r = rig(FakeLoader::with(doc), MockSynthesizer::ok(), short_audio());
        let pdf = pdf_in(&r.dir);

        let report = r.orchestrator.run_batch(&pdf).await.expect("batch");

        let states: Vec<WindowState> = report.windows.iter().map(|w| w.state).collect();
        assert_eq!(states, vec![WindowState::PlayedToCompletion]);
        let texts: Vec<String> = r.tts.calls().into_iter().map(|(t, _)| t).collect();
        assert_eq!(texts, vec!["[p1][p3]".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn synthesis_failures_do_not_stop_the_batch() {
        let mut r = rig(
            FakeLoader::with(FakeDocument::numbered(25)),
            MockSynthesizer::failing(),
            short_audio(),
        );
        let pdf = pdf_in(&r.dir);

        let report = r.orchestrator.run_batch(&pdf).await.expect("batch");

        assert_eq!(report.windows.len(), 3);
        assert_eq!(report.failed(), 3);
        assert!(report
            .windows
            .iter()
            .all(|w| w.state == WindowState::SynthesisFailed && w.error.is_some()));
        assert_eq!(r.tts.calls().len(), 3);
        assert!(r.backend.played().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn playback_failures_keep_every_artifact() {
        let mut r = rig(
            FakeLoader::with(FakeDocument::numbered(25)),
            MockSynthesizer::ok(),
            FakeBackend::broken(),
        );
        let pdf = pdf_in(&r.dir);
        let out = r.dir.path().join("batch");

        let report = r.orchestrator.run_batch(&pdf).await.expect("batch");

        assert_eq!(report.windows.len(), 3);
        assert_eq!(report.failed(), 3);
        for w in &report.windows {
            assert_eq!(w.state, WindowState::PlaybackFailed);
            assert!(w.error.is_some());
            let artifact = w.artifact.as_ref().expect("artifact recorded");
            assert!(artifact.path.exists(), "{} missing", artifact.path.display());
        }
        for name in [
            "audiobook_1_to_10.mp3",
            "audiobook_11_to_20.mp3",
            "audiobook_21_to_25.mp3",
        ] {
            assert!(out.join(name).exists(), "{name} missing");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn uncreatable_output_dir_fails_the_batch() {
        let mut r = rig(
            FakeLoader::with(FakeDocument::numbered(5)),
            MockSynthesizer::ok(),
            short_audio(),
        );
        let blocker = r.dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").unwrap();
        r.orchestrator.config.output.batch_dir = Some(blocker.join("batch"));
        let pdf = pdf_in(&r.dir);

        let result = r.orchestrator.run_batch(&pdf).await;

        match result {
            Err(PipelineError::OutputDir { path, .. }) => assert_eq!(path, blocker.join("batch")),
            other => panic!("expected OutputDir, got {other:?}"),
        }
        assert!(r.tts.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn every_window_is_capped() {
        let mut r = rig(
            FakeLoader::with(FakeDocument::numbered(15)),
            MockSynthesizer::ok(),
            FakeBackend::lasting(Duration::from_secs(900)),
        );
        r.orchestrator.config.playback.cap_secs = 5;
        let pdf = pdf_in(&r.dir);

        let report = r.orchestrator.run_batch(&pdf).await.expect("batch");

        assert_eq!(report.windows.len(), 2);
        for w in &report.windows {
            assert_eq!(w.state, WindowState::PlayedToCap);
            assert!(matches!(w.playback, Some(PlaybackOutcome::StoppedAtCap { .. })));
        }
        assert_eq!(r.backend.stops(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn batch_with_unopenable_pdf_fails() {
        let mut r = rig(FakeLoader::broken(), MockSynthesizer::ok(), short_audio());
        let pdf = pdf_in(&r.dir);

        let result = r.orchestrator.run_batch(&pdf).await;
        assert!(matches!(result, Err(PipelineError::DocumentOpen(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_pages_per_part_is_invalid() {
        let mut r = rig(
            FakeLoader::with(FakeDocument::numbered(5)),
            MockSynthesizer::ok(),
            short_audio(),
        );
        r.orchestrator.config.batch.pages_per_part = 0;
        let pdf = pdf_in(&r.dir);

        let result = r.orchestrator.run_batch(&pdf).await;
        assert!(matches!(result, Err(PipelineError::InvalidRange(_))));
        assert_eq!(r.loader.open_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_document_has_no_windows() {
        let mut r = rig(
            FakeLoader::with(FakeDocument::new(Vec::new())),
            MockSynthesizer::ok(),
            short_audio(),
        );
        let pdf = pdf_in(&r.dir);

        let report = r.orchestrator.run_batch(&pdf).await.expect("batch");
        assert!(report.windows.is_empty());
        assert_eq!(report.total_pages, 0);
    }
}
