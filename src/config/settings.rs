//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files.  Every section carries
//! `#[serde(default)]`, so a partially written `settings.toml` still loads.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// SpeechConfig
// ---------------------------------------------------------------------------

/// Settings for the text-to-speech engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Language code passed to the synthesis engine (e.g. `"pt"`, `"en"`).
    pub language: String,
    /// Base URL of the Google Translate TTS host.
    pub base_url: String,
    /// Maximum seconds to wait for each synthesis request.
    pub timeout_secs: u64,
    /// Longest text fragment sent in a single synthesis request.
    pub max_chunk_chars: usize,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            language: "pt".into(),
            base_url: "https://translate.google.com".into(),
            timeout_secs: 30,
            max_chunk_chars: 100,
        }
    }
}

// ---------------------------------------------------------------------------
// BatchConfig
// ---------------------------------------------------------------------------

/// Settings for batch mode (whole document split into fixed page windows).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Number of pages per window.  Must be at least 1.
    pub pages_per_part: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { pages_per_part: 10 }
    }
}

// ---------------------------------------------------------------------------
// PlaybackConfig
// ---------------------------------------------------------------------------

/// Settings for capped playback.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Playback is stopped once it has run this many seconds.
    pub cap_secs: u64,
    /// Interval between playback status polls, in milliseconds.
    pub poll_interval_ms: u64,
}

impl PlaybackConfig {
    pub fn cap(&self) -> Duration {
        Duration::from_secs(self.cap_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        // A zero interval would spin; clamp to 1 ms.
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            cap_secs: 120,
            poll_interval_ms: 100,
        }
    }
}

// ---------------------------------------------------------------------------
// OutputConfig
// ---------------------------------------------------------------------------

/// Where audio artifacts are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// File name of the interactive-mode artifact, written next to the PDF.
    pub interactive_file_name: String,
    /// Directory for batch artifacts.  `None` means the directory of the
    /// running executable.
    pub batch_dir: Option<PathBuf>,
}

impl OutputConfig {
    /// Resolved batch output directory.
    pub fn batch_dir(&self) -> PathBuf {
        self.batch_dir
            .clone()
            .unwrap_or_else(AppPaths::executable_dir)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            interactive_file_name: "audiobook.mp3".into(),
            batch_dir: None,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// ```rust,no_run
/// use pdf_audiobook::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
/// assert!(config.batch.pages_per_part > 0);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Speech synthesis settings.
    pub speech: SpeechConfig,
    /// Batch partitioning settings.
    pub batch: BatchConfig,
    /// Playback cap and polling settings.
    pub playback: PlaybackConfig,
    /// Artifact locations.
    pub output: OutputConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Render as pretty TOML (used by `config show`).
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
