//! Google Translate TTS engine.
//!
//! [`GoogleTtsSynthesizer`] speaks the same `translate_tts` endpoint the
//! gTTS library uses: every text fragment is a `GET` returning an MP3
//! segment, and the segments are concatenated (MP3 frames are
//! self-delimiting, so byte concatenation plays back as one stream).
//! All connection details come from [`SpeechConfig`].

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::SpeechConfig;
use crate::tts::chunk::chunk_text;
use crate::tts::{AudioArtifact, SpeechSynthesizer, SynthesisError};

/// The endpoint serves browsers; a non-browser agent is often refused.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Calls `{base_url}/translate_tts` once per text fragment.
pub struct GoogleTtsSynthesizer {
    client: reqwest::Client,
    config: SpeechConfig,
}

impl GoogleTtsSynthesizer {
    /// Build a synthesizer from application config.
    ///
    /// The HTTP client carries the per-request timeout from
    /// `config.timeout_secs`.  A default client is used if the builder fails.
    pub fn from_config(config: &SpeechConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/translate_tts", self.config.base_url.trim_end_matches('/'))
    }

    /// Query parameters for fragment `idx` of `total`.
    fn query(fragment: &str, idx: usize, total: usize, language: &str) -> Vec<(&'static str, String)> {
        vec![
            ("ie", "UTF-8".into()),
            ("client", "tw-ob".into()),
            ("tl", language.into()),
            ("q", fragment.into()),
            ("total", total.to_string()),
            ("idx", idx.to_string()),
            ("textlen", fragment.chars().count().to_string()),
        ]
    }

    async fn fetch(
        &self,
        fragment: &str,
        idx: usize,
        total: usize,
        language: &str,
    ) -> Result<Vec<u8>, SynthesisError> {
        let response = self
            .client
            .get(self.endpoint())
            .query(&Self::query(fragment, idx, total, language))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SynthesisError::Status {
                status: status.as_u16(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTtsSynthesizer {
    async fn synthesize(
        &self,
        text: &str,
        output: &Path,
        language: &str,
    ) -> Result<AudioArtifact, SynthesisError> {
        let fragments = chunk_text(text, self.config.max_chunk_chars);
        if fragments.is_empty() {
            return Err(SynthesisError::EmptyText);
        }

        log::debug!(
            "tts: synthesising {} chars in {} request(s), language {language}",
            text.chars().count(),
            fragments.len()
        );

        let mut audio = Vec::new();
        for (idx, fragment) in fragments.iter().enumerate() {
            let segment = self.fetch(fragment, idx, fragments.len(), language).await?;
            audio.extend_from_slice(&segment);
        }

        if audio.is_empty() {
            return Err(SynthesisError::EmptyResponse);
        }

        tokio::fs::write(output, &audio)
            .await
            .map_err(|e| SynthesisError::Write {
                path: output.to_path_buf(),
                reason: e.to_string(),
            })?;

        log::info!("tts: audio saved to {}", output.display());
        Ok(AudioArtifact::new(output, language))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
