use std::path::PathBuf;

use anyhow::Context as _;
use url::Url;

use crate::fetcher::Fetcher;
use crate::tts::AudioOutput;

/// Headless audio output: fetches the speech resource from the server and
/// saves it to a file. Playback counts as started once the file is written.
pub struct DownloadOutput {
    fetcher: Fetcher,
    base_url: Url,
    out: PathBuf,
}

impl DownloadOutput {
    pub fn new(fetcher: Fetcher, base_url: Url, out: PathBuf) -> Self {
        Self {
            fetcher,
            base_url,
            out,
        }
    }
}

impl AudioOutput for DownloadOutput {
    async fn play(&self, src: &str) -> anyhow::Result<()> {
        let url = self
            .base_url
            .join(src)
            .with_context(|| format!("resolve {} against {}", src, self.base_url))?;

        let body = self.fetcher.get_audio(url).await?;
        match body.content_type.as_deref() {
            Some(ct) if ct.starts_with("audio/") || ct == "application/octet-stream" => {}
            other => tracing::warn!(content_type = ?other, "speech response is not audio"),
        }

        if let Some(parent) = self.out.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create {}", parent.display()))?;
            }
        }
        std::fs::write(&self.out, &body.bytes)
            .with_context(|| format!("write {}", self.out.display()))?;
        tracing::info!(
            path = %self.out.display(),
            bytes = body.bytes.len(),
            "speech audio saved"
        );
        Ok(())
    }
}
