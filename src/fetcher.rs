use std::time::Duration;

use anyhow::{Context as _, anyhow};
use bytes::Bytes;
use reqwest::header::{CONTENT_TYPE, HeaderMap, RETRY_AFTER};
use url::Url;

/// A fetched audio resource.
#[derive(Debug, Clone)]
pub struct AudioBody {
    pub bytes: Bytes,
    pub content_type: Option<String>,
}

#[derive(Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    max_attempts: usize,
}

impl Fetcher {
    pub fn new(user_agent: &str, max_attempts: usize) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .context("build reqwest client")?;
        Ok(Self {
            client,
            max_attempts: max_attempts.max(1),
        })
    }

    /// GETs `url`, backing off while the server answers 429 or 503.
    /// The last attempt returns immediately instead of waiting.
    pub async fn get_audio(&self, url: Url) -> anyhow::Result<AudioBody> {
        let mut backoff = Duration::from_millis(250);

        for attempt in 1..=self.max_attempts {
            let resp = self
                .client
                .get(url.clone())
                .send()
                .await
                .with_context(|| format!("GET {}", url))?;

            let status = resp.status();
            let headers = resp.headers().clone();

            if status.is_success() {
                let bytes = resp.bytes().await.context("read response body")?;
                let content_type = headers
                    .get(CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                return Ok(AudioBody {
                    bytes,
                    content_type,
                });
            }

            if status.as_u16() == 429 || status.as_u16() == 503 {
                if attempt == self.max_attempts {
                    tracing::warn!(%status, attempt, "throttled; out of attempts");
                    break;
                }
                let wait = retry_after_duration(&headers).unwrap_or(backoff);
                tracing::warn!(
                    %status,
                    attempt,
                    wait_ms = wait.as_millis(),
                    "throttled; backing off"
                );
                tokio::time::sleep(wait).await;
                backoff = (backoff * 2).min(Duration::from_secs(10));
                continue;
            }

            return Err(anyhow!("GET {} failed with status {}", url, status));
        }

        Err(anyhow!("GET {} failed after retries", url))
    }
}

fn retry_after_duration(headers: &HeaderMap) -> Option<Duration> {
    let v = headers.get(RETRY_AFTER)?;
    let s = v.to_str().ok()?.trim();
    let seconds: u64 = s.parse().ok()?;
    Some(Duration::from_secs(seconds))
}
