//! Text-to-speech playback trigger.
//!
//! Speech is synthesized by the server; this side only builds the request
//! locator and asks an [`AudioOutput`] to start playing it.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::languages;

/// Server path serving synthesized speech.
pub const TTS_ENDPOINT: &str = "/api/tts";

pub const DEFAULT_LANG: &str = "en";

/// Characters left as-is by URI component encoding: `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Something that can start playing an audio resource.
#[allow(async_fn_in_trait)]
pub trait AudioOutput {
    /// Resolves once playback has started, not when it finishes.
    async fn play(&self, src: &str) -> anyhow::Result<()>;
}

impl<A: AudioOutput> AudioOutput for &A {
    async fn play(&self, src: &str) -> anyhow::Result<()> {
        (**self).play(src).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechRequest {
    pub text: String,
    pub lang: String,
}

impl SpeechRequest {
    /// An empty or missing `lang` falls back to [`DEFAULT_LANG`].
    pub fn new(text: impl Into<String>, lang: Option<&str>) -> Self {
        let lang = match lang {
            Some(l) if !l.is_empty() => l,
            _ => DEFAULT_LANG,
        };
        Self {
            text: text.into(),
            lang: lang.to_string(),
        }
    }

    /// Relative locator of the synthesized audio, e.g. `/api/tts?text=hello%20world&lang=fr`.
    pub fn locator(&self) -> String {
        format!(
            "{}?text={}&lang={}",
            TTS_ENDPOINT,
            encode_component(&self.text),
            encode_component(&self.lang)
        )
    }
}

pub fn speech_url(text: &str, lang: Option<&str>) -> String {
    SpeechRequest::new(text, lang).locator()
}

/// Builds the locator for `text` and starts playing it.
///
/// Playback errors are returned as-is. Nothing tracks earlier calls, so
/// overlapping playbacks are independent.
pub async fn play_text<A>(output: &A, text: &str, lang: Option<&str>) -> anyhow::Result<()>
where
    A: AudioOutput,
{
    let request = SpeechRequest::new(text, lang);
    if languages::language_name(&request.lang).is_none() {
        tracing::warn!(lang = %request.lang, "language not in catalog; sending anyway");
    }
    let src = request.locator();
    tracing::debug!(%src, "starting speech playback");
    output.play(&src).await
}

fn encode_component(s: &str) -> String {
    utf8_percent_encode(s, URI_COMPONENT).to_string()
}
