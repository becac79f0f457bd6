pub mod clipboard;
pub mod document;
pub mod languages;
pub mod menu;
pub mod storage;
pub mod theme;
pub mod tts;

#[cfg(not(target_arch = "wasm32"))]
mod cli;
#[cfg(not(target_arch = "wasm32"))]
mod download;
#[cfg(not(target_arch = "wasm32"))]
mod fetcher;
#[cfg(target_arch = "wasm32")]
mod web;

pub use clipboard::{Clipboard, LocalTask, copy_to_clipboard};
pub use document::{ClassList, Document, HeadlessDocument, HeadlessElement};
pub use menu::toggle_menu;
pub use storage::{KeyValueStore, MemoryStore};
pub use theme::{Theme, init_theme, toggle_theme};
pub use tts::{AudioOutput, SpeechRequest, play_text, speech_url};

#[cfg(not(target_arch = "wasm32"))]
pub use native::*;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::io::Write;

    use anyhow::Context as _;

    pub use crate::cli::{Args as CliArgs, Command, OutputFormat, ThemeCommand};
    pub use crate::download::DownloadOutput;
    pub use crate::fetcher::Fetcher;
    pub use crate::storage::FileStore;

    use crate::document::HeadlessDocument;
    use crate::{languages, theme, tts};

    pub async fn run(args: CliArgs) -> anyhow::Result<()> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        run_to(args, &mut out).await
    }

    /// Runs a command, writing its report to `out`.
    pub async fn run_to<W: Write>(args: CliArgs, out: &mut W) -> anyhow::Result<()> {
        let store = FileStore::new(&args.state);

        match args.command {
            Command::Theme(cmd) => {
                let page = HeadlessDocument::new();
                theme::init_theme(&page, &store)?;
                let shown = match cmd {
                    ThemeCommand::Show => theme::current_theme(&page)?,
                    ThemeCommand::Toggle => theme::toggle_theme(&page, &store)?,
                };
                writeln!(out, "{shown}").context("write output")?;
            }
            Command::Url { text, lang } => {
                writeln!(out, "{}", tts::speech_url(&text, lang.as_deref()))
                    .context("write output")?;
            }
            Command::Speak {
                text,
                lang,
                server,
                out: audio_path,
                user_agent,
                max_attempts,
            } => {
                let fetcher = Fetcher::new(&user_agent, max_attempts)?;
                let output = DownloadOutput::new(fetcher, server, audio_path.clone());
                tts::play_text(&output, &text, lang.as_deref()).await?;
                writeln!(out, "{}", audio_path.display()).context("write output")?;
            }
            Command::Languages { format } => match format {
                OutputFormat::Text => {
                    for lang in languages::LANGUAGES {
                        writeln!(out, "{}\t{}", lang.code, lang.name).context("write output")?;
                    }
                }
                OutputFormat::Json => {
                    serde_json::to_writer_pretty(&mut *out, languages::LANGUAGES)
                        .context("serialize languages")?;
                    writeln!(out).context("write output")?;
                }
            },
        }
        Ok(())
    }
}
