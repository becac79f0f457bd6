use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use url::Url;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// One `code<TAB>name` line per language.
    Text,
    /// A JSON array of `{code, name}` objects.
    Json,
}

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ThemeCommand {
    /// Print the theme applied at load.
    Show,
    /// Switch between dark and light and persist the choice.
    Toggle,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Inspect or toggle the persisted dark/light theme.
    #[command(subcommand)]
    Theme(ThemeCommand),

    /// Print the speech locator for a text.
    Url {
        text: String,

        /// Language code (defaults to `en`).
        #[arg(long)]
        lang: Option<String>,
    },

    /// Fetch synthesized speech for a text from a TTS server.
    Speak {
        text: String,

        /// Language code (defaults to `en`).
        #[arg(long)]
        lang: Option<String>,

        /// Base URL of the TTS server (e.g. `http://127.0.0.1:5000`).
        #[arg(long)]
        server: Url,

        /// Where to save the audio.
        #[arg(long, default_value = "speech.mp3")]
        out: PathBuf,

        /// HTTP User-Agent used for the speech request.
        #[arg(long, default_value = "page-affordances/0.1")]
        user_agent: String,

        /// Requests made while the server answers 429/503 before giving up.
        #[arg(long, default_value_t = 5)]
        max_attempts: usize,
    },

    /// List the languages the TTS server accepts.
    Languages {
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// JSON file backing durable storage (the `theme` preference).
    #[arg(long, global = true, default_value = "page-state.json")]
    pub state: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}
