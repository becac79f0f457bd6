use std::path::Path;
use std::time::Duration;

use httpmock::Method::GET;
use httpmock::MockServer;
use page_affordances::{CliArgs, Command, FileStore, KeyValueStore, OutputFormat, ThemeCommand};
use tempfile::tempdir;
use url::Url;

fn mp3_bytes() -> Vec<u8> {
    // ID3 tag header; enough for a client that only stores the bytes.
    vec![b'I', b'D', b'3', 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x0A]
}

async fn run(state: &Path, command: Command) -> anyhow::Result<String> {
    let args = CliArgs {
        state: state.to_path_buf(),
        command,
    };
    let mut out = Vec::new();
    page_affordances::run_to(args, &mut out).await?;
    Ok(String::from_utf8(out).unwrap())
}

#[tokio::test]
async fn theme_toggle_persists_across_runs() {
    let tmp = tempdir().unwrap();
    let state = tmp.path().join("nested/state.json");

    let shown = run(&state, Command::Theme(ThemeCommand::Show)).await.unwrap();
    assert_eq!(shown, "light\n");
    assert!(!state.exists());

    let toggled = run(&state, Command::Theme(ThemeCommand::Toggle)).await.unwrap();
    assert_eq!(toggled, "dark\n");
    let store = FileStore::new(&state);
    assert_eq!(store.get_item("theme").unwrap().as_deref(), Some("dark"));

    let shown = run(&state, Command::Theme(ThemeCommand::Show)).await.unwrap();
    assert_eq!(shown, "dark\n");

    let toggled = run(&state, Command::Theme(ThemeCommand::Toggle)).await.unwrap();
    assert_eq!(toggled, "light\n");
    assert_eq!(store.get_item("theme").unwrap().as_deref(), Some("light"));
}

#[test]
fn file_store_keeps_other_keys() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("state.json");
    std::fs::write(&path, r#"{"theme":"purple","lang":"fr"}"#).unwrap();

    let store = FileStore::new(&path);
    store.set_item("theme", "dark").unwrap();
    assert_eq!(store.get_item("lang").unwrap().as_deref(), Some("fr"));
    assert_eq!(store.get_item("theme").unwrap().as_deref(), Some("dark"));
    assert_eq!(store.get_item("missing").unwrap(), None);
}

#[tokio::test]
async fn unknown_stored_theme_shows_light() {
    let tmp = tempdir().unwrap();
    let state = tmp.path().join("state.json");
    std::fs::write(&state, r#"{"theme":"purple"}"#).unwrap();

    let shown = run(&state, Command::Theme(ThemeCommand::Show)).await.unwrap();
    assert_eq!(shown, "light\n");
}

#[tokio::test]
async fn corrupt_state_file_is_an_error() {
    let tmp = tempdir().unwrap();
    let state = tmp.path().join("state.json");
    std::fs::write(&state, "not json").unwrap();

    let err = run(&state, Command::Theme(ThemeCommand::Toggle))
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("parse state file"));
}

#[tokio::test]
async fn url_prints_locator() {
    let tmp = tempdir().unwrap();
    let out = run(
        &tmp.path().join("state.json"),
        Command::Url {
            text: "hello world".to_string(),
            lang: Some("fr".to_string()),
        },
    )
    .await
    .unwrap();
    assert_eq!(out, "/api/tts?text=hello%20world&lang=fr\n");
}

#[tokio::test]
async fn speak_saves_server_audio() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/tts")
            .query_param("text", "hello world")
            .query_param("lang", "en");
        then.status(200)
            .header("Content-Type", "audio/mpeg")
            .body(mp3_bytes());
    });

    let tmp = tempdir().unwrap();
    let audio = tmp.path().join("out/speech.mp3");
    let printed = run(
        &tmp.path().join("state.json"),
        Command::Speak {
            text: "hello world".to_string(),
            lang: None,
            server: Url::parse(&server.url("/")).unwrap(),
            out: audio.clone(),
            user_agent: "test-agent".to_string(),
            max_attempts: 5,
        },
    )
    .await
    .unwrap();

    mock.assert();
    assert_eq!(printed.trim_end(), audio.display().to_string());
    assert_eq!(std::fs::read(&audio).unwrap(), mp3_bytes());
}

#[tokio::test]
async fn speak_propagates_server_failure() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/tts");
        then.status(500).body("synthesis failed");
    });

    let tmp = tempdir().unwrap();
    let audio = tmp.path().join("speech.mp3");
    let err = run(
        &tmp.path().join("state.json"),
        Command::Speak {
            text: "bonjour".to_string(),
            lang: Some("fr".to_string()),
            server: Url::parse(&server.url("/")).unwrap(),
            out: audio.clone(),
            user_agent: "test-agent".to_string(),
            max_attempts: 5,
        },
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("500"));
    assert!(!audio.exists());
}

#[tokio::test]
async fn languages_lists_catalog() {
    let tmp = tempdir().unwrap();
    let state = tmp.path().join("state.json");

    let text = run(
        &state,
        Command::Languages {
            format: OutputFormat::Text,
        },
    )
    .await
    .unwrap();
    assert!(text.lines().any(|l| l == "en\tEnglish"));
    assert!(text.lines().any(|l| l == "zh-cn\tChinese (Simplified)"));

    let json = run(
        &state,
        Command::Languages {
            format: OutputFormat::Json,
        },
    )
    .await
    .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    let entries = parsed.as_array().unwrap();
    assert_eq!(entries.len(), page_affordances::languages::LANGUAGES.len());
    assert!(
        entries
            .iter()
            .any(|e| e["code"] == "fr" && e["name"] == "French")
    );
}

fn speak(server: &MockServer, out: &Path, max_attempts: usize) -> Command {
    Command::Speak {
        text: "hi".to_string(),
        lang: None,
        server: Url::parse(&server.url("/")).unwrap(),
        out: out.to_path_buf(),
        user_agent: "test-agent".to_string(),
        max_attempts,
    }
}

#[tokio::test]
async fn speak_gives_up_after_repeated_throttling() {
    let server = MockServer::start();
    let throttled = server.mock(|when, then| {
        when.method(GET).path("/api/tts");
        then.status(429).header("Retry-After", "0");
    });

    let tmp = tempdir().unwrap();
    let audio = tmp.path().join("speech.mp3");
    let err = run(&tmp.path().join("state.json"), speak(&server, &audio, 5))
        .await
        .unwrap_err();

    assert_eq!(throttled.hits(), 5);
    assert!(err.to_string().contains("failed after retries"));
    assert!(!audio.exists());
}

#[tokio::test]
async fn speak_does_not_wait_after_last_attempt() {
    let server = MockServer::start();
    let throttled = server.mock(|when, then| {
        when.method(GET).path("/api/tts");
        then.status(503).header("Retry-After", "30");
    });

    let tmp = tempdir().unwrap();
    let audio = tmp.path().join("speech.mp3");
    let result = tokio::time::timeout(
        Duration::from_secs(5),
        run(&tmp.path().join("state.json"), speak(&server, &audio, 1)),
    )
    .await
    .expect("returned without honoring Retry-After on the final attempt");

    assert!(result.unwrap_err().to_string().contains("failed after retries"));
    assert_eq!(throttled.hits(), 1);
}

#[tokio::test]
async fn speak_recovers_once_server_stops_throttling() {
    let server = MockServer::start();
    let unavailable = server.mock(|when, then| {
        when.method(GET).path("/api/tts");
        then.status(503).header("Retry-After", "1");
    });

    let tmp = tempdir().unwrap();
    let audio = tmp.path().join("speech.mp3");
    let state = tmp.path().join("state.json");

    // Swap the 503 for a 200 while the client sleeps out `Retry-After`.
    let recover = async {
        while unavailable.hits_async().await == 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        unavailable.delete_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/tts");
                then.status(200)
                    .header("Content-Type", "audio/mpeg")
                    .body(mp3_bytes());
            })
            .await
    };

    let (result, ok) = tokio::join!(run(&state, speak(&server, &audio, 5)), recover);
    result.unwrap();

    ok.assert_async().await;
    assert_eq!(std::fs::read(&audio).unwrap(), mp3_bytes());
}
