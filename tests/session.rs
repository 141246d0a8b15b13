use std::future::Future;
use std::io::Write;
use std::pin::Pin;
use std::sync::Mutex;
use std::time::Duration;

use read_aloud::voice::tts::SpeechResult;
use read_aloud::{
    load_text, run_session, ListenerExit, Outcome, ReadAloudError, SessionOptions, Speaker,
    SpeechEngine,
};
use tempfile::NamedTempFile;
use tokio::sync::mpsc;

/// Records chunk lengths; optionally presses a key while chunk `n` plays.
struct ScriptedEngine {
    lengths: Mutex<Vec<usize>>,
    press: Option<Press>,
}

struct Press {
    during_chunk: usize,
    tx: mpsc::UnboundedSender<u8>,
    key: u8,
}

impl ScriptedEngine {
    fn new() -> Self {
        Self {
            lengths: Mutex::new(Vec::new()),
            press: None,
        }
    }

    fn pressing(tx: mpsc::UnboundedSender<u8>, key: u8) -> Self {
        Self::pressing_during(1, tx, key)
    }

    fn pressing_during(during_chunk: usize, tx: mpsc::UnboundedSender<u8>, key: u8) -> Self {
        Self {
            lengths: Mutex::new(Vec::new()),
            press: Some(Press {
                during_chunk,
                tx,
                key,
            }),
        }
    }

    fn lengths(&self) -> Vec<usize> {
        self.lengths.lock().unwrap().clone()
    }
}

impl SpeechEngine for ScriptedEngine {
    fn speak<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = SpeechResult> + Send + 'a>> {
        Box::pin(async move {
            let nth = {
                let mut lengths = self.lengths.lock().unwrap();
                lengths.push(text.chars().count());
                lengths.len()
            };
            if let Some(press) = &self.press {
                if press.during_chunk == nth {
                    press.tx.send(press.key).unwrap();
                }
            }
            // Give the listener a chance to run while "speaking".
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(())
        })
    }
}

fn text_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn file_of_1200_chars_is_spoken_in_three_chunks() {
    let file = text_file(&"w".repeat(1200));
    let text = load_text(file.path()).await.unwrap();

    let speaker = Speaker::new(ScriptedEngine::new()).with_pause(Duration::ZERO);
    let (_tx, rx) = mpsc::unbounded_channel();
    let report = run_session(&text, &speaker, rx, SessionOptions::default()).await;

    assert_eq!(speaker.engine().lengths(), vec![500, 500, 200]);
    assert_eq!(report.outcome, Outcome::Completed);
    assert_eq!(report.progress.attempted, 3);
}

#[tokio::test]
async fn stop_key_during_first_chunk_stops_after_it() {
    let (tx, rx) = mpsc::unbounded_channel();
    let speaker = Speaker::new(ScriptedEngine::pressing(tx, b'Z'))
        .with_pause(Duration::from_millis(10));

    let report = run_session(&"s".repeat(1200), &speaker, rx, SessionOptions::default()).await;

    assert_eq!(speaker.engine().lengths(), vec![500]);
    assert_eq!(report.listener, ListenerExit::StopKey);
    assert_eq!(report.outcome, Outcome::StoppedByUser);
    assert_eq!(report.outcome.message(), "Reading stopped by user.");
}

#[tokio::test]
async fn stop_key_during_last_chunk_still_reports_user_stop() {
    let (tx, rx) = mpsc::unbounded_channel();
    let speaker = Speaker::new(ScriptedEngine::pressing_during(3, tx, b'z'))
        .with_pause(Duration::from_millis(10));

    let report = run_session(&"s".repeat(1200), &speaker, rx, SessionOptions::default()).await;

    assert_eq!(speaker.engine().lengths(), vec![500, 500, 200]);
    assert!(report.progress.finished());
    assert_eq!(report.listener, ListenerExit::StopKey);
    assert_eq!(report.outcome, Outcome::StoppedByUser);
}

#[tokio::test]
async fn other_keys_do_not_stop_playback() {
    let (tx, rx) = mpsc::unbounded_channel();
    let speaker = Speaker::new(ScriptedEngine::pressing(tx, b'a')).with_pause(Duration::ZERO);

    let report = run_session(&"s".repeat(1001), &speaker, rx, SessionOptions::default()).await;

    assert_eq!(speaker.engine().lengths(), vec![500, 500, 1]);
    assert_eq!(report.outcome, Outcome::Completed);
}

#[tokio::test]
async fn empty_and_missing_files_never_reach_the_speaker() {
    let empty = NamedTempFile::new().unwrap();
    let err = load_text(empty.path()).await.unwrap_err();
    assert!(matches!(err, ReadAloudError::EmptyInput { .. }));
    assert!(err.to_string().contains("empty"));
    assert_eq!(err.exit_code(), 1);

    let dir = tempfile::tempdir().unwrap();
    let err = load_text(&dir.path().join("HD_output.txt")).await.unwrap_err();
    assert!(matches!(err, ReadAloudError::Io { .. }));
    assert!(err.to_string().starts_with("Could not open"));
    assert_eq!(err.exit_code(), 1);
}
