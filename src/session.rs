//! One playback session: speak a loaded text while listening for the stop key.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::system::input::{listen_for_stop, ListenerExit, DEFAULT_STOP_KEY};
use crate::voice::speaker::{SpeakProgress, Speaker};
use crate::voice::tts::SpeechEngine;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    StoppedByUser,
}

impl Outcome {
    pub fn message(&self) -> &'static str {
        match self {
            Outcome::Completed => "Done reading.",
            Outcome::StoppedByUser => "Reading stopped by user.",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    pub stop_key: char,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            stop_key: DEFAULT_STOP_KEY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionReport {
    pub outcome: Outcome,
    pub progress: SpeakProgress,
    pub listener: ListenerExit,
}

/// Speak `text` until done or until the stop key arrives on `keys`.
///
/// Always waits for the listener task before returning.
pub async fn run_session<E: SpeechEngine>(
    text: &str,
    speaker: &Speaker<E>,
    keys: mpsc::UnboundedReceiver<u8>,
    options: SessionOptions,
) -> SessionReport {
    let token = CancellationToken::new();

    println!(
        "Reading text aloud... (Press '{}' to stop)",
        options.stop_key
    );

    let listener = tokio::spawn(listen_for_stop(keys, token.clone(), options.stop_key));

    let progress = speaker.speak_all(text, &token).await;
    debug!(
        "Speaker finished: {}/{} chunks, {} failed",
        progress.attempted, progress.total, progress.failed
    );

    token.cancel();
    let listener = match listener.await {
        Ok(exit) => exit,
        Err(e) => {
            warn!("Stop listener task failed: {}", e);
            ListenerExit::Cancelled
        }
    };

    let outcome = if listener == ListenerExit::StopKey {
        Outcome::StoppedByUser
    } else {
        Outcome::Completed
    };

    SessionReport {
        outcome,
        progress,
        listener,
    }
}
