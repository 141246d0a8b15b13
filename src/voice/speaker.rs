//! Chunked playback of a text through a [`SpeechEngine`].
//!
//! Cancellation is checked only between chunks. A chunk that has started
//! always plays to the end.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::tts::SpeechEngine;

/// Maximum characters handed to one speech invocation.
pub const CHUNK_SIZE: usize = 500;

/// Gap between chunks so consecutive utterances do not overlap.
pub const CHUNK_PAUSE: Duration = Duration::from_millis(100);

/// Split `text` into consecutive slices of at most `size` characters.
///
/// Slices always end on a `char` boundary; joining them yields `text`.
pub fn chunks(text: &str, size: usize) -> impl Iterator<Item = &str> + '_ {
    let size = size.max(1);
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let end = rest
            .char_indices()
            .nth(size)
            .map(|(idx, _)| idx)
            .unwrap_or(rest.len());
        let (head, tail) = rest.split_at(end);
        rest = tail;
        Some(head)
    })
}

/// Number of chunks `text` splits into.
pub fn chunk_count(text: &str, size: usize) -> usize {
    text.chars().count().div_ceil(size.max(1))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpeakProgress {
    pub total: usize,
    /// Chunks handed to the engine, failed ones included.
    pub attempted: usize,
    pub failed: usize,
}

impl SpeakProgress {
    pub fn finished(&self) -> bool {
        self.attempted == self.total
    }

    /// Chunks whose speech command succeeded.
    pub fn heard(&self) -> usize {
        self.attempted - self.failed
    }
}

pub struct Speaker<E> {
    engine: E,
    chunk_size: usize,
    pause: Duration,
}

impl<E: SpeechEngine> Speaker<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            chunk_size: CHUNK_SIZE,
            pause: CHUNK_PAUSE,
        }
    }

    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size.max(1);
        self
    }

    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Speak every chunk in order until done or `token` is cancelled.
    ///
    /// Engine failures are logged and skipped.
    pub async fn speak_all(&self, text: &str, token: &CancellationToken) -> SpeakProgress {
        let mut progress = SpeakProgress {
            total: chunk_count(text, self.chunk_size),
            ..Default::default()
        };

        for (index, chunk) in chunks(text, self.chunk_size).enumerate() {
            if token.is_cancelled() {
                debug!("Cancelled before chunk {}/{}", index + 1, progress.total);
                break;
            }

            println!("Speaking chunk...");
            if let Err(e) = self.engine.speak(chunk).await {
                warn!("Chunk {}/{} not spoken: {}", index + 1, progress.total, e);
                progress.failed += 1;
            }
            progress.attempted += 1;

            tokio::time::sleep(self.pause).await;
        }

        progress
    }
}
