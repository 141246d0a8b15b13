use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Fatal errors that end a session before any speech starts.
#[derive(Debug, Error)]
pub enum ReadAloudError {
    #[error("Could not open {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is empty.", path.display())]
    EmptyInput { path: PathBuf },
}

impl ReadAloudError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            ReadAloudError::Io { .. } | ReadAloudError::EmptyInput { .. } => 1,
        }
    }
}

/// Failure of a single speech invocation. Never fatal to a session.
#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("failed to launch '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write text to '{program}': {source}")]
    Stdin {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed waiting for '{program}': {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' exited with {status}")]
    Status { program: String, status: ExitStatus },
}
