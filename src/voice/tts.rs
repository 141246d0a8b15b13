use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::error::SpeechError;

pub type SpeechResult = Result<(), SpeechError>;

/// Something that can say a piece of text and tell us when it is done.
pub trait SpeechEngine: Send + Sync {
    fn speak<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = SpeechResult> + Send + 'a>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Other,
}

impl Platform {
    pub const fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Other
        }
    }
}

// Text arrives on stdin as UTF-8 so it is never parsed as PowerShell.
const POWERSHELL_SCRIPT: &str = "[Console]::InputEncoding = [System.Text.Encoding]::UTF8; \
    Add-Type -AssemblyName System.Speech; \
    $speak = New-Object System.Speech.Synthesis.SpeechSynthesizer; \
    $speak.Speak([Console]::In.ReadToEnd())";

/// A fully resolved speech invocation: program, argv, and optional stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechCommand {
    pub program: &'static str,
    pub args: Vec<String>,
    pub stdin: Option<String>,
}

impl SpeechCommand {
    pub fn build(platform: Platform, text: &str) -> Self {
        match platform {
            Platform::Windows => Self {
                program: "powershell",
                args: vec![
                    "-NoProfile".into(),
                    "-NonInteractive".into(),
                    "-Command".into(),
                    POWERSHELL_SCRIPT.into(),
                ],
                stdin: Some(text.to_string()),
            },
            Platform::MacOs => Self {
                program: "say",
                args: vec!["--".into(), text.to_string()],
                stdin: None,
            },
            Platform::Other => Self {
                program: "espeak",
                args: vec!["--".into(), text.to_string()],
                stdin: None,
            },
        }
    }

    /// Run to completion. Blocks the caller's task until the child exits.
    pub async fn run(&self) -> SpeechResult {
        let mut cmd = Command::new(self.program);
        cmd.args(&self.args)
            .stdin(if self.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::null());

        let mut child = cmd.spawn().map_err(|source| SpeechError::Spawn {
            program: self.program.to_string(),
            source,
        })?;

        if let (Some(text), Some(mut pipe)) = (&self.stdin, child.stdin.take()) {
            pipe.write_all(text.as_bytes())
                .await
                .map_err(|source| SpeechError::Stdin {
                    program: self.program.to_string(),
                    source,
                })?;
            // Closing the pipe lets the child see end of input.
            drop(pipe);
        }

        let status = child.wait().await.map_err(|source| SpeechError::Wait {
            program: self.program.to_string(),
            source,
        })?;

        if status.success() {
            Ok(())
        } else {
            Err(SpeechError::Status {
                program: self.program.to_string(),
                status,
            })
        }
    }
}

/// Speaks through the host's command-line TTS utility.
pub struct CommandEngine {
    platform: Platform,
}

impl CommandEngine {
    pub fn new() -> Self {
        Self::for_platform(Platform::current())
    }

    pub fn for_platform(platform: Platform) -> Self {
        Self { platform }
    }
}

impl Default for CommandEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechEngine for CommandEngine {
    fn speak<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = SpeechResult> + Send + 'a>> {
        Box::pin(async move {
            let command = SpeechCommand::build(self.platform, text);
            debug!("Running {} for {} chars", command.program, text.chars().count());
            command.run().await
        })
    }
}
