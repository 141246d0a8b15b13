use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::Level;

use read_aloud::{
    load_text, run_session, stdin_bytes, CommandEngine, SessionOptions, Speaker,
    DEFAULT_INPUT_PATH, DEFAULT_STOP_KEY,
};

/// Read a text file aloud with the system speech synthesizer.
#[derive(Debug, Parser)]
#[command(name = "read-aloud", version)]
struct Args {
    /// Text file to read
    #[arg(default_value = DEFAULT_INPUT_PATH)]
    file: PathBuf,

    /// Key that stops playback (case-insensitive)
    #[arg(long, default_value_t = DEFAULT_STOP_KEY, value_parser = parse_stop_key)]
    stop_key: char,

    /// Log debug diagnostics to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn parse_stop_key(s: &str) -> Result<char, String> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_graphic() => Ok(c),
        _ => Err(format!("'{}' is not a single printable ASCII character", s)),
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to install logger")?;
    Ok(())
}

async fn run(args: Args) -> Result<ExitCode> {
    init_logging(args.verbose)?;

    // Loading
    let text = match load_text(&args.file).await {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(ExitCode::from(e.exit_code()));
        }
    };

    // Speaking -> Finished
    let speaker = Speaker::new(CommandEngine::new());
    let options = SessionOptions {
        stop_key: args.stop_key,
    };
    let report = run_session(&text, &speaker, stdin_bytes(), options).await;

    println!("{}", report.outcome.message());
    if report.progress.failed > 0 {
        tracing::warn!(
            "{} of {} chunks could not be spoken",
            report.progress.failed,
            report.progress.total
        );
    }

    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
