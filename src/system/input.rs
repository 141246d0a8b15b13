use std::io::Read;
use std::thread;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Key that stops playback unless overridden on the command line.
pub const DEFAULT_STOP_KEY: char = 'z';

/// Why the stop listener returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerExit {
    /// The user typed the stop key; the listener cancelled the session.
    StopKey,
    /// Someone else cancelled the session first.
    Cancelled,
    /// Standard input closed before a stop key arrived.
    EndOfInput,
}

/// Forward raw stdin bytes over a channel from a dedicated thread.
///
/// The thread stays parked in `read` until a byte arrives, input closes or
/// the process exits. The channel closes on end of input or read error.
pub fn stdin_bytes() -> mpsc::UnboundedReceiver<u8> {
    let (tx, rx) = mpsc::unbounded_channel();

    thread::spawn(move || {
        let stdin = std::io::stdin();
        let mut lock = stdin.lock();
        let mut buf = [0u8; 1];
        loop {
            match lock.read(&mut buf) {
                Ok(0) => break,
                Ok(_) => {
                    if tx.send(buf[0]).is_err() {
                        break;
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    debug!("stdin read failed: {}", e);
                    break;
                }
            }
        }
    });

    rx
}

fn is_stop_key(byte: u8, stop_key: char) -> bool {
    (byte as char).eq_ignore_ascii_case(&stop_key)
}

/// Wait for the stop key, cancellation, or end of input.
///
/// `stop_key` is matched case-insensitively against single bytes, so it must
/// be ASCII.
pub async fn listen_for_stop(
    mut keys: mpsc::UnboundedReceiver<u8>,
    token: CancellationToken,
    stop_key: char,
) -> ListenerExit {
    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => return ListenerExit::Cancelled,
            key = keys.recv() => match key {
                None => {
                    debug!("stdin closed, stop listener exiting");
                    return ListenerExit::EndOfInput;
                }
                Some(byte) if is_stop_key(byte, stop_key) => {
                    token.cancel();
                    println!("\n'{}' pressed. Stopping...", stop_key);
                    return ListenerExit::StopKey;
                }
                Some(_) => {}
            },
        }
    }
}
