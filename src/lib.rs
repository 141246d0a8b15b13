pub mod error;
pub mod session;
pub mod system;
pub mod voice;

pub use error::{ReadAloudError, SpeechError};
pub use session::{run_session, Outcome, SessionOptions, SessionReport};
pub use system::files::{load_text, DEFAULT_INPUT_PATH};
pub use system::input::{listen_for_stop, stdin_bytes, ListenerExit, DEFAULT_STOP_KEY};
pub use voice::speaker::{chunks, SpeakProgress, Speaker, CHUNK_SIZE};
pub use voice::tts::{CommandEngine, Platform, SpeechCommand, SpeechEngine};
