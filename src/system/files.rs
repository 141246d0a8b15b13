use std::path::Path;

use tokio::fs;
use tracing::debug;

use crate::error::ReadAloudError;

/// Default input file, resolved against the working directory.
pub const DEFAULT_INPUT_PATH: &str = "HD_output.txt";

/// Read the whole file into memory.
///
/// Invalid UTF-8 is replaced rather than rejected; only a zero-length file
/// counts as empty.
pub async fn load_text(path: &Path) -> Result<String, ReadAloudError> {
    let bytes = fs::read(path).await.map_err(|source| ReadAloudError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if bytes.is_empty() {
        return Err(ReadAloudError::EmptyInput {
            path: path.to_path_buf(),
        });
    }

    debug!("Loaded {} bytes from {}", bytes.len(), path.display());

    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}
