use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only transcript file for one call.
///
/// Created empty when the session starts; committed segments are appended
/// and flushed as they arrive. Partial (unstable) transcript text never
/// touches the file.
pub struct TranscriptSink {
    path: PathBuf,
    file: File,
}

impl TranscriptSink {
    /// Create (or truncate) the transcript file for `call_sid` under `dir`.
    pub fn create(dir: &Path, call_sid: &str) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create transcription dir {}", dir.display()))?;

        let path = dir.join(format!("{}.txt", call_sid));
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .append(false)
            .open(&path)
            .with_context(|| format!("failed to initialize transcript file {}", path.display()))?;

        Ok(Self { path, file })
    }

    /// Append one committed segment and flush it to disk.
    pub fn append(&mut self, text: &str) -> Result<()> {
        self.file
            .write_all(text.as_bytes())
            .and_then(|_| self.file.write_all(b" "))
            .and_then(|_| self.file.flush())
            .and_then(|_| self.file.sync_data())
            .with_context(|| format!("error writing transcript file {}", self.path.display()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
