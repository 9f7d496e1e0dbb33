use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::SinkError;

/// File-backed destination for one transfer.
///
/// The wire-supplied `name` is joined to the output directory as-is: the
/// protocol carries no name sanitization, so the receiver trusts the
/// sender (a name pointing into a directory that does not exist simply
/// fails to open). Partial output is left in place when a transfer
/// aborts; there is no cleanup policy.
pub struct FileSink {
    file: Option<File>,
    path: PathBuf,
    bytes_written: u64,
}

impl FileSink {
    /// Creates (or truncates) the destination file for `name` under `dir`.
    pub fn create(dir: &Path, name: &str) -> Result<Self, SinkError> {
        let path = dir.join(name);
        let file = File::create(&path).map_err(|source| SinkError::Create {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "sink opened");

        Ok(Self {
            file: Some(file),
            path,
            bytes_written: 0,
        })
    }

    /// Appends one payload chunk.
    pub fn write(&mut self, chunk: &[u8]) -> Result<(), SinkError> {
        let Some(file) = self.file.as_mut() else {
            return Err(SinkError::Closed {
                path: self.path.clone(),
            });
        };

        if let Err(source) = file.write_all(chunk) {
            return Err(SinkError::Io {
                path: self.path.clone(),
                source,
            });
        }
        self.bytes_written += chunk.len() as u64;
        Ok(())
    }

    /// Flushes and releases the file handle.
    ///
    /// Idempotent: later calls are no-ops. Also runs on drop, so the
    /// handle is released on every exit path, success or failure.
    pub fn close(&mut self) -> Result<(), SinkError> {
        if let Some(mut file) = self.file.take() {
            if let Err(source) = file.flush() {
                return Err(SinkError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
            debug!(path = %self.path.display(), bytes = self.bytes_written, "sink closed");
        }
        Ok(())
    }

    /// Destination path of this sink.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Payload bytes written so far.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        // Errors here have nowhere to go.
        let _ = self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_and_close() {
        let dir = TempDir::new().unwrap();
        let mut sink = FileSink::create(dir.path(), "out.bin").unwrap();

        sink.write(b"HELLO").unwrap();
        sink.write(b"HELLO").unwrap();
        assert_eq!(sink.bytes_written(), 10);
        sink.close().unwrap();

        let content = std::fs::read(dir.path().join("out.bin")).unwrap();
        assert_eq!(&content, b"HELLOHELLO");
    }

    #[test]
    fn close_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let mut sink = FileSink::create(dir.path(), "out.bin").unwrap();

        sink.close().unwrap();
        sink.close().unwrap();
    }

    #[test]
    fn write_after_close_errors() {
        let dir = TempDir::new().unwrap();
        let mut sink = FileSink::create(dir.path(), "out.bin").unwrap();
        sink.close().unwrap();

        let result = sink.write(b"late");

        assert!(matches!(result, Err(SinkError::Closed { .. })));
    }

    #[test]
    fn create_fails_for_missing_directory() {
        let dir = TempDir::new().unwrap();

        let result = FileSink::create(dir.path(), "no/such/dir/out.bin");

        assert!(matches!(result, Err(SinkError::Create { .. })));
    }

    #[test]
    fn drop_releases_the_file() {
        let dir = TempDir::new().unwrap();
        {
            let mut sink = FileSink::create(dir.path(), "dropped.bin").unwrap();
            sink.write(b"partial").unwrap();
            // Dropped without close(), as on an aborted transfer.
        }

        // Partial output stays in place.
        let content = std::fs::read(dir.path().join("dropped.bin")).unwrap();
        assert_eq!(&content, b"partial");
    }

    #[test]
    fn truncates_existing_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("out.bin"), b"previous contents").unwrap();

        let mut sink = FileSink::create(dir.path(), "out.bin").unwrap();
        sink.write(b"new").unwrap();
        sink.close().unwrap();

        let content = std::fs::read(dir.path().join("out.bin")).unwrap();
        assert_eq!(&content, b"new");
    }
}
