//! Per-connection transfer state.
//!
//! One [`ActiveTransfer`] exists per accepted connection: it owns the
//! protocol parser and the storage sink, and is discarded once the
//! transfer completes or fails. The next connection starts from a fresh
//! state machine, unaffected by anything that happened before.

use std::path::{Path, PathBuf};

use tracing::debug;

use dropslot_protocol::{ParseEvent, Phase, TransferParser};
use dropslot_transfer::FileSink;

use crate::ReceiveError;
use crate::observer::Observer;

/// Outcome of a completed transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferSummary {
    /// File name as declared on the wire.
    pub file_name: String,
    /// Payload bytes written to disk.
    pub payload_bytes: u64,
    /// Destination path.
    pub path: PathBuf,
}

/// State for the one in-flight transfer.
pub struct ActiveTransfer<'a, O: Observer> {
    parser: TransferParser,
    sink: Option<FileSink>,
    file_name: Option<String>,
    output_dir: &'a Path,
    observer: &'a O,
}

impl<'a, O: Observer> ActiveTransfer<'a, O> {
    pub fn new(output_dir: &'a Path, observer: &'a O) -> Self {
        Self {
            parser: TransferParser::new(),
            sink: None,
            file_name: None,
            output_dir,
            observer,
        }
    }

    /// Current protocol phase.
    pub fn phase(&self) -> Phase {
        self.parser.phase()
    }

    /// Whether a destination file is currently open.
    pub fn sink_open(&self) -> bool {
        self.sink.is_some()
    }

    /// Feeds one drained chunk through the state machine.
    ///
    /// Returns the summary once the final payload byte is on disk, `None`
    /// while the transfer is still in flight. On error the sink (if open)
    /// is closed and the partial file is left in place.
    pub fn accept_bytes(
        &mut self,
        chunk: &[u8],
    ) -> Result<Option<TransferSummary>, ReceiveError> {
        match self.process(chunk) {
            Ok(summary) => Ok(summary),
            Err(e) => {
                if let Some(mut sink) = self.sink.take() {
                    let _ = sink.close();
                }
                Err(e)
            }
        }
    }

    fn process(&mut self, chunk: &[u8]) -> Result<Option<TransferSummary>, ReceiveError> {
        for event in self.parser.feed(chunk)? {
            match event {
                ParseEvent::Header(header) => {
                    debug!(
                        payload_bytes = header.total_payload_bytes,
                        name_len = header.file_name_len,
                        "header received"
                    );
                    self.observer.on_progress(0, header.total_payload_bytes);
                }

                ParseEvent::FileName(name) => {
                    self.observer.on_status(&format!("receiving {name}"));
                    self.sink = Some(FileSink::create(self.output_dir, &name)?);
                    self.file_name = Some(name);
                }

                ParseEvent::Payload(data) => {
                    // The parser only emits payload after the file name,
                    // so the sink is open here.
                    let Some(sink) = self.sink.as_mut() else {
                        continue;
                    };
                    sink.write(&data)?;
                    if let Some(header) = self.parser.header() {
                        self.observer.on_progress(
                            self.parser.payload_received(),
                            header.total_payload_bytes,
                        );
                    }
                }

                ParseEvent::Complete => {
                    let Some(mut sink) = self.sink.take() else {
                        continue;
                    };
                    let summary = TransferSummary {
                        file_name: self.file_name.take().unwrap_or_default(),
                        payload_bytes: sink.bytes_written(),
                        path: sink.path().to_path_buf(),
                    };
                    sink.close()?;
                    return Ok(Some(summary));
                }
            }
        }
        Ok(None)
    }
}
