//! Document sinks.
//!
//! A sink receives one finished document through `open`, one or more
//! `write` calls and a closing `finalize`. Exporters never talk to a sink
//! directly; [`crate::export`] renders into memory first and only then
//! drives the sink, so a sink never sees a partial document.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{ExportError, Result};

/// What is about to be delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentInfo {
    /// Suggested file name, extension included.
    pub file_name: String,
    /// MIME type.
    pub media_type: &'static str,
    /// Size of the complete document in bytes.
    pub len: usize,
}

/// Destination of an exported document.
pub trait DocumentSink {
    /// Prepare to receive a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination cannot be opened.
    fn open(&mut self, info: &DocumentInfo) -> Result<()>;

    /// Append bytes to the open document.
    ///
    /// # Errors
    ///
    /// Returns an error if called before `open` or the write fails.
    fn write(&mut self, bytes: &[u8]) -> Result<()>;

    /// Complete the document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be flushed or closed.
    fn finalize(&mut self) -> Result<()>;
}

impl<S: DocumentSink + ?Sized> DocumentSink for &mut S {
    fn open(&mut self, info: &DocumentInfo) -> Result<()> {
        (**self).open(info)
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write(bytes)
    }

    fn finalize(&mut self) -> Result<()> {
        (**self).finalize()
    }
}

fn not_open() -> ExportError {
    ExportError::Sink("write before open".to_string())
}

/// Writes the document to a file, creating parent directories.
///
/// The path is used as given; the suggested file name is ignored.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl FileSink {
    /// Sink writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: None,
        }
    }

    /// Target path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentSink for FileSink {
    fn open(&mut self, _info: &DocumentInfo) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        self.writer = Some(BufWriter::new(File::create(&self.path)?));
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        let writer = self.writer.as_mut().ok_or_else(not_open)?;
        writer.write_all(bytes)?;
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        let mut writer = self.writer.take().ok_or_else(not_open)?;
        writer.flush()?;
        Ok(())
    }
}

/// Keeps the document in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    info: Option<DocumentInfo>,
    bytes: Vec<u8>,
    finalized: bool,
}

impl MemorySink {
    /// Empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Info passed to `open`.
    #[must_use]
    pub const fn info(&self) -> Option<&DocumentInfo> {
        self.info.as_ref()
    }

    /// Bytes received so far.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Whether `finalize` has been called.
    #[must_use]
    pub const fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Take the received bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl DocumentSink for MemorySink {
    fn open(&mut self, info: &DocumentInfo) -> Result<()> {
        self.info = Some(info.clone());
        self.bytes.clear();
        self.bytes.reserve(info.len);
        self.finalized = false;
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        if self.info.is_none() {
            return Err(not_open());
        }
        self.bytes.extend_from_slice(bytes);
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        if self.info.is_none() {
            return Err(not_open());
        }
        self.finalized = true;
        Ok(())
    }
}

/// Forwards the document to any writer, such as stdout.
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    inner: W,
}

impl<W: Write> WriterSink<W> {
    /// Wrap a writer.
    pub const fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Unwrap the writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> DocumentSink for WriterSink<W> {
    fn open(&mut self, _info: &DocumentInfo) -> Result<()> {
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.inner.write_all(bytes)?;
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> DocumentInfo {
        DocumentInfo {
            file_name: "kardex.csv".to_string(),
            media_type: "text/csv",
            len: 5,
        }
    }

    #[test]
    fn test_memory_sink_protocol() {
        let mut sink = MemorySink::new();
        assert!(sink.write(b"early").is_err());

        sink.open(&info()).unwrap();
        sink.write(b"ab").unwrap();
        sink.write(b"cde").unwrap();
        assert!(!sink.is_finalized());
        sink.finalize().unwrap();

        assert!(sink.is_finalized());
        assert_eq!(sink.info().unwrap().file_name, "kardex.csv");
        assert_eq!(sink.into_bytes(), b"abcde");
    }

    #[test]
    fn test_writer_sink() {
        let mut sink = WriterSink::new(Vec::new());
        sink.open(&info()).unwrap();
        sink.write(b"hello").unwrap();
        sink.finalize().unwrap();
        assert_eq!(sink.into_inner(), b"hello");
    }

    #[test]
    fn test_file_sink_requires_open() {
        let mut sink = FileSink::new("unused.csv");
        assert!(matches!(sink.write(b"x"), Err(ExportError::Sink(_))));
        assert!(matches!(sink.finalize(), Err(ExportError::Sink(_))));
    }
}
