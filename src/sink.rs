//! Record sink
//!
//! Appends records to an append-only CSV store. Whether the header row is
//! needed is re-derived from the store's first row on every append.
//!
//! If the first row cannot be read or parsed, a header is written. A file
//! that exists but is empty therefore gets its header. A non-empty file whose
//! first row is not the header gets a misplaced header appended, at most once
//! per sink: a sink remembers that it already wrote one and the rest of the
//! file is never inspected. There is no locking: concurrent writers are not
//! supported.

use crate::error::SinkError;
use crate::record::{Record, CSV_HEADERS};
use csv::{QuoteStyle, ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Default CSV store file name
pub const DEFAULT_CSV_PATH: &str = "heritage_import.csv";

/// Destination for extracted records
pub trait RecordSink {
    /// Append one record, writing the header first if the store lacks it.
    fn append(&mut self, record: &Record) -> Result<(), SinkError>;
}

/// Whether the first CSV row read from `reader` is exactly the header tuple.
/// Read or parse failures count as "no header".
pub fn first_row_is_header<R: Read>(reader: R) -> bool {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut row = StringRecord::new();
    match rdr.read_record(&mut row) {
        Ok(true) => row.iter().eq(CSV_HEADERS.iter().copied()),
        Ok(false) => false,
        Err(e) => {
            debug!("Unreadable first row, treating store as headerless: {}", e);
            false
        }
    }
}

/// Write an optional header and one record, every field quoted.
pub fn write_row<W: Write>(writer: W, with_header: bool, record: &Record) -> Result<(), SinkError> {
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::CRLF)
        .from_writer(writer);
    if with_header {
        wtr.write_record(CSV_HEADERS)?;
    }
    wtr.serialize(record)?;
    wtr.flush()?;
    Ok(())
}

/// CSV store backed by a file on disk
#[derive(Debug, Clone)]
pub struct CsvFileSink {
    path: PathBuf,
    wrote_header: bool,
}

impl CsvFileSink {
    /// Create a sink for `path`. The file is created on first append.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            wrote_header: false,
        }
    }

    /// Location of the store
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the next append must write the header row
    pub fn needs_header(&self) -> bool {
        if !self.path.exists() {
            return true;
        }
        let has_header = match File::open(&self.path) {
            Ok(file) => first_row_is_header(file),
            Err(e) => {
                debug!("Could not open {} for header check: {}", self.path.display(), e);
                false
            }
        };
        if has_header {
            return false;
        }
        let empty = fs::metadata(&self.path).map(|m| m.len() == 0).unwrap_or(true);
        empty || !self.wrote_header
    }
}

impl Default for CsvFileSink {
    fn default() -> Self {
        Self::new(DEFAULT_CSV_PATH)
    }
}

impl RecordSink for CsvFileSink {
    #[instrument(skip(self, record), fields(path = %self.path.display()))]
    fn append(&mut self, record: &Record) -> Result<(), SinkError> {
        let with_header = self.needs_header();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        write_row(file, with_header, record)?;
        self.wrote_header |= with_header;
        debug!(with_header, "Appended record '{}'", record.title);
        Ok(())
    }
}

/// In-memory CSV store following the same header protocol
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    buffer: Vec<u8>,
    wrote_header: bool,
}

impl MemorySink {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with existing content
    pub fn with_contents<B: Into<Vec<u8>>>(contents: B) -> Self {
        Self {
            buffer: contents.into(),
            wrote_header: false,
        }
    }

    /// Raw CSV bytes written so far
    pub fn contents(&self) -> &[u8] {
        &self.buffer
    }

    /// Contents decoded as UTF-8
    pub fn to_text(&self) -> String {
        String::from_utf8_lossy(&self.buffer).into_owned()
    }
}

impl RecordSink for MemorySink {
    fn append(&mut self, record: &Record) -> Result<(), SinkError> {
        let with_header = !first_row_is_header(self.buffer.as_slice())
            && (self.buffer.is_empty() || !self.wrote_header);
        write_row(&mut self.buffer, with_header, record)?;
        self.wrote_header |= with_header;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str) -> Record {
        Record {
            title: title.to_string(),
            content: "גוף הטקסט, עם פסיק".to_string(),
            author: "Wikipedia contributors".to_string(),
            category: "PastBattles".to_string(),
        }
    }

    #[test]
    fn test_every_field_quoted() {
        let mut buf = Vec::new();
        write_row(&mut buf, true, &record("A")).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "\"title\",\"content\",\"author\",\"category\"\r\n\
             \"A\",\"גוף הטקסט, עם פסיק\",\"Wikipedia contributors\",\"PastBattles\"\r\n"
        );
    }

    #[test]
    fn test_memory_sink_writes_header_once() {
        let mut sink = MemorySink::new();
        sink.append(&record("A")).unwrap();
        sink.append(&record("B")).unwrap();
        let text = sink.to_text();
        assert_eq!(text.matches("\"title\",\"content\"").count(), 1);
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn test_headerless_store_gets_header_once() {
        let mut sink = MemorySink::with_contents("\"X\",\"Y\",\"Z\",\"W\"\r\n");
        sink.append(&record("A")).unwrap();
        sink.append(&record("B")).unwrap();
        let lines: Vec<_> = sink.to_text().lines().map(str::to_string).collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("\"title\""));
        assert!(lines[3].starts_with("\"B\""));
    }

    #[test]
    fn test_unquoted_header_is_recognised() {
        assert!(first_row_is_header("title,content,author,category\n".as_bytes()));
        assert!(!first_row_is_header("".as_bytes()));
        assert!(!first_row_is_header("title,content\n".as_bytes()));
    }

    #[test]
    fn test_invalid_utf8_counts_as_headerless() {
        assert!(!first_row_is_header(&[0xff, 0xfe, b',', b'\n'][..]));
    }
}
