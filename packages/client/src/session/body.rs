//! Outgoing request bodies

use std::fmt;
use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::PathBuf;

use bytes::Bytes;

use crate::engine::ReadOutcome;

/// Body mode of the next transfer.
///
/// `None` puts the handle in GET mode; `Stream` puts it in upload mode.
#[derive(Debug, Default)]
pub enum RequestBody {
    #[default]
    None,
    Stream(BodyStream),
}

impl RequestBody {
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, RequestBody::None)
    }

    #[must_use]
    pub fn as_stream(&self) -> Option<&BodyStream> {
        match self {
            RequestBody::Stream(stream) => Some(stream),
            RequestBody::None => None,
        }
    }
}

enum Source {
    Reader(Box<dyn Read + Send>),
    File(PathBuf),
}

enum StreamState {
    Pending(Source),
    Open(Box<dyn Read + Send>),
    Finished,
}

/// A request body pulled by the engine in chunks.
///
/// The source is opened on the first pull and dropped as soon as it yields
/// fewer bytes than requested.
pub struct BodyStream {
    state: StreamState,
    content_type: String,
    content_length: u64,
    sent: u64,
}

impl fmt::Debug for BodyStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.state {
            StreamState::Pending(_) => "pending",
            StreamState::Open(_) => "open",
            StreamState::Finished => "finished",
        };
        f.debug_struct("BodyStream")
            .field("state", &state)
            .field("content_type", &self.content_type)
            .field("content_length", &self.content_length)
            .field("sent", &self.sent)
            .finish()
    }
}

impl BodyStream {
    /// A body read from `reader`, declared as `content_length` bytes.
    pub fn new<R>(reader: R, content_type: impl Into<String>, content_length: u64) -> Self
    where
        R: Read + Send + 'static,
    {
        Self::with_source(
            Source::Reader(Box::new(reader)),
            content_type.into(),
            content_length,
        )
    }

    /// A body held in memory.
    pub fn from_bytes(bytes: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        let bytes = bytes.into();
        let length = bytes.len() as u64;
        Self::new(Cursor::new(bytes), content_type, length)
    }

    /// A body read from the file at `path`; its length comes from the file's
    /// metadata, the file itself is opened on the first pull.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the metadata cannot be read or `path` is not a
    /// regular file.
    pub fn from_file(path: impl Into<PathBuf>, content_type: impl Into<String>) -> io::Result<Self> {
        let path = path.into();
        let metadata = std::fs::metadata(&path)?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", path.display()),
            ));
        }
        Ok(Self::with_source(
            Source::File(path),
            content_type.into(),
            metadata.len(),
        ))
    }

    fn with_source(source: Source, content_type: String, content_length: u64) -> Self {
        Self {
            state: StreamState::Pending(source),
            content_type,
            content_length,
            sent: 0,
        }
    }

    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    #[must_use]
    pub fn content_length(&self) -> u64 {
        self.content_length
    }

    /// Bytes handed to the engine so far.
    #[must_use]
    pub fn bytes_sent(&self) -> u64 {
        self.sent
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self.state, StreamState::Finished)
    }

    /// Fill `buf` from the source. A count below `buf.len()` marks the end of
    /// the body; later calls return `Data(0)`.
    pub(crate) fn fill(&mut self, buf: &mut [u8]) -> ReadOutcome {
        if let StreamState::Pending(_) = self.state {
            if let Err(outcome) = self.open() {
                return outcome;
            }
        }
        let StreamState::Open(reader) = &mut self.state else {
            return ReadOutcome::Data(0);
        };

        let mut filled = 0;
        while filled < buf.len() {
            match reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    tracing::warn!("request body read failed after {} bytes: {e}", self.sent);
                    self.state = StreamState::Finished;
                    return ReadOutcome::Abort;
                }
            }
        }

        self.sent += filled as u64;
        if filled < buf.len() {
            tracing::trace!(sent = self.sent, "request body exhausted, closing source");
            self.state = StreamState::Finished;
        }
        ReadOutcome::Data(filled)
    }

    fn open(&mut self) -> Result<(), ReadOutcome> {
        let state = std::mem::replace(&mut self.state, StreamState::Finished);
        let StreamState::Pending(source) = state else {
            self.state = state;
            return Ok(());
        };
        let reader: Box<dyn Read + Send> = match source {
            Source::Reader(reader) => {
                tracing::trace!(length = self.content_length, "opening request body stream");
                reader
            }
            Source::File(path) => {
                tracing::trace!(path = %path.display(), "opening request body file");
                match File::open(&path) {
                    Ok(file) => Box::new(file),
                    Err(e) => {
                        tracing::warn!("cannot open request body {}: {e}", path.display());
                        return Err(ReadOutcome::Abort);
                    }
                }
            }
        };
        self.state = StreamState::Open(reader);
        Ok(())
    }
}
