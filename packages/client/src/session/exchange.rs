//! Per-transfer callback state

use super::body::RequestBody;
use crate::engine::{DebugKind, ReadOutcome, TransferHandler};

/// Buffers and body source the engine's callbacks operate on.
///
/// The engine only ever sees this through a `&mut dyn TransferHandler` scoped
/// to one `perform` call.
#[derive(Debug, Default)]
pub(crate) struct Exchange {
    pub(crate) header_bytes: Vec<u8>,
    pub(crate) body_bytes: Vec<u8>,
    pub(crate) body: RequestBody,
}

impl Exchange {
    /// Bytes pulled from the request body so far.
    pub(crate) fn bytes_sent(&self) -> u64 {
        self.body.as_stream().map_or(0, |stream| stream.bytes_sent())
    }

    pub(crate) fn clear(&mut self) {
        self.header_bytes.clear();
        self.body_bytes.clear();
        self.body = RequestBody::None;
    }
}

impl TransferHandler for Exchange {
    fn header(&mut self, chunk: &[u8]) -> usize {
        self.header_bytes.extend_from_slice(chunk);
        chunk.len()
    }

    fn write(&mut self, chunk: &[u8]) -> usize {
        self.body_bytes.extend_from_slice(chunk);
        chunk.len()
    }

    fn read(&mut self, buf: &mut [u8]) -> ReadOutcome {
        match &mut self.body {
            RequestBody::Stream(stream) => stream.fill(buf),
            RequestBody::None => ReadOutcome::Abort,
        }
    }

    fn debug(&mut self, kind: DebugKind, data: &[u8]) {
        match kind {
            DebugKind::Text => tracing::trace!("* {}", String::from_utf8_lossy(data).trim_end()),
            DebugKind::HeaderIn => tracing::trace!("< {}", String::from_utf8_lossy(data).trim_end()),
            DebugKind::HeaderOut => tracing::trace!("> {}", String::from_utf8_lossy(data).trim_end()),
            // Payload bytes are only counted
            _ => tracing::trace!(?kind, len = data.len(), "data"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::BodyStream;

    #[test]
    fn read_without_body_aborts() {
        let mut exchange = Exchange::default();
        let mut buf = [0u8; 16];
        assert_eq!(exchange.read(&mut buf), ReadOutcome::Abort);
        assert_eq!(exchange.read(&mut buf), ReadOutcome::Abort);
    }

    #[test]
    fn chunks_accumulate_in_order() {
        let mut exchange = Exchange::default();
        assert_eq!(exchange.header(b"HTTP/1.1 200 OK\r\n"), 17);
        assert_eq!(exchange.write(b"ab"), 2);
        assert_eq!(exchange.write(b"cd"), 2);
        assert_eq!(exchange.body_bytes, b"abcd");
        assert_eq!(exchange.header_bytes, b"HTTP/1.1 200 OK\r\n");
    }

    #[test]
    fn clear_drops_body_and_buffers() {
        let mut exchange = Exchange {
            body: RequestBody::Stream(BodyStream::from_bytes(&b"x"[..], "text/plain")),
            ..Exchange::default()
        };
        exchange.write(b"data");
        exchange.clear();
        assert!(exchange.body.is_none());
        assert!(exchange.body_bytes.is_empty());
    }
}
