use crate::engine::TransferCode;
use crate::http::{ResponseHead, parse_header_block};
use crate::timeline::Timeline;

/// Everything one `perform_fully` produced.
///
/// A failed transfer still yields an outcome: `code` is non-success and the
/// buffers hold whatever arrived before the failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferOutcome {
    pub code: TransferCode,
    /// Raw header bytes of every response in the transfer, status lines included
    pub headers: Vec<u8>,
    pub body: Vec<u8>,
    pub timeline: Timeline,
}

impl TransferOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.code.is_success()
    }

    /// Status line and headers of the final response.
    #[must_use]
    pub fn head(&self) -> ResponseHead {
        parse_header_block(&self.headers)
    }

    /// `(code, headers, body, timeline)`
    #[must_use]
    pub fn into_parts(self) -> (TransferCode, Vec<u8>, Vec<u8>, Timeline) {
        (self.code, self.headers, self.body, self.timeline)
    }
}
