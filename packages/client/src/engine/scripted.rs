//! In-process engine that replays scripted responses
//!
//! `ScriptedEngine` drives the same callback roles as the libcurl backend but
//! never touches the network: each `perform` pops the next
//! [`ScriptedResponse`] and feeds it through the handler, after draining the
//! request body when upload mode is on. Every transfer leaves a
//! [`TransferRecord`] behind for inspection.

use std::collections::{BTreeMap, VecDeque};

use super::opt::{Info, Opt, OptValue, ValueKind};
use super::{DebugKind, ReadOutcome, TransferCode, TransferEngine, TransferHandler, check_kind};
use crate::error::{self, Result};
use crate::timeline::TimingSamples;

const DEFAULT_CHUNK: usize = 16 * 1024;

/// A canned response for one transfer.
#[derive(Debug, Clone)]
pub struct ScriptedResponse {
    status: u16,
    reason: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
    chunk_size: usize,
    samples: TimingSamples,
    failure: Option<TransferCode>,
    new_connections: i64,
}

impl Default for ScriptedResponse {
    fn default() -> Self {
        Self::ok()
    }
}

impl ScriptedResponse {
    /// `200 OK` with no headers and an empty body.
    #[must_use]
    pub fn ok() -> Self {
        Self {
            status: 200,
            reason: "OK".to_string(),
            headers: Vec::new(),
            body: Vec::new(),
            chunk_size: DEFAULT_CHUNK,
            samples: TimingSamples::default(),
            failure: None,
            new_connections: 1,
        }
    }

    /// A transfer that fails with `code` before any byte is delivered.
    #[must_use]
    pub fn failure(code: TransferCode) -> Self {
        Self {
            status: 0,
            reason: String::new(),
            failure: Some(code),
            new_connections: 0,
            ..Self::ok()
        }
    }

    #[must_use]
    pub fn status(mut self, status: u16, reason: impl Into<String>) -> Self {
        self.status = status;
        self.reason = reason.into();
        self
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Size of the chunks the body is delivered in. Zero is treated as one.
    #[must_use]
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size.max(1);
        self
    }

    #[must_use]
    pub fn timings(mut self, samples: TimingSamples) -> Self {
        self.samples = samples;
        self
    }

    /// Connections opened by this transfer; 0 models a reused connection.
    #[must_use]
    pub fn new_connections(mut self, count: i64) -> Self {
        self.new_connections = count;
        self
    }

    fn header_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.headers.len() + 2);
        lines.push(format!("HTTP/1.1 {} {}\r\n", self.status, self.reason));
        for (name, value) in &self.headers {
            lines.push(format!("{name}: {value}\r\n"));
        }
        lines.push("\r\n".to_string());
        lines
    }

    fn content_type(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
            .map(|(_, value)| value.as_str())
    }
}

/// What the engine observed during one `perform`.
#[derive(Debug, Clone, Default)]
pub struct TransferRecord {
    /// Options in effect when the transfer started
    pub options: BTreeMap<Opt, OptValue>,
    /// Bytes pulled through the read role
    pub uploaded: Vec<u8>,
    /// Number of read-role invocations
    pub read_calls: usize,
    /// The read role answered `Abort`
    pub read_aborted: bool,
    pub code: TransferCode,
}

impl TransferRecord {
    /// Entries of the installed `HttpHeader` list.
    #[must_use]
    pub fn request_headers(&self) -> Vec<&str> {
        self.options
            .get(&Opt::HttpHeader)
            .and_then(OptValue::as_list)
            .map(|list| list.iter().collect())
            .unwrap_or_default()
    }

    /// Value of the request header `name`, matched case-insensitively.
    #[must_use]
    pub fn request_header(&self, name: &str) -> Option<&str> {
        self.request_headers().into_iter().find_map(|entry| {
            let (key, value) = entry.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case(name)
                .then(|| value.trim_start())
        })
    }

    #[must_use]
    pub fn option(&self, opt: Opt) -> Option<&OptValue> {
        self.options.get(&opt)
    }

    #[must_use]
    pub fn long(&self, opt: Opt) -> Option<i64> {
        self.option(opt).and_then(OptValue::as_i64)
    }

    #[must_use]
    pub fn string(&self, opt: Opt) -> Option<&str> {
        self.option(opt).and_then(OptValue::as_str)
    }
}

#[derive(Debug, Clone, Default)]
struct LastTransfer {
    status: i64,
    effective_url: Option<String>,
    content_type: Option<String>,
    samples: TimingSamples,
    header_size: i64,
    request_size: i64,
    uploaded: usize,
    downloaded: usize,
    new_connections: i64,
}

/// A transfer engine backed by a queue of [`ScriptedResponse`]s.
///
/// With an empty queue `perform` fails with
/// [`TransferCode::COULDNT_CONNECT`].
#[derive(Debug, Clone, Default)]
pub struct ScriptedEngine {
    options: BTreeMap<Opt, OptValue>,
    script: VecDeque<ScriptedResponse>,
    history: Vec<TransferRecord>,
    last: LastTransfer,
    resets: usize,
}

impl ScriptedEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An engine that answers the given responses in order.
    #[must_use]
    pub fn with_script(responses: impl IntoIterator<Item = ScriptedResponse>) -> Self {
        Self {
            script: responses.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Queues one more response.
    pub fn push(&mut self, response: ScriptedResponse) {
        self.script.push_back(response);
    }

    /// Responses not yet consumed.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.script.len()
    }

    #[must_use]
    pub fn history(&self) -> &[TransferRecord] {
        &self.history
    }

    #[must_use]
    pub fn last_record(&self) -> Option<&TransferRecord> {
        self.history.last()
    }

    /// Currently configured value of `opt`.
    #[must_use]
    pub fn option(&self, opt: Opt) -> Option<&OptValue> {
        self.options.get(&opt)
    }

    /// Number of `reset` calls so far.
    #[must_use]
    pub fn reset_count(&self) -> usize {
        self.resets
    }

    fn flag(&self, opt: Opt) -> bool {
        self.options
            .get(&opt)
            .and_then(OptValue::as_i64)
            .is_some_and(|v| v != 0)
    }

    fn drain_upload(handler: &mut dyn TransferHandler, record: &mut TransferRecord) -> bool {
        let mut buf = vec![0u8; DEFAULT_CHUNK];
        loop {
            record.read_calls += 1;
            match handler.read(&mut buf) {
                ReadOutcome::Data(0) => return true,
                ReadOutcome::Data(n) => record.uploaded.extend_from_slice(&buf[..n.min(buf.len())]),
                ReadOutcome::Abort => {
                    record.read_aborted = true;
                    return false;
                }
            }
        }
    }

    fn deliver(
        &self,
        response: &ScriptedResponse,
        handler: &mut dyn TransferHandler,
    ) -> std::result::Result<(usize, usize), TransferCode> {
        let mut header_size = 0;
        for line in response.header_lines() {
            let bytes = line.as_bytes();
            if self.flag(Opt::Verbose) {
                handler.debug(DebugKind::HeaderIn, bytes);
            }
            if handler.header(bytes) != bytes.len() {
                return Err(TransferCode::WRITE_ERROR);
            }
            header_size += bytes.len();
        }

        let mut downloaded = 0;
        if !self.flag(Opt::Nobody) {
            for chunk in response.body.chunks(response.chunk_size) {
                if handler.write(chunk) != chunk.len() {
                    return Err(TransferCode::WRITE_ERROR);
                }
                downloaded += chunk.len();
            }
        }
        Ok((header_size, downloaded))
    }
}

impl TransferEngine for ScriptedEngine {
    fn init() -> Result<Self> {
        Ok(Self::default())
    }

    /// Copies the configured options; script and history start empty.
    fn duplicate(&self) -> Result<Self> {
        Ok(Self {
            options: self.options.clone(),
            ..Self::default()
        })
    }

    fn set(&mut self, opt: Opt, value: OptValue) -> Result<()> {
        check_kind(opt, &value)?;
        self.options.insert(opt, value);
        Ok(())
    }

    fn get_long(&mut self, info: Info) -> Result<i64> {
        if info.kind() != ValueKind::Long {
            return Err(error::info_kind(info, info.kind(), ValueKind::Long));
        }
        Ok(match info {
            Info::ResponseCode => self.last.status,
            Info::HeaderSize => self.last.header_size,
            Info::RequestSize => self.last.request_size,
            Info::NumConnects => self.last.new_connections,
            _ => 0,
        })
    }

    fn get_double(&mut self, info: Info) -> Result<f64> {
        if info.kind() != ValueKind::Double {
            return Err(error::info_kind(info, info.kind(), ValueKind::Double));
        }
        let samples = &self.last.samples;
        Ok(match info {
            Info::TotalTime => samples.total,
            Info::NameLookupTime => samples.name_lookup,
            Info::ConnectTime => samples.connect,
            Info::PreTransferTime => samples.pre_transfer,
            Info::StartTransferTime => samples.start_transfer,
            Info::SizeDownload => self.last.downloaded as f64,
            Info::SizeUpload => self.last.uploaded as f64,
            _ => 0.0,
        })
    }

    fn get_string(&mut self, info: Info) -> Result<Option<String>> {
        if info.kind() != ValueKind::Str {
            return Err(error::info_kind(info, info.kind(), ValueKind::Str));
        }
        Ok(match info {
            Info::EffectiveUrl => self.last.effective_url.clone(),
            Info::ContentType => self.last.content_type.clone(),
            _ => None,
        })
    }

    fn perform(&mut self, handler: &mut dyn TransferHandler) -> TransferCode {
        let mut record = TransferRecord {
            options: self.options.clone(),
            ..TransferRecord::default()
        };
        self.last = LastTransfer {
            effective_url: self.options.get(&Opt::Url).and_then(OptValue::as_str).map(str::to_owned),
            ..LastTransfer::default()
        };

        let code = match self.script.pop_front() {
            None => TransferCode::COULDNT_CONNECT,
            Some(response) => self.run(response, handler, &mut record),
        };

        tracing::trace!(%code, uploaded = record.uploaded.len(), "scripted transfer finished");
        record.code = code;
        self.history.push(record);
        code
    }

    /// Clears options. Info from the last transfer stays readable.
    fn reset(&mut self) {
        self.options.clear();
        self.resets += 1;
    }

    fn describe(code: TransferCode) -> String {
        let message = match code {
            TransferCode::OK => "No error",
            TransferCode::UNSUPPORTED_PROTOCOL => "Unsupported protocol",
            TransferCode::URL_MALFORMAT => "URL using bad/illegal format or missing URL",
            TransferCode::COULDNT_RESOLVE_HOST => "Couldn't resolve host name",
            TransferCode::COULDNT_CONNECT => "Couldn't connect to server",
            TransferCode::HTTP_RETURNED_ERROR => "HTTP response code said error",
            TransferCode::WRITE_ERROR => "Failed writing received data to disk/application",
            TransferCode::READ_ERROR => "Failed to open/read local data from file/application",
            TransferCode::OPERATION_TIMEDOUT => "Timeout was reached",
            TransferCode::ABORTED_BY_CALLBACK => "Operation was aborted by an application callback",
            TransferCode::TOO_MANY_REDIRECTS => "Number of redirects hit maximum amount",
            TransferCode::GOT_NOTHING => "Server returned nothing (no headers, no data)",
            _ => "Unknown error",
        };
        message.to_string()
    }
}

impl ScriptedEngine {
    fn run(
        &mut self,
        response: ScriptedResponse,
        handler: &mut dyn TransferHandler,
        record: &mut TransferRecord,
    ) -> TransferCode {
        if let Some(code) = response.failure {
            return code;
        }

        // libcurl only pulls a body in upload mode
        if self.flag(Opt::Upload) {
            if !Self::drain_upload(handler, record) {
                return TransferCode::ABORTED_BY_CALLBACK;
            }
            self.last.uploaded = record.uploaded.len();
        }

        if self.flag(Opt::Verbose) {
            for entry in record.request_headers() {
                handler.debug(DebugKind::HeaderOut, entry.as_bytes());
            }
        }
        self.last.request_size = record
            .request_headers()
            .iter()
            .map(|entry| entry.len() as i64 + 2)
            .sum();

        self.last.status = i64::from(response.status);
        self.last.samples = response.samples;
        self.last.new_connections = response.new_connections;
        self.last.content_type = response.content_type().map(str::to_owned);

        match self.deliver(&response, handler) {
            Ok((header_size, downloaded)) => {
                self.last.header_size = header_size as i64;
                self.last.downloaded = downloaded;
                TransferCode::OK
            }
            Err(code) => code,
        }
    }
}
