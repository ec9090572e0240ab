//! Transfer session
//!
//! A [`Session`] exclusively owns one engine handle together with the
//! per-request state around it: request headers, an optional outgoing body,
//! the response buffers the callbacks fill, and every header list installed
//! on the handle. [`Session::perform_fully`] runs one blocking transfer and
//! always leaves the session reset for the next one, whatever the exit path.

mod body;
mod exchange;
mod outcome;

use std::fmt;
use std::io::Read;
use std::mem;
use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use hashbrown::HashMap;
use http::{HeaderName, HeaderValue, Method};

pub use body::{BodyStream, RequestBody};
pub use outcome::TransferOutcome;

use self::exchange::Exchange;
use crate::config::SessionConfig;
use crate::engine::{CurlEngine, HeaderList, Info, Opt, OptValue, TransferCode, TransferEngine};
use crate::error::{self, Result};
use crate::telemetry::TransferStats;
use crate::timeline::{Timeline, TimingSamples};

/// Lifecycle of the engine handle owned by a session.
#[derive(Debug)]
pub(crate) enum HandleState<E> {
    Live(E),
    /// The engine could not create a handle; nothing can ever be performed
    Unavailable,
    /// `close()` destroyed the handle
    Closed,
}

/// One reusable transfer handle plus its request and response state.
///
/// # Examples
/// ```no_run
/// use xfer_client::Session;
///
/// # fn main() -> xfer_client::Result<()> {
/// let mut session = Session::with_url("https://example.com/")?;
/// session.set_header("Accept", "text/html")?;
/// let outcome = session.perform_fully()?;
/// if outcome.is_success() {
///     println!("{} bytes in {} ms", outcome.body.len(), outcome.timeline.total_cost);
/// }
/// # Ok(())
/// # }
/// ```
pub struct Session<E: TransferEngine = CurlEngine> {
    handle: HandleState<E>,
    request_headers: HashMap<String, String>,
    exchange: Exchange,
    lists: Vec<HeaderList>,
    pending_url: Option<String>,
    no_body: bool,
    last: Option<TransferInfo>,
    config: SessionConfig,
    stats: Arc<TransferStats>,
}

/// Info captured from the handle right after a transfer, before the reset
/// that clears it.
#[derive(Debug, Clone, Default)]
struct TransferInfo {
    status: u32,
    effective_url: Option<String>,
    connections: u64,
    timeline: Timeline,
}

impl Session<CurlEngine> {
    /// Session over a fresh libcurl handle with the default configuration.
    ///
    /// If libcurl cannot create a handle the session is unavailable and every
    /// operation on it fails with an [`Init`](crate::Kind::Init) error.
    #[must_use]
    pub fn new() -> Self {
        Self::create()
    }

    /// Session targeting `url`.
    ///
    /// # Errors
    ///
    /// Returns a builder error if `url` does not parse, or an init error if no
    /// handle could be created.
    pub fn with_url(url: &str) -> Result<Self> {
        let mut session = Self::new();
        session.set_url(url)?;
        Ok(session)
    }

    /// Session with a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns a builder error carrying the `ConfigurationError` when `config`
    /// is invalid.
    pub fn with_config(config: SessionConfig) -> Result<Self> {
        Self::create_with_config(config)
    }
}

impl Default for Session<CurlEngine> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: TransferEngine> Session<E> {
    /// Session over a handle from `E::init`.
    #[must_use]
    pub fn create() -> Self {
        Self::assemble(init_handle(), SessionConfig::default(), Arc::default())
    }

    /// # Errors
    ///
    /// Returns a builder error when `config` fails validation.
    pub fn create_with_config(config: SessionConfig) -> Result<Self> {
        config.validate().map_err(error::configuration)?;
        Ok(Self::assemble(init_handle(), config, Arc::default()))
    }

    /// Wrap an engine that is already set up, e.g. a `ScriptedEngine`.
    #[must_use]
    pub fn from_engine(engine: E) -> Self {
        Self::assemble(HandleState::Live(engine), SessionConfig::default(), Arc::default())
    }

    /// # Errors
    ///
    /// Returns a builder error when `config` fails validation.
    pub fn from_engine_with_config(engine: E, config: SessionConfig) -> Result<Self> {
        config.validate().map_err(error::configuration)?;
        Ok(Self::assemble(HandleState::Live(engine), config, Arc::default()))
    }

    /// New session whose handle is a duplicate of `other`'s.
    ///
    /// Transport configuration carries over; headers, body and buffers start
    /// empty. When `other` has no live handle a fresh one is created instead.
    /// The configuration and statistics are shared with `other`.
    #[must_use]
    pub fn duplicate_of(other: &Session<E>) -> Self {
        let handle = match &other.handle {
            HandleState::Live(engine) => match engine.duplicate() {
                Ok(engine) => HandleState::Live(engine),
                Err(e) => {
                    tracing::warn!("handle duplication failed: {e}");
                    HandleState::Unavailable
                }
            },
            HandleState::Unavailable | HandleState::Closed => init_handle(),
        };
        Self::assemble(handle, other.config.clone(), Arc::clone(&other.stats))
    }

    fn assemble(handle: HandleState<E>, config: SessionConfig, stats: Arc<TransferStats>) -> Self {
        let mut session = Self {
            handle,
            request_headers: HashMap::new(),
            exchange: Exchange::default(),
            lists: Vec::new(),
            pending_url: None,
            no_body: false,
            last: None,
            config,
            stats,
        };
        if session.is_live()
            && let Err(e) = session.apply_standard_options()
        {
            tracing::warn!("standard options rejected: {e}");
        }
        session
    }

    /// The live engine, or the error describing why there is none.
    fn live(&mut self) -> Result<&mut E> {
        match &mut self.handle {
            HandleState::Live(engine) => Ok(engine),
            HandleState::Unavailable => Err(error::unavailable()),
            HandleState::Closed => Err(error::closed()),
        }
    }

    #[must_use]
    pub fn is_live(&self) -> bool {
        matches!(self.handle, HandleState::Live(_))
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(self.handle, HandleState::Closed)
    }

    #[must_use]
    pub fn engine(&self) -> Option<&E> {
        match &self.handle {
            HandleState::Live(engine) => Some(engine),
            _ => None,
        }
    }

    pub fn engine_mut(&mut self) -> Option<&mut E> {
        self.live().ok()
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Counters shared by this session and its duplicates.
    #[must_use]
    pub fn stats(&self) -> &Arc<TransferStats> {
        &self.stats
    }

    fn apply_standard_options(&mut self) -> Result<()> {
        let options = self.config.standard_options();
        let engine = self.live()?;
        for (opt, value) in options {
            engine.set(opt, value)?;
        }
        Ok(())
    }

    /// Install the standard options and select the body mode for the next
    /// transfer.
    ///
    /// With a body the handle goes to upload mode and the declared content
    /// type becomes the `Content-Type` request header. Without one it goes to
    /// GET mode (or stays header-only when `Opt::Nobody` was set).
    ///
    /// # Errors
    ///
    /// Fails on a dead session or when the engine rejects an option.
    pub fn configure(&mut self) -> Result<()> {
        self.apply_standard_options()?;

        let upload = self
            .exchange
            .body
            .as_stream()
            .map(|stream| (stream.content_type().to_owned(), stream.content_length()));

        let body_mode = match upload {
            Some((content_type, length)) => {
                if !content_type.is_empty() {
                    self.insert_header("Content-Type", content_type);
                }
                vec![
                    (Opt::Upload, OptValue::Long(1)),
                    (Opt::InFileSize, OptValue::Large(i64::try_from(length).unwrap_or(i64::MAX))),
                ]
            }
            None if self.no_body => vec![
                (Opt::Upload, OptValue::Long(0)),
                (Opt::InFileSize, OptValue::Large(0)),
                (Opt::Nobody, OptValue::Long(1)),
            ],
            None => vec![
                (Opt::HttpGet, OptValue::Long(1)),
                (Opt::Upload, OptValue::Long(0)),
                (Opt::InFileSize, OptValue::Large(0)),
            ],
        };

        let engine = self.live()?;
        for (opt, value) in body_mode {
            engine.set(opt, value)?;
        }
        Ok(())
    }

    /// Run one transfer to completion on the calling thread.
    ///
    /// The request headers are installed as a fresh header list together with
    /// an empty `Expect:` entry. Whatever happens, the session is reset before
    /// this returns: buffers emptied, header lists released, headers and body
    /// cleared, engine options back to defaults.
    ///
    /// A transfer that fails (DNS, connect, timeout, callback abort) is not an
    /// error here; it comes back as a non-success `code` in the outcome.
    ///
    /// # Errors
    ///
    /// Returns a [`Closed`](crate::Kind::Closed) error after `close()`, an
    /// [`Init`](crate::Kind::Init) error if the session never had a handle, or
    /// an option error if the engine rejected the assembled configuration.
    pub fn perform_fully(&mut self) -> Result<TransferOutcome> {
        self.live()?;
        let scope = TransferScope { session: self };
        let session = &mut *scope.session;

        session.configure()?;
        let list = session.request_header_list();
        session.install_list(Opt::HttpHeader, list)?;

        let url = session.pending_url.clone();
        let code = session.perform_exchange()?;

        let info = session.capture_info();
        let bytes_sent = session.exchange.bytes_sent();
        let headers = mem::take(&mut session.exchange.header_bytes);
        let body = mem::take(&mut session.exchange.body_bytes);
        let stats = Arc::clone(&session.stats);
        session.last = Some(info.clone());
        drop(scope);

        let bytes_received = (headers.len() + body.len()) as u64;
        stats.record(code, bytes_sent, bytes_received, &info.timeline, info.connections);

        if code.is_success() {
            tracing::debug!(
                url = url.as_deref().unwrap_or_default(),
                status = info.status,
                sent = bytes_sent,
                received = bytes_received,
                total_ms = info.timeline.total_cost,
                "transfer complete"
            );
        } else {
            tracing::warn!(
                url = url.as_deref().unwrap_or_default(),
                "transfer failed with {code}: {}",
                E::describe(code)
            );
        }

        Ok(TransferOutcome {
            code,
            headers,
            body,
            timeline: info.timeline,
        })
    }

    /// Read what the handle knows about the transfer that just ran. Missing
    /// values are logged and left at their defaults.
    fn capture_info(&mut self) -> TransferInfo {
        let timeline = self.read_timeline().unwrap_or_else(|e| {
            tracing::debug!("timing info unavailable: {e}");
            Timeline::default()
        });
        let status = self
            .info_long(Info::ResponseCode)
            .map_or(0, |code| u32::try_from(code).unwrap_or(0));
        let effective_url = self.info_string(Info::EffectiveUrl).ok().flatten();
        let connections = self
            .info_long(Info::NumConnects)
            .map_or(0, |count| u64::try_from(count).unwrap_or(0));
        TransferInfo {
            status,
            effective_url,
            connections,
            timeline,
        }
    }

    fn perform_exchange(&mut self) -> Result<TransferCode> {
        match &mut self.handle {
            HandleState::Live(engine) => Ok(engine.perform(&mut self.exchange)),
            HandleState::Unavailable => Err(error::unavailable()),
            HandleState::Closed => Err(error::closed()),
        }
    }

    /// Release every tracked header list, clear headers and body, and return
    /// the engine's options to their defaults. No-op on a dead session.
    pub fn reset(&mut self) {
        let HandleState::Live(engine) = &mut self.handle else {
            return;
        };
        engine.reset();
        self.lists.clear();
        self.request_headers.clear();
        self.exchange.clear();
        self.pending_url = None;
        self.no_body = false;
    }

    /// Destroy the handle. Every later operation fails with a
    /// [`Closed`](crate::Kind::Closed) error. Idempotent.
    pub fn close(&mut self) {
        if self.is_closed() {
            return;
        }
        self.exchange.clear();
        self.request_headers.clear();
        self.lists.clear();
        self.pending_url = None;
        self.handle = HandleState::Closed;
        tracing::trace!("session closed");
    }

    // Options

    /// # Errors
    ///
    /// Fails on a dead session, when `opt` does not take a long, or when the
    /// engine rejects the value.
    pub fn set_option_long(&mut self, opt: Opt, value: i64) -> Result<()> {
        self.live()?.set(opt, OptValue::Long(value))?;
        if opt == Opt::Nobody {
            self.no_body = value != 0;
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Fails on a dead session, when `opt` does not take a 64-bit value, or
    /// when the engine rejects the value.
    pub fn set_option_large(&mut self, opt: Opt, value: i64) -> Result<()> {
        self.live()?.set(opt, OptValue::Large(value))
    }

    /// Set a string option. For list-valued options (`Quote`, `PreQuote`,
    /// `PostQuote`, `Http200Aliases`, `MailRcpt`, `Resolve`, `ConnectTo`,
    /// `HttpHeader`) a new single-entry list is built, tracked and installed.
    ///
    /// # Errors
    ///
    /// Fails on a dead session, when `opt` takes neither a string nor a list,
    /// or when the engine rejects the value.
    pub fn set_option_str(&mut self, opt: Opt, value: &str) -> Result<()> {
        if opt.is_list() {
            return self.install_list(opt, HeaderList::single(value));
        }
        self.live()?.set(opt, OptValue::Str(value.to_owned()))
    }

    /// Install a list-valued option. The list is tracked and released on the
    /// next reset or close.
    ///
    /// # Errors
    ///
    /// Fails on a dead session, when `opt` does not take a list, or when the
    /// engine rejects it.
    pub fn set_option_list(&mut self, opt: Opt, list: HeaderList) -> Result<()> {
        self.install_list(opt, list)
    }

    fn install_list(&mut self, opt: Opt, list: HeaderList) -> Result<()> {
        self.live()?.set(opt, OptValue::List(list.clone()))?;
        self.lists.push(list);
        Ok(())
    }

    /// Header lists installed since the last reset.
    #[must_use]
    pub fn tracked_lists(&self) -> &[HeaderList] {
        &self.lists
    }

    // Info

    /// # Errors
    ///
    /// Fails on a dead session or when `info` does not yield a long.
    pub fn info_long(&mut self, info: Info) -> Result<i64> {
        self.live()?.get_long(info)
    }

    /// # Errors
    ///
    /// Fails on a dead session or when `info` does not yield a double.
    pub fn info_double(&mut self, info: Info) -> Result<f64> {
        self.live()?.get_double(info)
    }

    /// # Errors
    ///
    /// Fails on a dead session or when `info` does not yield a string.
    pub fn info_string(&mut self, info: Info) -> Result<Option<String>> {
        self.live()?.get_string(info)
    }

    /// The URL the next transfer targets, or else the effective URL of the
    /// last transfer.
    ///
    /// # Errors
    ///
    /// Fails on a dead session.
    pub fn url(&mut self) -> Result<Option<String>> {
        if let Some(url) = &self.pending_url {
            return Ok(Some(url.clone()));
        }
        self.effective_url()
    }

    /// # Errors
    ///
    /// Returns a builder error carrying `url` when it does not parse, or fails
    /// on a dead session.
    pub fn set_url(&mut self, url: &str) -> Result<()> {
        url::Url::parse(url).map_err(|e| error::invalid_url(e, url))?;
        self.set_option_str(Opt::Url, url)?;
        self.pending_url = Some(url.to_owned());
        Ok(())
    }

    /// Status code of the last response, 0 when none was received.
    ///
    /// # Errors
    ///
    /// Fails on a dead session.
    pub fn response_code(&mut self) -> Result<u32> {
        if let Some(last) = self.last_info()? {
            return Ok(last.status);
        }
        let code = self.info_long(Info::ResponseCode)?;
        Ok(u32::try_from(code).unwrap_or(0))
    }

    /// Effective URL of the last transfer, after redirects.
    ///
    /// # Errors
    ///
    /// Fails on a dead session.
    pub fn effective_url(&mut self) -> Result<Option<String>> {
        if let Some(last) = self.last_info()? {
            return Ok(last.effective_url.clone());
        }
        self.info_string(Info::EffectiveUrl)
    }

    /// Phase breakdown of the last transfer.
    ///
    /// # Errors
    ///
    /// Fails on a dead session or when the engine cannot report timings.
    pub fn timeline(&mut self) -> Result<Timeline> {
        if let Some(last) = self.last_info()? {
            return Ok(last.timeline);
        }
        self.read_timeline()
    }

    fn read_timeline(&mut self) -> Result<Timeline> {
        let engine = self.live()?;
        let samples = TimingSamples {
            total: engine.get_double(Info::TotalTime)?,
            name_lookup: engine.get_double(Info::NameLookupTime)?,
            connect: engine.get_double(Info::ConnectTime)?,
            pre_transfer: engine.get_double(Info::PreTransferTime)?,
            start_transfer: engine.get_double(Info::StartTransferTime)?,
        };
        Ok(Timeline::from_samples(samples))
    }

    /// New connections the last transfer had to open; 0 when one was reused.
    ///
    /// # Errors
    ///
    /// Fails on a dead session.
    pub fn connection_count(&mut self) -> Result<u64> {
        if let Some(last) = self.last_info()? {
            return Ok(last.connections);
        }
        let count = self.info_long(Info::NumConnects)?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// Snapshot of the last `perform_fully`, if any.
    fn last_info(&mut self) -> Result<Option<&TransferInfo>> {
        self.live()?;
        Ok(self.last.as_ref())
    }

    /// The engine's message for `code`.
    #[must_use]
    pub fn str_error(&self, code: TransferCode) -> String {
        E::describe(code)
    }

    // Request

    /// Set a request header, replacing any header with the same name
    /// regardless of case.
    ///
    /// # Errors
    ///
    /// Returns a builder error for an invalid name or value, or fails on a dead
    /// session.
    pub fn set_header(&mut self, name: &str, value: &str) -> Result<()> {
        self.live()?;
        HeaderName::from_bytes(name.as_bytes()).map_err(error::invalid_header)?;
        HeaderValue::from_str(value).map_err(error::invalid_header)?;
        self.insert_header(name, value.to_owned());
        Ok(())
    }

    fn insert_header(&mut self, name: &str, value: String) {
        self.request_headers
            .retain(|existing, _| !existing.eq_ignore_ascii_case(name));
        self.request_headers.insert(name.to_owned(), value);
    }

    /// Value of a request header set for the next transfer.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.request_headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn request_headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.request_headers
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn request_header_list(&self) -> HeaderList {
        let mut list: HeaderList = self
            .request_headers
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect();
        list.append("Expect:");
        list
    }

    /// Use `method` as the request verb.
    ///
    /// # Errors
    ///
    /// Returns a builder error for an invalid method token, or fails on a dead
    /// session.
    pub fn set_verb(&mut self, method: &str) -> Result<()> {
        Method::from_bytes(method.as_bytes()).map_err(error::builder)?;
        self.set_option_str(Opt::CustomRequest, method)
    }

    /// Send `body` with the next transfer.
    ///
    /// # Errors
    ///
    /// Fails on a dead session.
    pub fn set_request_body(&mut self, body: impl Into<Bytes>, content_type: &str) -> Result<()> {
        self.set_body(BodyStream::from_bytes(body, content_type))
    }

    /// Stream `length` bytes from `reader` as the next request body.
    ///
    /// # Errors
    ///
    /// Fails on a dead session.
    pub fn set_request_stream<R>(&mut self, reader: R, content_type: &str, length: u64) -> Result<()>
    where
        R: Read + Send + 'static,
    {
        self.set_body(BodyStream::new(reader, content_type, length))
    }

    /// Upload the file at `path`, sized from its metadata.
    ///
    /// # Errors
    ///
    /// Returns a body error when the file's metadata cannot be read, or fails
    /// on a dead session.
    pub fn set_request_file(&mut self, path: impl AsRef<Path>, content_type: &str) -> Result<()> {
        self.live()?;
        let stream = BodyStream::from_file(path.as_ref(), content_type).map_err(error::body)?;
        self.set_body(stream)
    }

    fn set_body(&mut self, stream: BodyStream) -> Result<()> {
        self.live()?;
        self.exchange.body = RequestBody::Stream(stream);
        Ok(())
    }

    /// Drop the pending body; the next transfer runs in GET mode.
    pub fn clear_request_body(&mut self) {
        self.exchange.body = RequestBody::None;
    }

    #[must_use]
    pub fn request_body(&self) -> &RequestBody {
        &self.exchange.body
    }
}

impl<E: TransferEngine> Drop for Session<E> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<E: TransferEngine> fmt::Debug for Session<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.handle {
            HandleState::Live(_) => "live",
            HandleState::Unavailable => "unavailable",
            HandleState::Closed => "closed",
        };
        f.debug_struct("Session")
            .field("state", &state)
            .field("url", &self.pending_url)
            .field("headers", &self.request_headers.len())
            .field("body", &self.exchange.body)
            .field("lists", &self.lists.len())
            .finish_non_exhaustive()
    }
}

fn init_handle<E: TransferEngine>() -> HandleState<E> {
    match E::init() {
        Ok(engine) => HandleState::Live(engine),
        Err(e) => {
            tracing::warn!("transfer handle could not be created: {e}");
            HandleState::Unavailable
        }
    }
}

/// Resets the session when a transfer scope ends, on every exit path.
struct TransferScope<'a, E: TransferEngine> {
    session: &'a mut Session<E>,
}

impl<E: TransferEngine> Drop for TransferScope<'_, E> {
    fn drop(&mut self) {
        self.session.reset();
    }
}
