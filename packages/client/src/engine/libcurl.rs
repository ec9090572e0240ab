//! libcurl backend
//!
//! Integer and string options go through `curl_easy_setopt` keyed by the
//! option's numeric id, info queries through `curl_easy_getinfo`. List-valued
//! options the safe binding knows about are handed to it; the others are
//! built as raw `curl_slist`s owned by the engine until the next reset.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::fmt;
use std::os::raw::{c_char, c_double, c_long};
use std::ptr;

use ::curl::easy::{Easy, InfoType, List, ReadError};
use curl_sys::{CURLcode, CURLINFO, CURLoption};

use super::opt::{HeaderList, Info, Opt, OptValue, ValueKind};
use super::{DebugKind, ReadOutcome, TransferCode, TransferEngine, TransferHandler, check_kind};
use crate::error::{self, Result};

/// A libcurl easy handle.
pub struct CurlEngine {
    easy: Easy,
    // Scalar options set since the last reset, replayed by `duplicate`
    applied: Vec<(Opt, OptValue)>,
    // Declared after `easy`: the handle is cleaned up before the lists it points at
    raw_lists: Vec<RawList>,
}

/// A `curl_slist` installed on the handle, freed on drop.
struct RawList(*mut curl_sys::curl_slist);

// SAFETY: the list is only read by libcurl through the owning engine's handle
unsafe impl Send for RawList {}

impl RawList {
    fn build(list: &HeaderList) -> std::result::Result<Self, ::curl::Error> {
        let mut raw = RawList(ptr::null_mut());
        for entry in list.iter() {
            let entry = CString::new(entry).map_err(|_| bad_argument())?;
            // SAFETY: libcurl copies the entry; on failure the old list is left intact
            let next = unsafe { curl_sys::curl_slist_append(raw.0, entry.as_ptr()) };
            if next.is_null() {
                return Err(::curl::Error::new(curl_sys::CURLE_OUT_OF_MEMORY));
            }
            raw.0 = next;
        }
        Ok(raw)
    }
}

impl Drop for RawList {
    fn drop(&mut self) {
        if !self.0.is_null() {
            // SAFETY: built by curl_slist_append and freed exactly once
            unsafe { curl_sys::curl_slist_free_all(self.0) };
        }
    }
}

impl fmt::Debug for CurlEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurlEngine")
            .field("applied", &self.applied)
            .field("raw_lists", &self.raw_lists.len())
            .finish_non_exhaustive()
    }
}

impl CurlEngine {
    fn apply(&mut self, opt: Opt, value: &OptValue) -> std::result::Result<(), ::curl::Error> {
        match value {
            OptValue::Long(v) if opt.kind() == ValueKind::Long => setopt_long(&self.easy, opt, *v),
            OptValue::Long(v) | OptValue::Large(v) => setopt_off_t(&self.easy, opt, *v),
            OptValue::Str(s) => setopt_str(&self.easy, opt, s),
            OptValue::List(list) => match opt {
                Opt::HttpHeader => self.easy.http_headers(to_curl_list(list)?),
                Opt::Resolve => self.easy.resolve(to_curl_list(list)?),
                Opt::ConnectTo => self.easy.connect_to(to_curl_list(list)?),
                _ => self.install_raw_list(opt, list),
            },
        }
    }

    fn install_raw_list(&mut self, opt: Opt, list: &HeaderList) -> std::result::Result<(), ::curl::Error> {
        let raw = RawList::build(list)?;
        // SAFETY: list options keep the pointer; `raw` is kept alive in
        // `raw_lists` until the handle is reset or dropped
        cvt(unsafe { curl_sys::curl_easy_setopt(self.easy.raw(), opt.id() as CURLoption, raw.0) })?;
        self.raw_lists.push(raw);
        Ok(())
    }

    fn run(&mut self, handler: &RefCell<&mut dyn TransferHandler>) -> std::result::Result<(), ::curl::Error> {
        let mut transfer = self.easy.transfer();
        transfer.header_function(|chunk| handler.borrow_mut().header(chunk) == chunk.len())?;
        transfer.write_function(|chunk| Ok(handler.borrow_mut().write(chunk)))?;
        transfer.read_function(|buf| match handler.borrow_mut().read(buf) {
            ReadOutcome::Data(n) => Ok(n),
            ReadOutcome::Abort => Err(ReadError::Abort),
        })?;
        transfer.debug_function(|kind, data| {
            handler.borrow_mut().debug(debug_kind(kind), data);
        })?;
        transfer.perform()
    }
}

impl TransferEngine for CurlEngine {
    fn init() -> Result<Self> {
        ::curl::init();
        // `Easy::new` panics when libcurl cannot allocate a handle, so check first
        // SAFETY: the probe handle is cleaned up immediately
        let probe = unsafe { curl_sys::curl_easy_init() };
        if probe.is_null() {
            return Err(error::init("curl_easy_init returned no handle"));
        }
        // SAFETY: `probe` came from curl_easy_init and is not used again
        unsafe { curl_sys::curl_easy_cleanup(probe) };
        Ok(Self {
            easy: Easy::new(),
            applied: Vec::new(),
            raw_lists: Vec::new(),
        })
    }

    fn duplicate(&self) -> Result<Self> {
        let mut dup = Self::init()?;
        for (opt, value) in &self.applied {
            dup.set(*opt, value.clone())?;
        }
        tracing::trace!(options = self.applied.len(), "duplicated libcurl handle");
        Ok(dup)
    }

    fn set(&mut self, opt: Opt, value: OptValue) -> Result<()> {
        check_kind(opt, &value)?;
        self.apply(opt, &value).map_err(|e| {
            tracing::trace!("setopt {opt:?} failed: {e}");
            error::option(e)
        })?;
        if !opt.is_list() {
            self.applied.retain(|(applied, _)| *applied != opt);
            self.applied.push((opt, value));
        }
        Ok(())
    }

    fn get_long(&mut self, info: Info) -> Result<i64> {
        expect_info(info, ValueKind::Long)?;
        let mut value: c_long = 0;
        // SAFETY: a long-typed info key writes exactly one c_long
        let rc = unsafe { curl_sys::curl_easy_getinfo(self.easy.raw(), info_id(info), &mut value) };
        cvt(rc).map_err(error::info)?;
        Ok(i64::from(value))
    }

    fn get_double(&mut self, info: Info) -> Result<f64> {
        expect_info(info, ValueKind::Double)?;
        let mut value: c_double = 0.0;
        // SAFETY: a double-typed info key writes exactly one c_double
        let rc = unsafe { curl_sys::curl_easy_getinfo(self.easy.raw(), info_id(info), &mut value) };
        cvt(rc).map_err(error::info)?;
        Ok(value)
    }

    fn get_string(&mut self, info: Info) -> Result<Option<String>> {
        expect_info(info, ValueKind::Str)?;
        let mut value: *const c_char = ptr::null();
        // SAFETY: a string-typed info key writes a pointer owned by the handle,
        // valid until the next call on it; it is copied out before returning
        let rc = unsafe { curl_sys::curl_easy_getinfo(self.easy.raw(), info_id(info), &mut value) };
        cvt(rc).map_err(error::info)?;
        if value.is_null() {
            return Ok(None);
        }
        // SAFETY: non-null and NUL-terminated per libcurl's contract
        let text = unsafe { CStr::from_ptr(value) };
        Ok(Some(text.to_string_lossy().into_owned()))
    }

    fn perform(&mut self, handler: &mut dyn TransferHandler) -> TransferCode {
        let handler = RefCell::new(handler);
        match self.run(&handler) {
            Ok(()) => TransferCode::OK,
            Err(err) => {
                if let Some(extra) = err.extra_description() {
                    tracing::debug!("libcurl: {extra}");
                }
                TransferCode(err.code() as i32)
            }
        }
    }

    fn reset(&mut self) {
        self.easy.reset();
        self.applied.clear();
        self.raw_lists.clear();
    }

    fn describe(code: TransferCode) -> String {
        ::curl::Error::new(code.raw() as CURLcode)
            .description()
            .to_string()
    }
}

fn expect_info(info: Info, given: ValueKind) -> Result<()> {
    if info.kind() == given {
        Ok(())
    } else {
        Err(error::info_kind(info, info.kind(), given))
    }
}

fn info_id(info: Info) -> CURLINFO {
    info.id() as CURLINFO
}

fn cvt(rc: CURLcode) -> std::result::Result<(), ::curl::Error> {
    if rc == curl_sys::CURLE_OK {
        Ok(())
    } else {
        Err(::curl::Error::new(rc))
    }
}

fn bad_argument() -> ::curl::Error {
    ::curl::Error::new(curl_sys::CURLE_BAD_FUNCTION_ARGUMENT)
}

fn setopt_long(easy: &Easy, opt: Opt, value: i64) -> std::result::Result<(), ::curl::Error> {
    let value = c_long::try_from(value).map_err(|_| bad_argument())?;
    // SAFETY: long-typed options take a single c_long and keep no pointer
    cvt(unsafe { curl_sys::curl_easy_setopt(easy.raw(), opt.id() as CURLoption, value) })
}

fn setopt_off_t(easy: &Easy, opt: Opt, value: i64) -> std::result::Result<(), ::curl::Error> {
    let value = value as curl_sys::curl_off_t;
    // SAFETY: off_t-typed options take a single curl_off_t and keep no pointer
    cvt(unsafe { curl_sys::curl_easy_setopt(easy.raw(), opt.id() as CURLoption, value) })
}

fn setopt_str(easy: &Easy, opt: Opt, value: &str) -> std::result::Result<(), ::curl::Error> {
    let value = CString::new(value).map_err(|_| bad_argument())?;
    // SAFETY: libcurl copies string options, so the CString may drop after the call
    cvt(unsafe { curl_sys::curl_easy_setopt(easy.raw(), opt.id() as CURLoption, value.as_ptr()) })
}

fn to_curl_list(list: &HeaderList) -> std::result::Result<List, ::curl::Error> {
    let mut curl_list = List::new();
    for entry in list.iter() {
        curl_list.append(entry)?;
    }
    Ok(curl_list)
}

fn debug_kind(kind: InfoType) -> DebugKind {
    match kind {
        InfoType::HeaderIn => DebugKind::HeaderIn,
        InfoType::HeaderOut => DebugKind::HeaderOut,
        InfoType::DataIn => DebugKind::DataIn,
        InfoType::DataOut => DebugKind::DataOut,
        InfoType::SslDataIn => DebugKind::SslDataIn,
        InfoType::SslDataOut => DebugKind::SslDataOut,
        _ => DebugKind::Text,
    }
}
