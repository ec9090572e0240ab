//! Typed option and info keys
//!
//! Numeric identifiers follow libcurl's numbering: an option id encodes its
//! value type in the thousands range (`LONG` below 10000, object pointers from
//! 10000, `off_t` from 30000) and an info id encodes its result type in the
//! `0xf00000` mask.

use std::fmt;

const OPTTYPE_LONG: i32 = 0;
const OPTTYPE_OBJECTPOINT: i32 = 10_000;
const OPTTYPE_OFF_T: i32 = 30_000;

const INFO_STRING: i32 = 0x10_0000;
const INFO_LONG: i32 = 0x20_0000;
const INFO_DOUBLE: i32 = 0x30_0000;
const INFO_TYPEMASK: i32 = 0xf0_0000;

/// The kind of value carried by an option or produced by an info query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// C `long`
    Long,
    /// 64-bit `curl_off_t`
    Large,
    /// Floating point, only produced by info queries
    Double,
    /// Zero-terminated string
    Str,
    /// Linked list of strings
    List,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValueKind::Long => "long",
            ValueKind::Large => "64-bit",
            ValueKind::Double => "double",
            ValueKind::Str => "string",
            ValueKind::List => "list",
        })
    }
}

macro_rules! options {
    (@list list) => { true };
    (@list) => { false };
    ($($(#[$doc:meta])* $name:ident = $base:ident + $n:literal $(, $list:ident)?;)*) => {
        /// Engine configuration keys.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Opt {
            $($(#[$doc])* $name,)*
        }

        impl Opt {
            /// Every supported option, in declaration order.
            pub const ALL: &'static [Opt] = &[$(Opt::$name,)*];

            /// Numeric identifier of this option.
            #[must_use]
            pub const fn id(self) -> i32 {
                match self {
                    $(Opt::$name => $base + $n,)*
                }
            }

            /// True for options whose value is a string list.
            #[must_use]
            pub const fn is_list(self) -> bool {
                match self {
                    $(Opt::$name => options!(@list $($list)?),)*
                }
            }
        }
    };
}

options! {
    Verbose = OPTTYPE_LONG + 41;
    Nobody = OPTTYPE_LONG + 44;
    Upload = OPTTYPE_LONG + 46;
    FollowLocation = OPTTYPE_LONG + 52;
    SslVerifyPeer = OPTTYPE_LONG + 64;
    MaxRedirs = OPTTYPE_LONG + 68;
    FreshConnect = OPTTYPE_LONG + 74;
    ForbidReuse = OPTTYPE_LONG + 75;
    HttpGet = OPTTYPE_LONG + 80;
    SslVerifyHost = OPTTYPE_LONG + 81;
    NoSignal = OPTTYPE_LONG + 99;
    TcpNoDelay = OPTTYPE_LONG + 121;
    TimeoutMs = OPTTYPE_LONG + 155;
    ConnectTimeoutMs = OPTTYPE_LONG + 156;
    Expect100TimeoutMs = OPTTYPE_LONG + 227;
    Url = OPTTYPE_OBJECTPOINT + 2;
    Proxy = OPTTYPE_OBJECTPOINT + 4;
    Range = OPTTYPE_OBJECTPOINT + 7;
    Referer = OPTTYPE_OBJECTPOINT + 16;
    UserAgent = OPTTYPE_OBJECTPOINT + 18;
    Cookie = OPTTYPE_OBJECTPOINT + 22;
    HttpHeader = OPTTYPE_OBJECTPOINT + 23, list;
    /// FTP commands sent before the transfer
    Quote = OPTTYPE_OBJECTPOINT + 28, list;
    CustomRequest = OPTTYPE_OBJECTPOINT + 36;
    PostQuote = OPTTYPE_OBJECTPOINT + 39, list;
    Interface = OPTTYPE_OBJECTPOINT + 62;
    CaInfo = OPTTYPE_OBJECTPOINT + 65;
    PreQuote = OPTTYPE_OBJECTPOINT + 93, list;
    AcceptEncoding = OPTTYPE_OBJECTPOINT + 102;
    /// Status lines accepted in place of `HTTP/1.x`
    Http200Aliases = OPTTYPE_OBJECTPOINT + 104, list;
    MailFrom = OPTTYPE_OBJECTPOINT + 186;
    MailRcpt = OPTTYPE_OBJECTPOINT + 187, list;
    Resolve = OPTTYPE_OBJECTPOINT + 203, list;
    ConnectTo = OPTTYPE_OBJECTPOINT + 243, list;
    InFileSize = OPTTYPE_OFF_T + 115;
    ResumeFrom = OPTTYPE_OFF_T + 116;
    MaxFileSize = OPTTYPE_OFF_T + 117;
}

impl Opt {
    /// The value kind this option accepts.
    #[must_use]
    pub const fn kind(self) -> ValueKind {
        let id = self.id();
        if id >= OPTTYPE_OFF_T {
            ValueKind::Large
        } else if id >= OPTTYPE_OBJECTPOINT {
            if self.is_list() {
                ValueKind::List
            } else {
                ValueKind::Str
            }
        } else {
            ValueKind::Long
        }
    }

    /// Looks up an option by its numeric identifier.
    #[must_use]
    pub fn from_id(id: i32) -> Option<Opt> {
        Opt::ALL.iter().copied().find(|opt| opt.id() == id)
    }
}

macro_rules! infos {
    ($($name:ident = $base:ident + $n:literal;)*) => {
        /// Post-transfer query keys.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Info {
            $($name,)*
        }

        impl Info {
            pub const ALL: &'static [Info] = &[$(Info::$name,)*];

            /// Numeric identifier of this info key.
            #[must_use]
            pub const fn id(self) -> i32 {
                match self {
                    $(Info::$name => $base + $n,)*
                }
            }
        }
    };
}

infos! {
    EffectiveUrl = INFO_STRING + 1;
    ResponseCode = INFO_LONG + 2;
    TotalTime = INFO_DOUBLE + 3;
    NameLookupTime = INFO_DOUBLE + 4;
    ConnectTime = INFO_DOUBLE + 5;
    PreTransferTime = INFO_DOUBLE + 6;
    SizeUpload = INFO_DOUBLE + 7;
    SizeDownload = INFO_DOUBLE + 8;
    HeaderSize = INFO_LONG + 11;
    RequestSize = INFO_LONG + 12;
    StartTransferTime = INFO_DOUBLE + 17;
    ContentType = INFO_STRING + 18;
    RedirectTime = INFO_DOUBLE + 19;
    RedirectCount = INFO_LONG + 20;
    NumConnects = INFO_LONG + 26;
    RedirectUrl = INFO_STRING + 31;
    PrimaryIp = INFO_STRING + 32;
    AppConnectTime = INFO_DOUBLE + 33;
    PrimaryPort = INFO_LONG + 40;
    LocalIp = INFO_STRING + 41;
    LocalPort = INFO_LONG + 42;
}

impl Info {
    /// The value kind this info key yields.
    #[must_use]
    pub const fn kind(self) -> ValueKind {
        match self.id() & INFO_TYPEMASK {
            INFO_STRING => ValueKind::Str,
            INFO_DOUBLE => ValueKind::Double,
            _ => ValueKind::Long,
        }
    }

    #[must_use]
    pub fn from_id(id: i32) -> Option<Info> {
        Info::ALL.iter().copied().find(|info| info.id() == id)
    }
}

/// An owned list of string entries installed as a list-valued option.
///
/// Each list handed to the engine is tracked by the session that built it and
/// released exactly once, when the session resets or closes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderList {
    entries: Vec<String>,
}

impl HeaderList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A list holding exactly one entry.
    #[must_use]
    pub fn single(entry: impl Into<String>) -> Self {
        Self {
            entries: vec![entry.into()],
        }
    }

    pub fn append(&mut self, entry: impl Into<String>) {
        self.entries.push(entry.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains(&self, entry: &str) -> bool {
        self.entries.iter().any(|e| e == entry)
    }
}

impl<S: Into<String>> FromIterator<S> for HeaderList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// A typed option value.
#[derive(Debug, Clone, PartialEq)]
pub enum OptValue {
    Long(i64),
    Large(i64),
    Str(String),
    List(HeaderList),
}

impl OptValue {
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            OptValue::Long(_) => ValueKind::Long,
            OptValue::Large(_) => ValueKind::Large,
            OptValue::Str(_) => ValueKind::Str,
            OptValue::List(_) => ValueKind::List,
        }
    }

    /// Integer payload of a `Long` or `Large` value.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            OptValue::Long(v) | OptValue::Large(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptValue::Str(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&HeaderList> {
        match self {
            OptValue::List(list) => Some(list),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_ids_match_libcurl() {
        assert_eq!(Opt::Url.id(), 10002);
        assert_eq!(Opt::HttpHeader.id(), 10023);
        assert_eq!(Opt::NoSignal.id(), 99);
        assert_eq!(Opt::Expect100TimeoutMs.id(), 227);
        assert_eq!(Opt::InFileSize.id(), 30115);
    }

    #[test]
    fn option_kinds_follow_id_ranges() {
        assert_eq!(Opt::Verbose.kind(), ValueKind::Long);
        assert_eq!(Opt::CustomRequest.kind(), ValueKind::Str);
        assert_eq!(Opt::Resolve.kind(), ValueKind::List);
        assert_eq!(Opt::MaxFileSize.kind(), ValueKind::Large);
    }

    #[test]
    fn ids_are_unique_and_reversible() {
        for opt in Opt::ALL {
            assert_eq!(Opt::from_id(opt.id()), Some(*opt));
        }
        for info in Info::ALL {
            assert_eq!(Info::from_id(info.id()), Some(*info));
        }
        assert_eq!(Opt::from_id(-1), None);
    }

    #[test]
    fn info_kinds_follow_type_mask() {
        assert_eq!(Info::EffectiveUrl.kind(), ValueKind::Str);
        assert_eq!(Info::ResponseCode.kind(), ValueKind::Long);
        assert_eq!(Info::StartTransferTime.kind(), ValueKind::Double);
        assert_eq!(Info::TotalTime.id(), 0x30_0003);
    }
}
