//! Response header parsing using standard http crate types
//!
//! The header role receives every header line of every response in a transfer,
//! including interim `100 Continue` responses and the responses of followed
//! redirects. Only the last block describes the response the body belongs to.

use http::{HeaderMap, HeaderName, HeaderValue, StatusCode, Version};

/// Status line and headers of the final response in a header capture.
#[derive(Debug, Clone, Default)]
pub struct ResponseHead {
    pub status: Option<StatusCode>,
    pub version: Option<Version>,
    pub reason: Option<String>,
    pub headers: HeaderMap,
}

/// Parses captured header bytes into the head of the final response.
///
/// Lines that are not valid headers are skipped. Folded continuation lines
/// are joined to the preceding header with a single space.
///
/// # Examples
/// ```
/// use xfer_client::http::parse_header_block;
///
/// let raw = b"HTTP/1.1 302 Found\r\nLocation: /next\r\n\r\n\
///             HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n\r\n";
/// let head = parse_header_block(raw);
/// assert_eq!(head.status.map(|s| s.as_u16()), Some(200));
/// assert!(head.headers.get("location").is_none());
/// ```
#[must_use]
pub fn parse_header_block(raw: &[u8]) -> ResponseHead {
    let text = String::from_utf8_lossy(raw);
    let mut head = ResponseHead::default();
    let mut pending: Option<(HeaderName, String)> = None;

    for line in text.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l)) {
        if line.starts_with("HTTP/") {
            // A new response starts; drop everything seen so far
            pending = None;
            head = ResponseHead::default();
            parse_status_line(line, &mut head);
            continue;
        }

        if line.is_empty() {
            flush(&mut head.headers, pending.take());
            continue;
        }

        if line.starts_with([' ', '\t']) {
            if let Some((_, value)) = pending.as_mut() {
                value.push(' ');
                value.push_str(line.trim());
            }
            continue;
        }

        flush(&mut head.headers, pending.take());
        let Some((name, value)) = line.split_once(':') else {
            tracing::trace!("skipping malformed header line: {line:?}");
            continue;
        };
        match HeaderName::from_bytes(name.trim().as_bytes()) {
            Ok(name) => pending = Some((name, value.trim().to_string())),
            Err(_) => tracing::trace!("skipping invalid header name: {name:?}"),
        }
    }
    flush(&mut head.headers, pending);
    head
}

fn parse_status_line(line: &str, head: &mut ResponseHead) {
    let mut parts = line.splitn(3, ' ');
    head.version = parts.next().and_then(|v| match v {
        "HTTP/0.9" => Some(Version::HTTP_09),
        "HTTP/1.0" => Some(Version::HTTP_10),
        "HTTP/1.1" => Some(Version::HTTP_11),
        "HTTP/2" | "HTTP/2.0" => Some(Version::HTTP_2),
        "HTTP/3" | "HTTP/3.0" => Some(Version::HTTP_3),
        _ => None,
    });
    head.status = parts
        .next()
        .and_then(|code| StatusCode::from_bytes(code.as_bytes()).ok());
    head.reason = parts
        .next()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_owned);
}

fn flush(headers: &mut HeaderMap, pending: Option<(HeaderName, String)>) {
    if let Some((name, value)) = pending {
        match HeaderValue::from_str(&value) {
            Ok(value) => {
                headers.append(name, value);
            }
            Err(_) => tracing::trace!("skipping invalid value for header {name}"),
        }
    }
}
