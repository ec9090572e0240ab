use std::io::Cursor;
use std::time::Duration;

use http::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use xfer::{ContentType, Session, TransferCode, Xfer};
use xfer_client::{Opt, ScriptedEngine, ScriptedResponse, TimingSamples, TransferRecord};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct User {
    id: u32,
    name: String,
}

fn scripted<const N: usize>(responses: [ScriptedResponse; N]) -> Session<ScriptedEngine> {
    Session::from_engine(ScriptedEngine::with_script(responses))
}

fn last_record(session: &Session<ScriptedEngine>) -> TransferRecord {
    session
        .engine()
        .and_then(ScriptedEngine::last_record)
        .cloned()
        .expect("a transfer ran")
}

#[test]
fn test_get_decodes_json() {
    let mut session = scripted([ScriptedResponse::ok()
        .header("Content-Type", "application/json")
        .body(r#"{"id":7,"name":"xfer"}"#)]);

    let response = Xfer::json()
        .accept(ContentType::ApplicationJson)
        .send_on(Method::GET, "http://api.test/users/7", &mut session)
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.is_success());
    assert_eq!(response.header("content-type"), Some("application/json"));
    assert_eq!(
        response.json::<User>().expect("json"),
        User { id: 7, name: "xfer".into() }
    );
    assert_eq!(response.effective_url(), Some("http://api.test/users/7"));

    let record = last_record(&session);
    assert_eq!(record.long(Opt::HttpGet), Some(1));
    assert_eq!(record.string(Opt::CustomRequest), None);
    assert_eq!(record.request_header("accept"), Some("application/json"));
    assert!(record.request_headers().contains(&"Expect:"));
}

#[test]
fn test_bodyless_request_sends_no_content_type() {
    let mut session = scripted([ScriptedResponse::ok(), ScriptedResponse::ok()]);

    Xfer::json()
        .send_on(Method::GET, "http://api.test/users", &mut session)
        .expect("get");
    let record = last_record(&session);
    assert_eq!(record.request_header("content-type"), None);
    assert!(record.request_headers().contains(&"Expect:"));

    Xfer::json()
        .send_on(Method::DELETE, "http://api.test/users/7", &mut session)
        .expect("delete");
    assert_eq!(last_record(&session).request_header("content-type"), None);
}

#[test]
fn test_post_serializes_json_body() {
    let mut session = scripted([ScriptedResponse::ok().status(201, "Created")]);
    let user = User { id: 1, name: "new".into() };

    let response = Xfer::json()
        .body(&user)
        .send_on(Method::POST, "http://api.test/users", &mut session)
        .expect("response");
    assert_eq!(response.status(), StatusCode::CREATED);

    let record = last_record(&session);
    assert_eq!(record.string(Opt::CustomRequest), Some("POST"));
    assert_eq!(record.long(Opt::Upload), Some(1));
    assert_eq!(record.request_header("content-type"), Some("application/json"));
    assert_eq!(record.uploaded, serde_json::to_vec(&user).expect("json"));
}

#[test]
fn test_body_defaults_to_json_content_type() {
    let mut session = scripted([ScriptedResponse::ok()]);

    Xfer::new()
        .body(&[1, 2, 3])
        .send_on(Method::PUT, "http://api.test/numbers", &mut session)
        .expect("response");

    let record = last_record(&session);
    assert_eq!(record.request_header("content-type"), Some("application/json"));
    assert_eq!(record.uploaded, b"[1,2,3]");
}

#[test]
fn test_form_body_is_urlencoded() {
    let mut session = scripted([ScriptedResponse::ok()]);

    Xfer::form_urlencoded()
        .body(&[("q", "rust curl"), ("page", "2")])
        .send_on(Method::POST, "http://api.test/search", &mut session)
        .expect("response");

    let record = last_record(&session);
    assert_eq!(
        record.request_header("content-type"),
        Some("application/x-www-form-urlencoded")
    );
    assert_eq!(record.uploaded, b"q=rust+curl&page=2");
}

#[test]
fn test_text_and_stream_bodies() {
    let mut session = scripted([ScriptedResponse::ok(), ScriptedResponse::ok()]);

    Xfer::new()
        .text_body("hello")
        .send_on(Method::POST, "http://api.test/notes", &mut session)
        .expect("text");
    let record = last_record(&session);
    assert_eq!(record.request_header("content-type"), Some("text/plain"));
    assert_eq!(record.uploaded, b"hello");

    let payload = vec![9u8; 40_000];
    Xfer::new()
        .content_type(ContentType::ApplicationOctetStream)
        .stream_body(Cursor::new(payload.clone()), payload.len() as u64)
        .send_on(Method::PUT, "http://api.test/blob", &mut session)
        .expect("stream");
    let record = last_record(&session);
    assert_eq!(record.string(Opt::CustomRequest), Some("PUT"));
    assert_eq!(record.uploaded, payload);
    assert_eq!(
        record.request_header("content-type"),
        Some("application/octet-stream")
    );
}

#[test]
fn test_head_sends_no_body_request() {
    let mut session = scripted([ScriptedResponse::ok()
        .header("Content-Length", "12")
        .body("not returned")]);

    let response = Xfer::new()
        .send_on(Method::HEAD, "http://api.test/file", &mut session)
        .expect("response");

    assert!(response.body().is_empty());
    assert_eq!(response.header("content-length"), Some("12"));
    let record = last_record(&session);
    assert_eq!(record.long(Opt::Nobody), Some(1));
    assert_eq!(record.string(Opt::CustomRequest), Some("HEAD"));
}

#[test]
fn test_auth_headers() {
    let mut session = scripted([ScriptedResponse::ok(), ScriptedResponse::ok()]);

    Xfer::new()
        .basic_auth("aladdin", "opensesame")
        .api_key("k-123")
        .send_on(Method::GET, "http://api.test/", &mut session)
        .expect("basic");
    let record = last_record(&session);
    assert_eq!(
        record.request_header("authorization"),
        Some("Basic YWxhZGRpbjpvcGVuc2VzYW1l")
    );
    assert_eq!(record.request_header("x-api-key"), Some("k-123"));

    Xfer::new()
        .bearer_auth("abc")
        .send_on(Method::GET, "http://api.test/", &mut session)
        .expect("bearer");
    let record = last_record(&session);
    assert_eq!(record.request_header("authorization"), Some("Bearer abc"));
    assert_eq!(record.request_header("x-api-key"), None);
}

#[test]
fn test_later_header_replaces_earlier() {
    let mut session = scripted([ScriptedResponse::ok()]);

    Xfer::new()
        .user_agent("first/1")
        .headers([("x-trace", "1"), ("User-Agent", "second/2")])
        .send_on(Method::GET, "http://api.test/", &mut session)
        .expect("response");

    let record = last_record(&session);
    assert_eq!(record.request_header("user-agent"), Some("second/2"));
    assert_eq!(record.request_header("x-trace"), Some("1"));
}

#[test]
fn test_invalid_header_fails_before_transfer() {
    let mut session = scripted([ScriptedResponse::ok()]);

    let err = Xfer::new()
        .headers([("x-bad", "a\r\nb")])
        .send_on(Method::GET, "http://api.test/", &mut session)
        .expect_err("invalid header");
    assert!(err.is_builder());
    assert_eq!(session.engine().map(ScriptedEngine::pending), Some(1));
}

#[test]
fn test_invalid_url_leaves_session_clean() {
    let mut session = scripted([ScriptedResponse::ok()]);

    let err = Xfer::new()
        .api_key("secret")
        .send_on(Method::GET, "not a url", &mut session)
        .expect_err("invalid url");
    assert!(err.is_builder());
    assert_eq!(session.request_headers().count(), 0);

    Xfer::new()
        .send_on(Method::GET, "http://api.test/", &mut session)
        .expect("session still usable");
    assert_eq!(last_record(&session).request_header("x-api-key"), None);
}

#[test]
fn test_transfer_failure_becomes_error() {
    let mut session = scripted([ScriptedResponse::failure(TransferCode::OPERATION_TIMEDOUT)]);

    let err = Xfer::new()
        .send_on(Method::GET, "http://api.test/slow", &mut session)
        .expect_err("timeout");
    assert!(err.is_transfer());
    assert!(err.is_timeout());
    assert_eq!(err.transfer_code(), Some(TransferCode::OPERATION_TIMEDOUT));
    assert_eq!(err.url(), Some("http://api.test/slow"));
    assert!(session.is_live());
}

#[test]
fn test_error_status_is_a_response_until_checked() {
    let mut session = scripted([ScriptedResponse::ok().status(503, "Service Unavailable")]);

    let response = Xfer::new()
        .send_on(Method::DELETE, "http://api.test/items/1", &mut session)
        .expect("response");
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let err = response.error_for_status().expect_err("5xx");
    assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
    assert_eq!(
        last_record(&session).string(Opt::CustomRequest),
        Some("DELETE")
    );
}

#[test]
fn test_response_carries_timeline() {
    let mut session = scripted([ScriptedResponse::ok()
        .timings(TimingSamples::from_millis(5, 15, 16, 40, 55))]);

    let response = Xfer::new()
        .send_on(Method::GET, "http://api.test/", &mut session)
        .expect("response");

    let timeline = response.timeline();
    assert_eq!(timeline.dns_cost, 5);
    assert_eq!(timeline.total_cost, 55);
    assert_eq!(timeline.phases_sum(), timeline.total_cost);
}

#[test]
fn test_closed_session_is_rejected() {
    let mut session = scripted([ScriptedResponse::ok()]);
    session.close();

    let err = Xfer::new()
        .send_on(Method::GET, "http://api.test/", &mut session)
        .expect_err("closed");
    assert!(err.is_closed());
}

#[test]
fn test_builder_options_shape_config() {
    let builder = Xfer::new()
        .timeout(Duration::from_secs(10))
        .connect_timeout(Duration::from_secs(2))
        .follow_redirects(3);

    let config = builder.config();
    assert_eq!(config.timeout, Some(Duration::from_secs(10)));
    assert_eq!(config.connect_timeout, Some(Duration::from_secs(2)));
    assert!(config.follow_location);
    assert_eq!(config.max_redirects, Some(3));
}

#[test]
fn test_invalid_config_is_reported_by_send() {
    let err = Xfer::new()
        .timeout(Duration::ZERO)
        .get("http://127.0.0.1:9/")
        .expect_err("invalid config");
    assert!(err.is_builder());
}
