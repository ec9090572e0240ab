//! Round-trips through real libcurl against a loopback axum server.

use std::io::Cursor;
use std::net::SocketAddr;
use std::sync::mpsc;
use std::thread;

use axum::Router;
use axum::body::Bytes;
use axum::http::{HeaderMap, Method, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{any, get};
use xfer_client::config::SessionConfig;
use xfer_client::{Session, TransferCode};

async fn echo(method: Method, headers: HeaderMap, body: Bytes) -> impl IntoResponse {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("none")
        .to_string();
    let expect = headers.contains_key(header::EXPECT).to_string();
    (
        [
            ("x-method", method.to_string()),
            ("x-received-type", content_type),
            ("x-saw-expect", expect),
        ],
        body,
    )
}

async fn moved() -> impl IntoResponse {
    (StatusCode::FOUND, [(header::LOCATION, "/hello")], "")
}

fn app() -> Router {
    Router::new()
        .route("/hello", get(|| async { "hello" }))
        .route("/echo", any(echo))
        .route("/redirect", get(moved))
}

fn spawn_server() -> SocketAddr {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("bind loopback");
            tx.send(listener.local_addr().expect("local addr"))
                .expect("report address");
            axum::serve(listener, app()).await.expect("serve");
        });
    });
    rx.recv().expect("server address")
}

fn quiet_session() -> Session {
    Session::with_config(SessionConfig::quiet()).expect("session")
}

#[test]
fn test_get_round_trip() {
    let addr = spawn_server();
    let mut session = quiet_session();
    session.set_url(&format!("http://{addr}/hello")).expect("url");

    let outcome = session.perform_fully().expect("perform");
    assert_eq!(outcome.code, TransferCode::OK);
    assert_eq!(outcome.body, b"hello");
    assert_eq!(session.response_code().expect("status"), 200);

    let head = outcome.head();
    assert_eq!(head.status, Some(StatusCode::OK));
    assert_eq!(outcome.timeline.phases_sum(), outcome.timeline.total_cost);
}

#[test]
fn test_post_with_custom_verb_and_body() {
    let addr = spawn_server();
    let mut session = quiet_session();
    session.set_url(&format!("http://{addr}/echo")).expect("url");
    session.set_verb("POST").expect("verb");
    session
        .set_request_body(&b"{\"name\":\"xfer\"}"[..], "application/json")
        .expect("body");

    let outcome = session.perform_fully().expect("perform");
    assert!(outcome.is_success());
    assert_eq!(outcome.body, b"{\"name\":\"xfer\"}");

    let head = outcome.head();
    assert_eq!(head.headers["x-method"], "POST");
    assert_eq!(head.headers["x-received-type"], "application/json");
    assert_eq!(head.headers["x-saw-expect"], "false");
}

#[test]
fn test_put_stream_upload() {
    let addr = spawn_server();
    let payload: Vec<u8> = (0..200_000u32).map(|i| (i % 253) as u8).collect();
    let mut session = quiet_session();
    session.set_url(&format!("http://{addr}/echo")).expect("url");
    session
        .set_request_stream(
            Cursor::new(payload.clone()),
            "application/octet-stream",
            payload.len() as u64,
        )
        .expect("stream");

    let outcome = session.perform_fully().expect("perform");
    assert!(outcome.is_success());
    assert_eq!(outcome.head().headers["x-method"], "PUT");
    assert_eq!(outcome.body.len(), payload.len());
    assert_eq!(outcome.body, payload);
}

#[test]
fn test_redirect_is_reported_not_followed() {
    let addr = spawn_server();
    let mut session = quiet_session();
    session.set_url(&format!("http://{addr}/redirect")).expect("url");

    let outcome = session.perform_fully().expect("perform");
    assert!(outcome.is_success());
    assert_eq!(session.response_code().expect("status"), 302);
    assert_eq!(outcome.head().headers["location"], "/hello");
}

#[test]
fn test_redirect_followed_when_configured() {
    let addr = spawn_server();
    let config = SessionConfig::builder()
        .verbose(false)
        .follow_redirects(5)
        .build()
        .expect("config");
    let mut session = Session::with_config(config).expect("session");
    session.set_url(&format!("http://{addr}/redirect")).expect("url");

    let outcome = session.perform_fully().expect("perform");
    assert_eq!(outcome.body, b"hello");
    assert_eq!(session.response_code().expect("status"), 200);
    let effective = session.effective_url().expect("info").expect("effective url");
    assert!(effective.ends_with("/hello"), "{effective}");
}

#[test]
fn test_keep_alive_reuses_the_connection() {
    let addr = spawn_server();
    let url = format!("http://{addr}/hello");
    let mut session = quiet_session();

    let mut opened = Vec::new();
    for _ in 0..3 {
        // the post-transfer reset clears the URL, so set it every time
        session.set_url(&url).expect("url");
        let outcome = session.perform_fully().expect("perform");
        assert_eq!(outcome.body, b"hello");
        opened.push(session.connection_count().expect("connections"));
    }

    assert_eq!(opened[0], 1);
    assert!(opened[1..].iter().all(|&n| n == 0), "{opened:?}");
    assert_eq!(session.stats().snapshot().transfers, 3);
}

#[test]
fn test_refused_connection_returns_code() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr")
    };
    let mut session = quiet_session();
    session.set_url(&format!("http://{addr}/")).expect("url");

    let outcome = session.perform_fully().expect("outcome");
    assert_eq!(outcome.code, TransferCode::COULDNT_CONNECT);
    assert!(!session.str_error(outcome.code).is_empty());
    assert_eq!(session.stats().snapshot().failed_transfers, 1);
}

#[test]
fn test_verbose_session_still_transfers() {
    let addr = spawn_server();
    let mut session = Session::new();
    session.set_url(&format!("http://{addr}/hello")).expect("url");
    let outcome = session.perform_fully().expect("perform");
    assert_eq!(outcome.body, b"hello");
}
