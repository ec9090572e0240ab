//! Fluent requests through real libcurl against a loopback axum server.

use std::net::SocketAddr;
use std::sync::mpsc;
use std::thread;

use axum::extract::Json;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use http::Method;
use serde::{Deserialize, Serialize};
use xfer::{Session, SessionConfig, Xfer};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Item {
    id: u32,
    name: String,
}

async fn create(Json(mut item): Json<Item>) -> impl IntoResponse {
    item.id += 100;
    (StatusCode::CREATED, Json(item))
}

async fn whoami(headers: HeaderMap) -> String {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("anonymous")
        .to_string()
}

fn spawn_server() -> SocketAddr {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
        runtime.block_on(async move {
            let app = Router::new()
                .route("/items", post(create))
                .route("/whoami", get(whoami))
                .route("/missing", get(|| async { StatusCode::NOT_FOUND }));
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("bind loopback");
            tx.send(listener.local_addr().expect("local addr"))
                .expect("report address");
            axum::serve(listener, app).await.expect("serve");
        });
    });
    rx.recv().expect("server address")
}

fn quiet() -> xfer::XferBuilder {
    Xfer::with_config(SessionConfig::quiet())
}

#[test]
fn test_json_post_round_trip() {
    let addr = spawn_server();
    let item = Item { id: 1, name: "widget".into() };

    let created: Item = quiet()
        .content_type(xfer::ContentType::ApplicationJson)
        .body(&item)
        .post(&format!("http://{addr}/items"))
        .expect("response")
        .error_for_status()
        .expect("2xx")
        .json()
        .expect("json");

    assert_eq!(created, Item { id: 101, name: "widget".into() });
}

#[test]
fn test_bearer_token_reaches_server() {
    let addr = spawn_server();
    let response = quiet()
        .bearer_auth("t0ken")
        .get(&format!("http://{addr}/whoami"))
        .expect("response");
    assert_eq!(response.text().expect("text"), "Bearer t0ken");
    assert!(response.timeline().total_cost >= response.timeline().dns_cost);
}

#[test]
fn test_not_found_is_a_status_error() {
    let addr = spawn_server();
    let response = quiet()
        .get(&format!("http://{addr}/missing"))
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.error_for_status().expect_err("404").is_status());
}

#[test]
fn test_shared_session_reuses_connection() {
    let addr = spawn_server();
    let mut session = Session::with_config(SessionConfig::quiet()).expect("session");

    for _ in 0..3 {
        let response = Xfer::new()
            .send_on(Method::GET, &format!("http://{addr}/whoami"), &mut session)
            .expect("response");
        assert_eq!(response.text().expect("text"), "anonymous");
    }

    assert_eq!(session.stats().snapshot().connections_opened, 1);
}

#[test]
fn test_unreachable_host_is_a_transfer_error() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr")
    };
    let err = quiet()
        .get(&format!("http://{addr}/"))
        .expect_err("refused");
    assert!(err.is_connect());
}
