// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tokio::net::TcpListener;

async fn parse(raw: &str) -> Result<String, FlinkClientError> {
    let mut reader = BufReader::new(raw.as_bytes());
    read_http_response(&mut reader).await
}

/// Serve one canned response and hand back the request that was received.
async fn serve_once(response: &'static str) -> (FlinkAddress, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 4096];
        let mut received = Vec::new();
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            received.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&received);
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .find_map(|l| {
                        let lower = l.to_ascii_lowercase();
                        lower.strip_prefix("content-length:").map(|v| v.trim().parse::<usize>())
                    })
                    .map(|v| v.unwrap())
                    .unwrap_or(0);
                if received.len() >= end + 4 + length || n == 0 {
                    break;
                }
            }
            if n == 0 {
                break;
            }
        }
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        String::from_utf8_lossy(&received).into_owned()
    });
    (FlinkAddress::new("127.0.0.1", port), handle)
}

#[tokio::test]
async fn reads_body_by_content_length() {
    let body = parse("HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\n{}trailing").await.unwrap();
    assert_eq!(body, "{}");
}

#[tokio::test]
async fn content_length_header_is_case_insensitive() {
    let body = parse("HTTP/1.1 200 OK\r\ncontent-LENGTH: 4\r\n\r\ntrue").await.unwrap();
    assert_eq!(body, "true");
}

#[tokio::test]
async fn reads_to_eof_without_content_length() {
    let body = parse("HTTP/1.1 202 Accepted\r\n\r\n{\"a\":1}").await.unwrap();
    assert_eq!(body, "{\"a\":1}");
}

#[tokio::test]
async fn error_status_carries_body() {
    let err = parse("HTTP/1.1 404 Not Found\r\nContent-Length: 11\r\n\r\nno such job").await.unwrap_err();
    assert_eq!(err, FlinkClientError::Http { status: 404, body: "no such job".to_string() });
}

#[tokio::test]
async fn garbage_status_line_is_decode_error() {
    let err = parse("hello\r\n\r\n").await.unwrap_err();
    assert!(matches!(err, FlinkClientError::Decode(_)));
}

#[tokio::test]
async fn get_sends_path_and_host() {
    let (address, server) = serve_once("HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\n[]").await;
    let body = get(&address, "/jobs/overview", Duration::from_secs(5)).await.unwrap();
    assert_eq!(body, "[]");

    let request = server.await.unwrap();
    assert!(request.starts_with("GET /jobs/overview HTTP/1.1\r\n"));
    assert!(request.contains(&format!("Host: {}\r\n", address)));
}

#[tokio::test]
async fn post_sends_json_body() {
    let (address, server) = serve_once("HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n").await;
    post(&address, "/jars/x/run", "{\"k\":true}", Duration::from_secs(5)).await.unwrap();

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /jars/x/run HTTP/1.1\r\n"));
    assert!(request.contains("Content-Type: application/json\r\n"));
    assert!(request.contains("Content-Length: 10\r\n"));
    assert!(request.ends_with("{\"k\":true}"));
}

#[tokio::test]
async fn patch_has_empty_body() {
    let (address, server) = serve_once("HTTP/1.1 202 Accepted\r\nContent-Length: 2\r\n\r\n{}").await;
    patch(&address, "/jobs/abc?mode=cancel", Duration::from_secs(5)).await.unwrap();

    let request = server.await.unwrap();
    assert!(request.starts_with("PATCH /jobs/abc?mode=cancel HTTP/1.1\r\n"));
    assert!(request.contains("Content-Length: 0\r\n"));
}

#[tokio::test]
async fn refused_connection_is_connect_error() {
    // Bind then drop to get a port nobody listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let err = get(&FlinkAddress::new("127.0.0.1", port), "/", Duration::from_secs(5))
        .await
        .unwrap_err();
    assert!(matches!(err, FlinkClientError::Connect(_)));
}

#[tokio::test]
async fn silent_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = FlinkAddress::new("127.0.0.1", listener.local_addr().unwrap().port());
    let _server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(60)).await;
        drop(socket);
    });

    let err = get(&address, "/jobs", Duration::from_millis(100)).await.unwrap_err();
    assert_eq!(err, FlinkClientError::Timeout);
}
