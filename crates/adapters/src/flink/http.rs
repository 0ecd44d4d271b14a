// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Minimal HTTP/1.1 over TCP for the Flink REST API.
//!
//! Responses are framed by Content-Length. Requests ask for the connection
//! to be closed, so a response without Content-Length is read to EOF.

use super::{FlinkAddress, FlinkClientError};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

pub(super) async fn get(
    address: &FlinkAddress,
    path: &str,
    timeout: Duration,
) -> Result<String, FlinkClientError> {
    let request = format!(
        "GET {} HTTP/1.1\r\nHost: {}\r\nAccept: application/json\r\nConnection: close\r\n\r\n",
        path, address
    );
    timed_request(address, &request, timeout).await
}

pub(super) async fn post(
    address: &FlinkAddress,
    path: &str,
    body: &str,
    timeout: Duration,
) -> Result<String, FlinkClientError> {
    let request = format!(
        "POST {} HTTP/1.1\r\nHost: {}\r\nAccept: application/json\r\nConnection: close\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
        path,
        address,
        body.len(),
        body
    );
    timed_request(address, &request, timeout).await
}

pub(super) async fn patch(
    address: &FlinkAddress,
    path: &str,
    timeout: Duration,
) -> Result<String, FlinkClientError> {
    let request = format!(
        "PATCH {} HTTP/1.1\r\nHost: {}\r\nAccept: application/json\r\nConnection: close\r\nContent-Length: 0\r\n\r\n",
        path, address
    );
    timed_request(address, &request, timeout).await
}

/// The timeout covers connect, write and read together.
async fn timed_request(
    address: &FlinkAddress,
    request: &str,
    timeout: Duration,
) -> Result<String, FlinkClientError> {
    tokio::time::timeout(timeout, send_request(address, request))
        .await
        .map_err(|_| FlinkClientError::Timeout)?
}

async fn send_request(address: &FlinkAddress, request: &str) -> Result<String, FlinkClientError> {
    let mut stream = TcpStream::connect((address.host.as_str(), address.port))
        .await
        .map_err(|e| FlinkClientError::Connect(format!("{}: {}", address, e)))?;
    stream
        .write_all(request.as_bytes())
        .await
        .map_err(|e| FlinkClientError::Io(format!("write failed: {}", e)))?;

    let mut reader = BufReader::new(&mut stream);
    read_http_response(&mut reader).await
}

/// Read and parse an HTTP/1.1 response from a buffered stream.
pub(super) async fn read_http_response<R: tokio::io::AsyncRead + Unpin>(
    reader: &mut BufReader<R>,
) -> Result<String, FlinkClientError> {
    let mut status_line = String::new();
    reader
        .read_line(&mut status_line)
        .await
        .map_err(|e| FlinkClientError::Io(format!("read status failed: {}", e)))?;

    let status_code = status_line
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse::<u16>().ok())
        .ok_or_else(|| FlinkClientError::Decode(format!("bad status line: {}", status_line.trim())))?;

    // Content-Length is matched case-insensitively
    let mut content_length: Option<usize> = None;
    loop {
        let mut line = String::new();
        reader
            .read_line(&mut line)
            .await
            .map_err(|e| FlinkClientError::Io(format!("read header failed: {}", e)))?;
        if line == "\r\n" || line.is_empty() {
            break;
        }
        let line_lower = line.to_ascii_lowercase();
        if let Some(val) = line_lower.strip_prefix("content-length:") {
            content_length = val.trim().parse().ok();
        }
    }

    let body = match content_length {
        Some(0) => String::new(),
        Some(len) => {
            let mut buf = vec![0u8; len];
            reader
                .read_exact(&mut buf)
                .await
                .map_err(|e| FlinkClientError::Io(format!("read body failed: {}", e)))?;
            String::from_utf8_lossy(&buf).into_owned()
        }
        None => {
            let mut buf = Vec::new();
            reader
                .read_to_end(&mut buf)
                .await
                .map_err(|e| FlinkClientError::Io(format!("read body failed: {}", e)))?;
            String::from_utf8_lossy(&buf).into_owned()
        }
    };

    if status_code >= 400 {
        return Err(FlinkClientError::Http { status: status_code, body: body.trim().to_string() });
    }

    Ok(body)
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
