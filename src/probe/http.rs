//! HTTP HEAD probe implementation.

use chrono::Utc;
use std::time::{Duration, Instant};

use crate::db::Outcome;

/// Issue a single HEAD request against `url` and classify the result.
///
/// One attempt, one timeout, one Outcome. Transport failures (timeout, DNS,
/// connection refused, TLS) fold into an Outcome with status code 0 rather
/// than an error; elapsed time covers the failure path too.
pub async fn head_probe(client: &reqwest::Client, url: &str, timeout: Duration) -> Outcome {
    let start = Instant::now();

    match client.head(url).timeout(timeout).send().await {
        Ok(response) => {
            let response_time_ms = start.elapsed().as_millis() as u64;
            let status = response.status();
            Outcome {
                status_code: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("OK").to_string(),
                response_time_ms,
                timestamp: Utc::now(),
                error: None,
            }
        }
        Err(e) => {
            let response_time_ms = start.elapsed().as_millis() as u64;
            Outcome {
                status_code: 0,
                status_text: "Network Error".to_string(),
                response_time_ms,
                timestamp: Utc::now(),
                error: Some(e.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::build_client;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    async fn one_shot_server(response: &'static [u8]) -> std::net::SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            let _ = socket.write_all(response).await;
        });
        addr
    }

    #[tokio::test]
    async fn test_head_probe_no_content() {
        let addr = one_shot_server(b"HTTP/1.1 204 No Content\r\nconnection: close\r\n\r\n").await;

        let client = build_client();
        let url = format!("http://{}", addr);
        let outcome = head_probe(&client, &url, Duration::from_secs(5)).await;

        assert_eq!(outcome.status_code, 204);
        assert!(outcome.error.is_none());
        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn test_head_probe_server_error_is_failed() {
        let addr =
            one_shot_server(b"HTTP/1.1 500 Internal Server Error\r\nconnection: close\r\n\r\n")
                .await;

        let client = build_client();
        let url = format!("http://{}", addr);
        let outcome = head_probe(&client, &url, Duration::from_secs(5)).await;

        assert_eq!(outcome.status_code, 500);
        assert!(outcome.error.is_none());
        assert!(!outcome.is_success());
    }

    #[tokio::test]
    async fn test_head_probe_connection_refused() {
        let client = build_client();
        // Port 1 is almost certainly closed.
        let outcome = head_probe(&client, "http://127.0.0.1:1", Duration::from_secs(5)).await;

        assert_eq!(outcome.status_code, 0);
        assert_eq!(outcome.status_text, "Network Error");
        assert!(outcome.error.as_deref().is_some_and(|e| !e.is_empty()));
        assert!(!outcome.is_success());
    }

    #[tokio::test]
    async fn test_head_probe_timeout() {
        // Accepts the connection, never answers.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(60)).await;
            drop(socket);
        });

        let client = build_client();
        let url = format!("http://{}", addr);
        let outcome = head_probe(&client, &url, Duration::from_millis(100)).await;

        assert_eq!(outcome.status_code, 0);
        assert_eq!(outcome.status_text, "Network Error");
        assert!(outcome.error.is_some());
    }
}
