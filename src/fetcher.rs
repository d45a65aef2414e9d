// src/fetcher.rs
//! HTTP body fetcher.
//!
//! Probes `scheme://host/` with a browser user agent. Each request, from
//! connection setup to the last body byte, runs under `tokio::time::timeout`
//! so a stalled peer cannot hold a worker past its deadline.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::redirect::Policy;
use reqwest::{header, Client};
use thiserror::Error;

use crate::utils::{root_url, Scheme, BROWSER_USER_AGENT};

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("HTTP request failed to '{url}': {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to '{url}' timed out after {secs}s")]
    Timeout { url: String, secs: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    pub scheme: Scheme,
    pub timeout: Duration,
    pub skip_tls_verify: bool,
}

impl FetchOptions {
    pub fn new(scheme: Scheme, timeout: Duration) -> Self {
        FetchOptions { scheme, timeout, skip_tls_verify: true }
    }
}

#[async_trait]
pub trait BodyFetcher: Send + Sync {
    async fn fetch(&self, host: &str, options: &FetchOptions) -> Result<String, FetchError>;
}

pub struct HttpFetcher {
    /// Certificate verification disabled.
    insecure: Client,
    verified: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        Ok(HttpFetcher {
            insecure: Self::build_client(false)?,
            verified: Self::build_client(true)?,
        })
    }

    fn build_client(verify_certs: bool) -> Result<Client, FetchError> {
        Client::builder()
            .danger_accept_invalid_certs(!verify_certs)
            .redirect(Policy::limited(10))
            .build()
            .map_err(FetchError::Client)
    }

    fn client_for(&self, options: &FetchOptions) -> &Client {
        if options.skip_tls_verify { &self.insecure } else { &self.verified }
    }
}

#[async_trait]
impl BodyFetcher for HttpFetcher {
    async fn fetch(&self, host: &str, options: &FetchOptions) -> Result<String, FetchError> {
        let url = root_url(options.scheme, host);
        let client = self.client_for(options);

        let request = async {
            let resp = client
                .get(&url)
                .header(header::USER_AGENT, BROWSER_USER_AGENT)
                .send()
                .await?;
            debug!("[FETCH] {} => {}", url, resp.status());
            resp.text().await
        };

        match tokio::time::timeout(options.timeout, request).await {
            Ok(Ok(body)) => Ok(body),
            Ok(Err(source)) => Err(FetchError::Request { url, source }),
            Err(_) => Err(FetchError::Timeout { url, secs: options.timeout.as_secs() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const FINGERPRINT: &str = "There isn't a GitHub Pages site here.";

    #[tokio::test]
    async fn test_silent_peer_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            // Accept and hold the socket open without ever answering.
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
        });

        let fetcher = HttpFetcher::new().unwrap();
        let options = FetchOptions::new(Scheme::Http, Duration::from_secs(1));

        let start = Instant::now();
        let result = fetcher.fetch(&addr.to_string(), &options).await;

        assert!(matches!(result, Err(FetchError::Timeout { secs: 1, .. })));
        assert!(start.elapsed() < Duration::from_secs(3), "took {:?}", start.elapsed());
    }

    #[tokio::test]
    async fn test_not_found_page_returns_body() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 404 Not Found\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                FINGERPRINT.len(),
                FINGERPRINT
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&request).to_lowercase()
        });

        let fetcher = HttpFetcher::new().unwrap();
        let options = FetchOptions::new(Scheme::Http, Duration::from_secs(5));

        let body = fetcher.fetch(&addr.to_string(), &options).await.unwrap();
        assert_eq!(body, FINGERPRINT);

        let request = server.await.unwrap();
        assert!(request.starts_with("get / http/1.1"));
        let ua_line = format!("user-agent: {}", BROWSER_USER_AGENT.to_lowercase());
        assert!(request.contains(&ua_line), "request was: {}", request);
    }
}
