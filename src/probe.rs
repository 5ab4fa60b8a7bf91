//! Keep-alive probe: a reachability pre-check plus one HEAD request.
//!
//! The pre-check opens (and immediately drops) a TCP connection to a public
//! DNS resolver. Only when that succeeds is the HEAD request sent. Any failure
//! along the way collapses into a single `AppError::Probe`.

use std::future::Future;
use std::time::Duration;

use tokio::net::TcpStream;

use crate::config;
use crate::error::AppError;

/// One keep-alive probe. Resolves to the estimated byte cost on success.
pub trait Probe: Send + Sync + 'static {
    fn probe(&self) -> impl Future<Output = Result<u64, AppError>> + Send;
}

/// Returns true if a TCP connection to `target` completes within `timeout`.
pub async fn check_reachable(target: &str, timeout: Duration) -> bool {
    connects_within(target, timeout, TcpStream::connect(target)).await
}

async fn connects_within<T, F>(target: &str, timeout: Duration, connect: F) -> bool
where
    F: Future<Output = std::io::Result<T>>,
{
    match tokio::time::timeout(timeout, connect).await {
        Ok(Ok(_stream)) => true,
        Ok(Err(e)) => {
            tracing::debug!("Reachability check to {target} failed: {e}");
            false
        }
        Err(_) => {
            tracing::debug!("Reachability check to {target} timed out after {timeout:?}");
            false
        }
    }
}

/// Production probe backed by `reqwest`.
pub struct HttpProbe {
    client: reqwest::Client,
    reachability_target: String,
    reachability_timeout: Duration,
    url: String,
    cost_bytes: u64,
}

impl HttpProbe {
    /// Probe against the fixed public endpoints from [`config`].
    pub fn new() -> Result<Self, AppError> {
        Self::with_endpoints(config::REACHABILITY_TARGET, config::PROBE_URL)
    }

    /// Probe against custom endpoints, keeping the standard timeouts and cost.
    pub fn with_endpoints(
        reachability_target: impl Into<String>,
        url: impl Into<String>,
    ) -> Result<Self, AppError> {
        let client = Self::client_builder().build()?;
        Ok(Self::from_parts(client, reachability_target, url))
    }

    /// Same as [`with_endpoints`](Self::with_endpoints) but bypassing any
    /// proxy from the environment, for loopback test servers.
    #[cfg(test)]
    fn direct(reachability_target: impl Into<String>, url: impl Into<String>) -> Self {
        let client = Self::client_builder().no_proxy().build().unwrap();
        Self::from_parts(client, reachability_target, url)
    }

    fn client_builder() -> reqwest::ClientBuilder {
        reqwest::Client::builder().timeout(Duration::from_secs(config::REQUEST_TIMEOUT_SECS))
    }

    fn from_parts(
        client: reqwest::Client,
        reachability_target: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            reachability_target: reachability_target.into(),
            reachability_timeout: Duration::from_secs(config::REACHABILITY_TIMEOUT_SECS),
            url: url.into(),
            cost_bytes: config::PROBE_COST_BYTES,
        }
    }

    async fn send_head(&self) -> Result<(), AppError> {
        let response = self.client.head(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Probe(format!(
                "{} answered with status {status}",
                self.url
            )));
        }
        Ok(())
    }
}

impl Probe for HttpProbe {
    async fn probe(&self) -> Result<u64, AppError> {
        if !check_reachable(&self.reachability_target, self.reachability_timeout).await {
            return Err(AppError::Probe(format!(
                "Network unreachable ({})",
                self.reachability_target
            )));
        }
        self.send_head().await?;
        Ok(self.cost_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve a fixed HTTP status line to every connection.
    async fn serve_status(status_line: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                tokio::spawn(async move {
                    let mut buf = [0u8; 1024];
                    let _ = socket.read(&mut buf).await;
                    let response =
                        format!("HTTP/1.1 {status_line}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });
        addr.to_string()
    }

    async fn closed_port() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        addr.to_string()
    }

    #[tokio::test]
    async fn test_check_reachable_open_port() {
        let addr = serve_status("204 No Content").await;
        assert!(check_reachable(&addr, Duration::from_secs(2)).await);
    }

    #[tokio::test]
    async fn test_check_reachable_closed_port() {
        let addr = closed_port().await;
        assert!(!check_reachable(&addr, Duration::from_secs(2)).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_check_reachable_gives_up_after_timeout() {
        let timeout = Duration::from_secs(config::REACHABILITY_TIMEOUT_SECS);
        let started = tokio::time::Instant::now();
        let stalled = std::future::pending::<std::io::Result<()>>();
        assert!(!connects_within("10.255.255.1:53", timeout, stalled).await);
        let elapsed = started.elapsed();
        assert!(elapsed >= timeout && elapsed < timeout + Duration::from_millis(10));
    }

    #[tokio::test]
    async fn test_probe_success_reports_flat_cost() {
        let addr = serve_status("204 No Content").await;
        let probe = HttpProbe::direct(addr.clone(), format!("http://{addr}/generate_204"));
        assert_eq!(probe.probe().await.unwrap(), config::PROBE_COST_BYTES);
    }

    #[tokio::test]
    async fn test_probe_error_status_is_failure() {
        let addr = serve_status("503 Service Unavailable").await;
        let probe = HttpProbe::direct(addr.clone(), format!("http://{addr}/"));
        let err = probe.probe().await.unwrap_err();
        assert_eq!(err.kind(), "Probe");
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn test_probe_skips_request_when_unreachable() {
        let unreachable = closed_port().await;
        let probe = HttpProbe::direct(unreachable, "http://127.0.0.1:9/never");
        let err = probe.probe().await.unwrap_err();
        assert!(err.to_string().contains("unreachable"));
    }
}
