use std::time::Duration;

use reqwest::{Client, StatusCode};

use super::{FetchError, StatsSource};

#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .tcp_nodelay(true)
            .pool_max_idle_per_host(1)
            .build()
            .map_err(FetchError::Client)?;
        Ok(HttpSource {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl StatsSource for HttpSource {
    async fn fetch(&self) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: self.url.clone(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(FetchError::Body)?;
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    /// Serves one canned HTTP response on a loopback port and returns its URL.
    async fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 1024];
            let _ = stream.read(&mut request).await;
            stream.write_all(response.as_bytes()).await.unwrap();
            let _ = stream.shutdown().await;
        });
        format!("http://{addr}/_stats")
    }

    #[test]
    fn builds_client_for_url() {
        let source = HttpSource::new("http://127.0.0.1:9/_stats", Duration::from_millis(50)).unwrap();
        assert_eq!(source.url(), "http://127.0.0.1:9/_stats");
    }

    #[tokio::test]
    async fn unreachable_host_is_a_request_error() {
        // Port 9 (discard) is not expected to serve HTTP locally.
        let source = HttpSource::new("http://127.0.0.1:9/_stats", Duration::from_millis(200)).unwrap();
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, FetchError::Request { .. }), "{err}");
    }

    #[tokio::test]
    async fn non_200_is_a_status_error() {
        let url = serve_once(
            "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;
        let source = HttpSource::new(url, Duration::from_secs(5)).unwrap();
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, FetchError::Status(503)), "{err}");
    }

    #[tokio::test]
    async fn non_ok_success_status_is_rejected() {
        let url = serve_once(
            "HTTP/1.1 204 No Content\r\nConnection: close\r\n\r\n",
        )
        .await;
        let source = HttpSource::new(url, Duration::from_secs(5)).unwrap();
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, FetchError::Status(204)), "{err}");
    }

    #[tokio::test]
    async fn ok_response_returns_body_bytes() {
        let url = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Length: 13\r\nConnection: close\r\n\r\n1,2,3,4,5,6,7",
        )
        .await;
        let source = HttpSource::new(url, Duration::from_secs(5)).unwrap();
        let body = source.fetch().await.unwrap();
        assert_eq!(body, b"1,2,3,4,5,6,7");
    }
}
