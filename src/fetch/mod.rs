pub mod http;
pub mod retry;

use std::future::Future;

use thiserror::Error;

pub use http::HttpSource;
pub use retry::{RetryError, RetryPolicy};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("received non-200 response: {0}")]
    Status(u16),
    #[error("error reading response body: {0}")]
    Body(#[source] reqwest::Error),
}

/// Something that can hand back one raw stats payload per call.
///
/// Implementations make a single attempt; retrying is left to [`RetryPolicy`].
pub trait StatsSource {
    fn fetch(&self) -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send;
}
