use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with status {status}")]
    Status { url: String, status: StatusCode },
    #[error("writing download of {url} failed: {source}")]
    Io {
        url: String,
        #[source]
        source: std::io::Error,
    },
}

/// Downloads a remote resource into a local file.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Writes the body of `url` to `dest`. On error `dest` may hold a partial body.
    async fn download(&self, url: &str, dest: &Path) -> Result<(), FetchError>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn download(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        if response.status() != StatusCode::OK {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status(),
            });
        }

        let io_err = |source| FetchError::Io {
            url: url.to_string(),
            source,
        };
        let mut file = File::create(dest).await.map_err(io_err)?;
        let mut written = 0usize;
        while let Some(chunk) = response.chunk().await.map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })? {
            file.write_all(&chunk).await.map_err(io_err)?;
            written += chunk.len();
        }
        file.flush().await.map_err(io_err)?;

        debug!("Downloaded {written} bytes from {url}");
        Ok(())
    }
}
