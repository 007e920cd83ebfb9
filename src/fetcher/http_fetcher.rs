use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::app::{CaptionFeedError, Result};
use crate::config::UpstreamConfig;
use crate::fetcher::Fetcher;

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .gzip(true)
            .brotli(true)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| CaptionFeedError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(CaptionFeedError::Transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(CaptionFeedError::UpstreamStatus(status));
        }

        let body = response
            .bytes()
            .await
            .map_err(CaptionFeedError::BodyRead)?;

        Ok(body.to_vec())
    }
}
