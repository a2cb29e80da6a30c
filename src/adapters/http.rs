use crate::domain::ports::{DocumentFetcher, FetchResponse};
use crate::utils::error::Result;
use reqwest::Client;
use std::time::Duration;

const USER_AGENT: &str = concat!("star-catalog/", env!("CARGO_PKG_VERSION"));

/// 以 reqwest 實作的文件抓取器
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(request_timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().user_agent(USER_AGENT);

        // 預設不設超時，沿用 reqwest 的行為
        if let Some(timeout) = request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResponse> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        tracing::debug!("GET {} -> {} ({} bytes)", url, status, body.len());

        Ok(FetchResponse { status, body })
    }
}
