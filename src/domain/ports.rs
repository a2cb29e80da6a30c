use crate::domain::model::{ServiceRecord, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(&self, path: &str, data: &[u8]) -> impl Future<Output = Result<()>> + Send;
}

/// HTTP 回應：狀態碼與本文，狀態碼的判斷交給呼叫端
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}

/// 文件抓取協作者。傳輸失敗回傳 `Err`，任何 HTTP 狀態都回傳 `Ok`。
pub trait DocumentFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchResponse>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn target_url(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_filename(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn github_base_url(&self) -> &str;
    fn raw_base_url(&self) -> &str;
    fn concurrent_requests(&self) -> usize;
    fn task_timeout(&self) -> Option<Duration>;
    fn request_timeout(&self) -> Option<Duration>;
    fn skip_synopsis(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<ServiceRecord>>;
    async fn transform(&self, records: Vec<ServiceRecord>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
