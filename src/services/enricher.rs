use crate::domain::model::{ServiceRecord, Synopsis};
use crate::domain::ports::DocumentFetcher;
use crate::services::resolver::GitHubHosts;
use crate::services::synopsis::fetch_synopsis;
use crate::utils::error::EtlError;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Semaphore};

pub const DEFAULT_CONCURRENCY: usize = 10;

#[derive(Debug, Clone)]
pub struct EnricherOptions {
    pub concurrency: usize,
    /// 單一工作的逾時；預設不限制
    pub task_timeout: Option<Duration>,
}

impl Default for EnricherOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            task_timeout: None,
        }
    }
}

#[derive(Debug)]
pub struct EnrichmentReport {
    pub records: Vec<ServiceRecord>,
    /// 最後仍是診斷字串（非摘要）的筆數
    pub diagnostics: usize,
    /// 中途 panic 的工作數
    pub crashed: usize,
}

#[derive(Debug)]
struct EnrichmentMessage {
    url: String,
    synopsis: Synopsis,
}

/// 以固定並發數為每筆服務抓取 README 摘要。
///
/// 每個工作只透過 channel 回傳 `(url, synopsis)`，由單一收集者依 URL 寫回紀錄。
/// 單筆失敗（包含 panic）不影響其他紀錄，且所有工作都完成後才回傳。
pub struct Enricher<F> {
    fetcher: Arc<F>,
    hosts: GitHubHosts,
    options: EnricherOptions,
}

impl<F: DocumentFetcher + 'static> Enricher<F> {
    pub fn new(fetcher: Arc<F>, hosts: GitHubHosts, options: EnricherOptions) -> Self {
        Self {
            fetcher,
            hosts,
            options,
        }
    }

    pub async fn enrich(&self, mut records: Vec<ServiceRecord>) -> EnrichmentReport {
        let total = records.len();
        let concurrency = self.options.concurrency.max(1);
        tracing::info!(
            "📝 Fetching synopses for {} services ({} concurrent)",
            total,
            concurrency
        );

        let semaphore = Arc::new(Semaphore::new(concurrency));
        let (tx, mut rx) = mpsc::channel::<EnrichmentMessage>(total.max(1));
        let mut handles = Vec::with_capacity(total);

        for record in &records {
            let url = record.url().to_string();
            let fetcher = Arc::clone(&self.fetcher);
            let hosts = self.hosts.clone();
            let semaphore = Arc::clone(&semaphore);
            let tx = tx.clone();
            let task_timeout = self.options.task_timeout;

            let handle = tokio::spawn({
                let url = url.clone();
                async move {
                    let Ok(_permit) = semaphore.acquire_owned().await else {
                        return;
                    };

                    let synopsis = match task_timeout {
                        Some(limit) => {
                            match tokio::time::timeout(limit, fetch_synopsis(fetcher.as_ref(), &hosts, &url)).await {
                                Ok(synopsis) => synopsis,
                                Err(_) => {
                                    let timeout = EtlError::TaskTimeout {
                                        url: url.clone(),
                                        seconds: limit.as_secs(),
                                    };
                                    tracing::warn!("⏱️ [synopsis] {}", timeout);
                                    Synopsis::Unavailable
                                }
                            }
                        }
                        None => fetch_synopsis(fetcher.as_ref(), &hosts, &url).await,
                    };

                    if tx.send(EnrichmentMessage { url, synopsis }).await.is_err() {
                        tracing::error!("Synopsis collector closed before all tasks finished");
                    }
                }
            });
            handles.push((url, handle));
        }
        drop(tx);

        // 同一 URL 出現多次時依序各分配一個結果
        let mut slots: HashMap<String, VecDeque<usize>> = HashMap::new();
        for (index, record) in records.iter().enumerate() {
            slots.entry(record.url().to_string()).or_default().push_back(index);
        }

        let mut completed = 0;
        while let Some(message) = rx.recv().await {
            completed += 1;
            match slots.get_mut(&message.url).and_then(VecDeque::pop_front) {
                Some(index) => {
                    tracing::debug!("[{}/{}] synopsis ready for {}", completed, total, message.url);
                    records[index].synopsis = Some(message.synopsis);
                }
                None => tracing::warn!("Discarding unmatched synopsis for {}", message.url),
            }
        }

        let mut crashed = 0;
        for (url, handle) in handles {
            if let Err(e) = handle.await {
                crashed += 1;
                tracing::error!("❌ [synopsis] Task for {} failed: {}", url, e);
            }
        }

        for record in records.iter_mut().filter(|r| r.synopsis.is_none()) {
            record.synopsis = Some(Synopsis::Unavailable);
        }

        let diagnostics = records
            .iter()
            .filter(|r| r.synopsis.as_ref().is_some_and(Synopsis::is_diagnostic))
            .count();
        tracing::info!(
            "✅ Synopses complete: {} summarised, {} with diagnostics",
            total - diagnostics,
            diagnostics
        );

        EnrichmentReport {
            records,
            diagnostics,
            crashed,
        }
    }
}
