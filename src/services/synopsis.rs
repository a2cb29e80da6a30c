use crate::domain::model::Synopsis;
use crate::domain::ports::DocumentFetcher;
use crate::services::resolver::{resolve_readme, GitHubHosts, Resolution};
use crate::services::response_body;
use crate::utils::error::{EtlError, Result};

pub const WORD_BUDGET: usize = 30;
pub const ELLIPSIS: &str = "...";

/// 從 README 取前 30 個字作為摘要。
///
/// 空白行與標題行（`#` 開頭）不計入字數。最後一行超出預算時截斷到剛好 30 個字，
/// 並在結尾加上 `...`。沒有任何可用字詞時回傳 `None`。
pub fn summarize(document: &str) -> Option<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut word_count = 0;

    for line in document.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut words: Vec<&str> = trimmed.split_whitespace().collect();
        if word_count + words.len() > WORD_BUDGET {
            words.truncate(WORD_BUDGET - word_count);
        }
        word_count += words.len();
        lines.push(words.join(" "));

        if word_count >= WORD_BUDGET {
            break;
        }
    }

    if word_count == 0 {
        return None;
    }

    Some(format!("{}{}", lines.join(" ").trim(), ELLIPSIS))
}

/// 依序嘗試主要分支與備用分支的 README。
/// 只有 404 會觸發一次備用分支重試，其他錯誤直接回傳。
pub async fn fetch_readme<F: DocumentFetcher>(
    fetcher: &F,
    hosts: &GitHubHosts,
    url: &str,
) -> Result<String> {
    let (primary, fallback) = match resolve_readme(hosts, url) {
        Resolution::Candidates { primary, fallback } => (primary, fallback),
        Resolution::InvalidUrl => {
            return Err(EtlError::InvalidUrl {
                url: url.to_string(),
            })
        }
    };

    let response = fetcher.fetch(&primary.url).await?;
    match response_body(&primary.url, response) {
        Err(EtlError::NotFound { .. }) => {
            tracing::debug!(
                "README not on '{}' for {}, retrying on '{}'",
                primary.branch,
                url,
                fallback.branch
            );
            let response = fetcher.fetch(&fallback.url).await?;
            response_body(&fallback.url, response)
        }
        other => other,
    }
}

/// 取得摘要；失敗時記錄原因並回傳固定的診斷值
pub async fn fetch_synopsis<F: DocumentFetcher>(fetcher: &F, hosts: &GitHubHosts, url: &str) -> Synopsis {
    match fetch_readme(fetcher, hosts, url).await {
        Ok(document) => match summarize(&document) {
            Some(summary) => Synopsis::Summary(summary),
            None => {
                tracing::debug!("README for {} has no usable text", url);
                Synopsis::Empty
            }
        },
        Err(EtlError::InvalidUrl { .. }) => {
            tracing::info!("⏭️ [synopsis] Not a repository link, skipping: {}", url);
            Synopsis::NotARepository
        }
        Err(e) => {
            tracing::warn!("⚠️ [synopsis] README unavailable for {}: {}", url, e);
            Synopsis::Unavailable
        }
    }
}
