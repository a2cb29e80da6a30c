use crate::domain::ports::DocumentFetcher;
use crate::services::resolver::GitHubHosts;
use crate::services::response_body;
use crate::utils::error::{EtlError, Result};
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

static BOLD_SPAN_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("span.text-bold").expect("BUG: hardcoded CSS selector 'span.text-bold' is invalid")
});

static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("BUG: hardcoded CSS selector 'a[href]' is invalid"));

static THOUSANDS_SHORTHAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)(?:\.(\d+))?\s*[kK]$").expect("BUG: hardcoded star shorthand regex is invalid")
});

/// 解析星數文字："3,400" → 3400，"1.2k" → 1200；其他格式回傳 None
pub fn parse_star_text(text: &str) -> Option<u64> {
    let text = text.trim();

    if let Some(caps) = THOUSANDS_SHORTHAND.captures(text) {
        let whole: u64 = caps[1].parse().ok()?;
        // 小數部分以整數運算，避免 2.3 * 1000 = 2299.999… 的浮點截斷
        let fraction = caps.get(2).map_or("", |m| m.as_str());
        let millis: String = fraction.chars().chain("000".chars()).take(3).collect();
        let millis: u64 = millis.parse().ok()?;
        return whole.checked_mul(1000)?.checked_add(millis);
    }

    let digits: String = text.chars().filter(|c| *c != ',').collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// `owner/repo` 路徑，去掉 `/tree/...` 之後的部分
pub fn repository_path<'a>(hosts: &GitHubHosts, url: &'a str) -> Option<&'a str> {
    let relative = hosts.repo_relative(url)?;
    let relative = relative.split(['?', '#']).next().unwrap_or_default();
    let path = relative.split("/tree/").next().unwrap_or_default().trim_end_matches('/');
    (!path.is_empty()).then_some(path)
}

/// 在倉庫頁面中找出 stargazers 連結內的粗體星數文字
pub fn extract_star_text(html: &str, repo_path: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let target = format!("/{}/stargazers", repo_path);

    let link = document
        .select(&LINK_SELECTOR)
        .find(|a| a.value().attr("href") == Some(target.as_str()))?;

    link.select(&BOLD_SPAN_SELECTOR)
        .next()
        .map(|span| span.text().collect::<String>().trim().to_string())
}

pub async fn fetch_star_count<F: DocumentFetcher>(
    fetcher: &F,
    hosts: &GitHubHosts,
    url: &str,
) -> Result<u64> {
    let repo_path = repository_path(hosts, url).ok_or_else(|| EtlError::InvalidUrl {
        url: url.to_string(),
    })?;

    let response = fetcher.fetch(url).await?;
    let body = response_body(url, response)?;

    let star_text = extract_star_text(&body, repo_path).ok_or_else(|| EtlError::MissingElement {
        url: url.to_string(),
        element: format!("a[href=\"/{}/stargazers\"] span.text-bold", repo_path),
    })?;

    parse_star_text(&star_text).ok_or_else(|| EtlError::ParseError {
        url: url.to_string(),
        message: format!("unrecognised star count '{}'", star_text),
    })
}

/// 抓取星數；任何失敗都記錄後回傳 0，不會向上傳遞
pub async fn star_count<F: DocumentFetcher>(fetcher: &F, hosts: &GitHubHosts, url: &str) -> u64 {
    match fetch_star_count(fetcher, hosts, url).await {
        Ok(stars) => stars,
        Err(EtlError::InvalidUrl { .. }) => {
            tracing::info!("⏭️ Skipping non-GitHub link for stars: {}", url);
            0
        }
        Err(e) => {
            tracing::warn!("⚠️ [stars] Failed to fetch star count for {}: {}", url, e);
            0
        }
    }
}
