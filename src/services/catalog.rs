use crate::domain::model::{ServiceOrigin, ServiceRecord};
use crate::domain::ports::DocumentFetcher;
use crate::services::resolver::GitHubHosts;
use crate::services::response_body;
use crate::services::stars::star_count;
use crate::utils::error::{EtlError, Result};
use scraper::{ElementRef, Html, Selector};
use std::sync::{Arc, LazyLock};
use url::Url;

static ARTICLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("article.markdown-body")
        .expect("BUG: hardcoded CSS selector 'article.markdown-body' is invalid")
});

static LIST_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("ul").expect("BUG: hardcoded CSS selector 'ul' is invalid"));

static ITEM_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("li").expect("BUG: hardcoded CSS selector 'li' is invalid"));

static STRONG_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("strong").expect("BUG: hardcoded CSS selector 'strong' is invalid")
});

static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("BUG: hardcoded CSS selector 'a[href]' is invalid"));

/// 清單項目中的服務名稱與原始 href
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub href: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingSections {
    pub first_party: Vec<ListingEntry>,
    pub third_party: Vec<ListingEntry>,
}

/// 在已解析的清單頁中找出第一方與第三方服務區段
pub trait SectionLocator: Send + Sync {
    fn locate(&self, document: &Html, source_url: &str) -> Result<ListingSections>;
}

/// 依照 `<ul>` 在內容區的位置找區段：第二個為第一方，第四個為第三方。
/// 清單數量不足時，對應區段為空。
#[derive(Debug, Clone, Copy)]
pub struct PositionalLocator {
    pub first_party_list: usize,
    pub third_party_list: usize,
}

impl Default for PositionalLocator {
    fn default() -> Self {
        Self {
            first_party_list: 1,
            third_party_list: 3,
        }
    }
}

impl SectionLocator for PositionalLocator {
    fn locate(&self, document: &Html, source_url: &str) -> Result<ListingSections> {
        let article = document
            .select(&ARTICLE_SELECTOR)
            .next()
            .ok_or_else(|| EtlError::MissingElement {
                url: source_url.to_string(),
                element: "article.markdown-body".to_string(),
            })?;

        let lists: Vec<ElementRef> = article.select(&LIST_SELECTOR).collect();
        tracing::debug!("Found {} bullet lists in {}", lists.len(), source_url);

        let entries_at = |index: usize| -> Vec<ListingEntry> {
            lists
                .get(index)
                .map(|list| list.select(&ITEM_SELECTOR).filter_map(listing_entry).collect())
                .unwrap_or_default()
        };

        Ok(ListingSections {
            first_party: entries_at(self.first_party_list),
            third_party: entries_at(self.third_party_list),
        })
    }
}

/// 優先取 `<strong>` 內的連結，沒有時退回項目中的任一連結
fn listing_entry(item: ElementRef) -> Option<ListingEntry> {
    let link = item
        .select(&STRONG_SELECTOR)
        .find_map(|strong| strong.select(&LINK_SELECTOR).next())
        .or_else(|| item.select(&LINK_SELECTOR).next())?;

    let href = link.value().attr("href")?.trim();
    let name = link.text().collect::<String>().trim().to_string();
    if name.is_empty() || href.is_empty() {
        return None;
    }

    Some(ListingEntry {
        name,
        href: href.to_string(),
    })
}

pub fn parse_sections<L: SectionLocator>(locator: &L, html: &str, source_url: &str) -> Result<ListingSections> {
    let document = Html::parse_document(html);
    locator.locate(&document, source_url)
}

/// 相對路徑以網站根目錄補成完整網址；已是 http(s) 網址則原樣保留
pub fn absolute_link(hosts: &GitHubHosts, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else if href.starts_with('/') {
        format!("{}{}", hosts.web_base(), href)
    } else {
        format!("{}/{}", hosts.web_base(), href)
    }
}

/// 清單頁網址的前兩段路徑即主倉庫 `owner/repo`
pub fn parent_repository(hosts: &GitHubHosts, listing_url: &str) -> Option<String> {
    let url = Url::parse(listing_url).ok()?;
    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());
    let owner = segments.next()?;
    let repo = segments.next()?;
    Some(hosts.repo_url(owner, repo))
}

pub struct CatalogExtractor<F, L = PositionalLocator> {
    fetcher: Arc<F>,
    hosts: GitHubHosts,
    locator: L,
}

impl<F: DocumentFetcher> CatalogExtractor<F, PositionalLocator> {
    pub fn new(fetcher: Arc<F>, hosts: GitHubHosts) -> Self {
        Self::with_locator(fetcher, hosts, PositionalLocator::default())
    }
}

impl<F: DocumentFetcher, L: SectionLocator> CatalogExtractor<F, L> {
    pub fn with_locator(fetcher: Arc<F>, hosts: GitHubHosts, locator: L) -> Self {
        Self {
            fetcher,
            hosts,
            locator,
        }
    }

    async fn fetch_sections(&self, listing_url: &str) -> Result<ListingSections> {
        let response = self.fetcher.fetch(listing_url).await?;
        let body = response_body(listing_url, response)?;
        parse_sections(&self.locator, &body, listing_url)
    }

    /// 擷取所有服務。第一方服務共用主倉庫的星數，第三方服務逐一依序抓取星數。
    /// 清單頁抓取或解析失敗時記錄錯誤並回傳空集合。
    pub async fn extract(&self, listing_url: &str) -> Vec<ServiceRecord> {
        let parent_stars = match parent_repository(&self.hosts, listing_url) {
            Some(parent_url) => {
                tracing::info!("⭐ Fetching parent repository stars: {}", parent_url);
                let stars = star_count(self.fetcher.as_ref(), &self.hosts, &parent_url).await;
                tracing::info!("⭐ Parent repository stars: {}", stars);
                stars
            }
            None => {
                tracing::warn!("⚠️ Cannot derive parent repository from {}", listing_url);
                0
            }
        };

        let sections = match self.fetch_sections(listing_url).await {
            Ok(sections) => sections,
            Err(e) => {
                tracing::error!("❌ [catalog] Failed to read listing {}: {}", listing_url, e);
                return Vec::new();
            }
        };

        let mut records = Vec::with_capacity(sections.first_party.len() + sections.third_party.len());

        if !sections.first_party.is_empty() {
            tracing::info!("📋 Processing {} first-party services", sections.first_party.len());
        }
        for entry in sections.first_party {
            let url = absolute_link(&self.hosts, &entry.href);
            tracing::debug!("+ {} (shared stars: {})", entry.name, parent_stars);
            records.push(ServiceRecord::new(
                entry.name,
                url,
                parent_stars,
                ServiceOrigin::FirstParty,
            ));
        }

        if !sections.third_party.is_empty() {
            tracing::info!("📋 Processing {} third-party services", sections.third_party.len());
        }
        for entry in sections.third_party {
            let url = absolute_link(&self.hosts, &entry.href);
            let stars = star_count(self.fetcher.as_ref(), &self.hosts, &url).await;
            tracing::debug!("+ {} ({}) stars: {}", entry.name, url, stars);
            records.push(ServiceRecord::new(entry.name, url, stars, ServiceOrigin::ThirdParty));
        }

        tracing::info!("📊 Extracted {} services from {}", records.len(), listing_url);
        records
    }
}
