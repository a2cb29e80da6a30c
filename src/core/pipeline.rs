use crate::adapters::HttpFetcher;
use crate::core::{ConfigProvider, DocumentFetcher, Pipeline, ServiceRecord, Storage, TransformResult};
use crate::services::catalog::CatalogExtractor;
use crate::services::emit::{self, OutputFormat};
use crate::services::enricher::{Enricher, EnricherOptions};
use crate::services::resolver::GitHubHosts;
use crate::utils::error::{EtlError, Result};
use std::path::Path;
use std::sync::Arc;

/// 服務目錄 Pipeline：擷取清單頁 → 補充 README 摘要 → 依星數排序輸出
pub struct CatalogPipeline<S: Storage, C: ConfigProvider, F: DocumentFetcher = HttpFetcher> {
    storage: S,
    config: C,
    fetcher: Arc<F>,
    hosts: GitHubHosts,
}

impl<S: Storage, C: ConfigProvider> CatalogPipeline<S, C, HttpFetcher> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let fetcher = HttpFetcher::new(config.request_timeout())?;
        Ok(Self::with_fetcher(storage, config, Arc::new(fetcher)))
    }
}

impl<S: Storage, C: ConfigProvider, F: DocumentFetcher + 'static> CatalogPipeline<S, C, F> {
    pub fn with_fetcher(storage: S, config: C, fetcher: Arc<F>) -> Self {
        let hosts = GitHubHosts::new(config.github_base_url(), config.raw_base_url());
        Self {
            storage,
            config,
            fetcher,
            hosts,
        }
    }

    fn output_formats(&self) -> Result<Vec<OutputFormat>> {
        self.config
            .output_formats()
            .iter()
            .map(|format| format.parse())
            .collect()
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, F: DocumentFetcher + 'static> Pipeline for CatalogPipeline<S, C, F> {
    async fn extract(&self) -> Result<Vec<ServiceRecord>> {
        let target_url = self.config.target_url();
        tracing::info!("📡 Reading service listing: {}", target_url);

        let extractor = CatalogExtractor::new(Arc::clone(&self.fetcher), self.hosts.clone());
        let records = extractor.extract(target_url).await;

        if records.is_empty() {
            return Err(EtlError::EmptyCatalog {
                url: target_url.to_string(),
            });
        }
        Ok(records)
    }

    async fn transform(&self, records: Vec<ServiceRecord>) -> Result<TransformResult> {
        let (mut processed_records, diagnostic_count) = if self.config.skip_synopsis() {
            tracing::info!("⏭️ Synopsis enrichment disabled");
            (records, 0)
        } else {
            let options = EnricherOptions {
                concurrency: self.config.concurrent_requests(),
                task_timeout: self.config.task_timeout(),
            };
            let report = Enricher::new(Arc::clone(&self.fetcher), self.hosts.clone(), options)
                .enrich(records)
                .await;
            if report.crashed > 0 {
                tracing::warn!("⚠️ {} synopsis tasks crashed and were marked unavailable", report.crashed);
            }
            (report.records, report.diagnostics)
        };

        tracing::info!("🔢 Sorting {} services by stars", processed_records.len());
        emit::sort_by_stars(&mut processed_records);

        Ok(TransformResult {
            processed_records,
            diagnostic_count,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let formats = self.output_formats()?;
        let mut primary_path = None;

        for format in formats {
            let filename = format!("{}.{}", self.config.output_filename(), format.extension());
            let data = emit::render(format, &result.processed_records, self.config.target_url())?;

            tracing::debug!("Writing {} ({} bytes) to storage", filename, data.len());
            self.storage.write_file(&filename, &data).await?;

            let full_path = Path::new(self.config.output_path()).join(&filename);
            tracing::info!("📁 Wrote {} services to {}", result.processed_records.len(), full_path.display());
            primary_path.get_or_insert_with(|| full_path.display().to_string());
        }

        primary_path.ok_or_else(|| EtlError::MissingConfigError {
            field: "output_formats".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ServiceOrigin, Synopsis};
    use crate::services::testing::FakeFetcher;
    use std::collections::HashMap;
    use std::time::Duration;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                EtlError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        target_url: String,
        output_formats: Vec<String>,
        skip_synopsis: bool,
    }

    impl MockConfig {
        fn new(target_url: &str) -> Self {
            Self {
                target_url: target_url.to_string(),
                output_formats: vec!["csv".to_string()],
                skip_synopsis: false,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn target_url(&self) -> &str {
            &self.target_url
        }

        fn output_path(&self) -> &str {
            "test_output"
        }

        fn output_filename(&self) -> &str {
            "services"
        }

        fn output_formats(&self) -> &[String] {
            &self.output_formats
        }

        fn github_base_url(&self) -> &str {
            "https://github.com"
        }

        fn raw_base_url(&self) -> &str {
            "https://raw.githubusercontent.com"
        }

        fn concurrent_requests(&self) -> usize {
            4
        }

        fn task_timeout(&self) -> Option<Duration> {
            None
        }

        fn request_timeout(&self) -> Option<Duration> {
            None
        }

        fn skip_synopsis(&self) -> bool {
            self.skip_synopsis
        }
    }

    const LISTING_URL: &str = "https://github.com/acme/servers";

    fn record(name: &str, stars: u64) -> ServiceRecord {
        ServiceRecord::new(
            name,
            format!("https://github.com/acme/{}", name.to_lowercase()),
            stars,
            ServiceOrigin::ThirdParty,
        )
    }

    #[tokio::test]
    async fn test_extract_empty_listing_is_empty_catalog() {
        let fetcher = Arc::new(FakeFetcher::new().with_page(LISTING_URL, 200, "<html></html>"));
        let pipeline = CatalogPipeline::with_fetcher(MockStorage::new(), MockConfig::new(LISTING_URL), fetcher);

        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, EtlError::EmptyCatalog { .. }));
    }

    #[tokio::test]
    async fn test_transform_enriches_then_sorts() {
        let fetcher = Arc::new(
            FakeFetcher::new()
                .with_page("https://raw.githubusercontent.com/acme/low/master/README.md", 200, "Low readme")
                .with_page("https://raw.githubusercontent.com/acme/high/master/README.md", 404, "")
                .with_page("https://raw.githubusercontent.com/acme/high/main/README.md", 200, "High readme"),
        );
        let pipeline = CatalogPipeline::with_fetcher(MockStorage::new(), MockConfig::new(LISTING_URL), fetcher);

        let result = pipeline
            .transform(vec![record("Low", 1), record("High", 99), record("Gone", 1)])
            .await
            .unwrap();

        let names: Vec<&str> = result.processed_records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["High", "Low", "Gone"]);
        assert_eq!(
            result.processed_records[0].synopsis,
            Some(Synopsis::Summary("High readme...".to_string()))
        );
        assert_eq!(result.diagnostic_count, 1);
    }

    #[tokio::test]
    async fn test_transform_without_synopsis() {
        let fetcher = Arc::new(FakeFetcher::new());
        let mut config = MockConfig::new(LISTING_URL);
        config.skip_synopsis = true;
        let pipeline = CatalogPipeline::with_fetcher(MockStorage::new(), config, fetcher.clone());

        let result = pipeline.transform(vec![record("A", 1), record("B", 2)]).await.unwrap();

        assert_eq!(result.processed_records[0].name, "B");
        assert!(result.processed_records.iter().all(|r| r.synopsis.is_none()));
        assert!(fetcher.requests().is_empty());
    }

    #[tokio::test]
    async fn test_load_writes_every_format() {
        let storage = MockStorage::new();
        let mut config = MockConfig::new(LISTING_URL);
        config.output_formats = vec!["csv".to_string(), "json".to_string()];
        let pipeline = CatalogPipeline::with_fetcher(storage.clone(), config, Arc::new(FakeFetcher::new()));

        let mut fetch = record("Fetch", 10);
        fetch.synopsis = Some(Synopsis::Empty);
        let output_path = pipeline
            .load(TransformResult {
                processed_records: vec![fetch],
                diagnostic_count: 1,
            })
            .await
            .unwrap();

        assert_eq!(output_path, Path::new("test_output").join("services.csv").display().to_string());

        let csv = String::from_utf8(storage.get_file("services.csv").await.unwrap()).unwrap();
        assert_eq!(
            csv,
            "Service,Stars,URL,Synopsis\nFetch,10,https://github.com/acme/fetch,No synopsis available\n"
        );
        assert!(storage.get_file("services.json").await.is_some());
    }

    #[tokio::test]
    async fn test_load_rejects_unknown_format() {
        let mut config = MockConfig::new(LISTING_URL);
        config.output_formats = vec!["xml".to_string()];
        let pipeline = CatalogPipeline::with_fetcher(MockStorage::new(), config, Arc::new(FakeFetcher::new()));

        let result = pipeline
            .load(TransformResult {
                processed_records: vec![],
                diagnostic_count: 0,
            })
            .await;
        assert!(matches!(result, Err(EtlError::InvalidConfigValueError { .. })));
    }
}
