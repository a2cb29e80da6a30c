use crate::domain::ports::{DocumentFetcher, FetchResponse};
use crate::utils::error::{EtlError, Result};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// 記憶體內的抓取器；未登記的網址視為連線失敗
#[derive(Default)]
pub(crate) struct FakeFetcher {
    pages: HashMap<String, FetchResponse>,
    delays: HashMap<String, Duration>,
    panics: HashSet<String>,
    requests: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_page(mut self, url: &str, status: u16, body: &str) -> Self {
        self.pages.insert(
            url.to_string(),
            FetchResponse {
                status,
                body: body.to_string(),
            },
        );
        self
    }

    pub(crate) fn with_delay(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(url.to_string(), delay);
        self
    }

    pub(crate) fn with_panic(mut self, url: &str) -> Self {
        self.panics.insert(url.to_string());
        self
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn requested(&self, url: &str) -> bool {
        self.requests().iter().any(|u| u == url)
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl DocumentFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResponse> {
        self.requests.lock().unwrap().push(url.to_string());

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        let delay = self.delays.get(url).copied().unwrap_or(Duration::from_millis(5));
        tokio::time::sleep(delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.panics.contains(url) {
            panic!("simulated fetch panic for {}", url);
        }

        self.pages.get(url).cloned().ok_or_else(|| {
            EtlError::IoError(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                format!("no route to {}", url),
            ))
        })
    }
}
