use serde::{Deserialize, Serialize};
use std::fmt;

pub const NOT_A_REPOSITORY: &str = "Not a GitHub repository link";
pub const DOCUMENT_UNAVAILABLE: &str = "README not available";
pub const NO_SYNOPSIS: &str = "No synopsis available";

/// 服務來源：主倉庫內的第一方服務，或外部的第三方服務
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceOrigin {
    FirstParty,
    ThirdParty,
}

/// README 摘要；失敗狀態以固定字串輸出，而不是空值
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Synopsis {
    Summary(String),
    NotARepository,
    Unavailable,
    Empty,
}

impl Synopsis {
    pub fn as_str(&self) -> &str {
        match self {
            Synopsis::Summary(text) => text,
            Synopsis::NotARepository => NOT_A_REPOSITORY,
            Synopsis::Unavailable => DOCUMENT_UNAVAILABLE,
            Synopsis::Empty => NO_SYNOPSIS,
        }
    }

    pub fn is_diagnostic(&self) -> bool {
        !matches!(self, Synopsis::Summary(_))
    }
}

impl fmt::Display for Synopsis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRecord {
    pub name: String,
    url: String,
    pub stars: u64,
    pub origin: ServiceOrigin,
    pub synopsis: Option<Synopsis>,
}

impl ServiceRecord {
    pub fn new(name: impl Into<String>, url: impl Into<String>, stars: u64, origin: ServiceOrigin) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            stars,
            origin,
            synopsis: None,
        }
    }

    /// URL 建立後不可變，同時作為合併結果時的識別鍵
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn to_row(&self) -> CatalogRow {
        CatalogRow {
            service: self.name.clone(),
            stars: self.stars,
            url: self.url.clone(),
            synopsis: self
                .synopsis
                .as_ref()
                .map(|s| s.as_str().to_string())
                .unwrap_or_default(),
        }
    }
}

/// 輸出的固定欄位：Service, Stars, URL, Synopsis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRow {
    #[serde(rename = "Service")]
    pub service: String,
    #[serde(rename = "Stars")]
    pub stars: u64,
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "Synopsis")]
    pub synopsis: String,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub processed_records: Vec<ServiceRecord>,
    pub diagnostic_count: usize,
}
