use crate::domain::model::{CatalogRow, ServiceRecord};
use crate::utils::error::{EtlError, Result};
use chrono::Utc;
use serde::Serialize;
use std::str::FromStr;

pub const COLUMNS: [&str; 4] = ["Service", "Stars", "URL", "Synopsis"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Tsv,
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Tsv => "tsv",
            OutputFormat::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = EtlError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "tsv" => Ok(OutputFormat::Tsv),
            "json" => Ok(OutputFormat::Json),
            other => Err(EtlError::InvalidConfigValueError {
                field: "output_formats".to_string(),
                value: other.to_string(),
                reason: "Unsupported format. Valid formats: csv, tsv, json".to_string(),
            }),
        }
    }
}

#[derive(Serialize)]
struct CatalogDocument<'a> {
    source: &'a str,
    generated_at: String,
    services: Vec<CatalogRow>,
}

/// 依星數由高到低排序；同星數保留原本的擷取順序
pub fn sort_by_stars(records: &mut [ServiceRecord]) {
    records.sort_by(|a, b| b.stars.cmp(&a.stars));
}

pub fn render_delimited(records: &[ServiceRecord], delimiter: u8) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .from_writer(Vec::new());

    // 手動寫表頭，沒有資料時也要輸出
    writer.write_record(COLUMNS)?;
    for record in records {
        writer.serialize(record.to_row())?;
    }

    writer.into_inner().map_err(|e| EtlError::IoError(e.into_error()))
}

pub fn render_json(records: &[ServiceRecord], source_url: &str) -> Result<Vec<u8>> {
    let document = CatalogDocument {
        source: source_url,
        generated_at: Utc::now().to_rfc3339(),
        services: records.iter().map(ServiceRecord::to_row).collect(),
    };
    Ok(serde_json::to_vec_pretty(&document)?)
}

pub fn render(format: OutputFormat, records: &[ServiceRecord], source_url: &str) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Csv => render_delimited(records, b','),
        OutputFormat::Tsv => render_delimited(records, b'\t'),
        OutputFormat::Json => render_json(records, source_url),
    }
}
