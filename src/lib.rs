pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod services;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::HttpFetcher;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};
pub use core::{etl::EtlEngine, pipeline::CatalogPipeline};
pub use domain::model::{ServiceOrigin, ServiceRecord, Synopsis};
pub use utils::error::{EtlError, Result};
