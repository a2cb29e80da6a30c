pub mod cli;
pub mod toml_config;

pub const DEFAULT_TARGET_URL: &str =
    "https://github.com/modelcontextprotocol/servers/tree/main?tab=readme-ov-file";
pub const DEFAULT_OUTPUT_FILENAME: &str = "github_all_services_sorted";
pub const DEFAULT_GITHUB_BASE_URL: &str = "https://github.com";
pub const DEFAULT_RAW_BASE_URL: &str = "https://raw.githubusercontent.com";
pub const MAX_TIMEOUT_SECS: u64 = 3600;

#[cfg(feature = "cli")]
pub use cli_args::CliConfig;

#[cfg(feature = "cli")]
mod cli_args {
    use super::*;
    use crate::core::ConfigProvider;
    use crate::services::enricher::DEFAULT_CONCURRENCY;
    use crate::utils::error::Result;
    use crate::utils::validation::{self, Validate};
    use clap::Parser;
    use serde::{Deserialize, Serialize};
    use std::time::Duration;

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "star-catalog")]
    #[command(about = "Scrape a GitHub README service listing into a star-sorted table")]
    pub struct CliConfig {
        #[arg(long, default_value = DEFAULT_TARGET_URL)]
        pub target_url: String,

        #[arg(long, default_value = ".")]
        pub output_path: String,

        #[arg(long, default_value = DEFAULT_OUTPUT_FILENAME)]
        pub output_filename: String,

        #[arg(long, value_delimiter = ',', default_value = "csv")]
        pub output_formats: Vec<String>,

        #[arg(long, default_value = DEFAULT_GITHUB_BASE_URL)]
        pub github_base_url: String,

        #[arg(long, default_value = DEFAULT_RAW_BASE_URL)]
        pub raw_base_url: String,

        #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
        pub concurrent_requests: usize,

        #[arg(long, help = "Give up on a single synopsis after this many seconds")]
        pub task_timeout_secs: Option<u64>,

        #[arg(long, help = "HTTP request timeout in seconds")]
        pub request_timeout_secs: Option<u64>,

        #[arg(long, help = "Skip README synopsis enrichment")]
        pub skip_synopsis: bool,

        #[arg(short, long, help = "Load settings from a TOML file instead of flags")]
        pub config: Option<String>,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Log CPU and memory usage per stage")]
        pub monitor: bool,
    }

    impl ConfigProvider for CliConfig {
        fn target_url(&self) -> &str {
            &self.target_url
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn output_filename(&self) -> &str {
            &self.output_filename
        }

        fn output_formats(&self) -> &[String] {
            &self.output_formats
        }

        fn github_base_url(&self) -> &str {
            &self.github_base_url
        }

        fn raw_base_url(&self) -> &str {
            &self.raw_base_url
        }

        fn concurrent_requests(&self) -> usize {
            self.concurrent_requests
        }

        fn task_timeout(&self) -> Option<Duration> {
            self.task_timeout_secs.map(Duration::from_secs)
        }

        fn request_timeout(&self) -> Option<Duration> {
            self.request_timeout_secs.map(Duration::from_secs)
        }

        fn skip_synopsis(&self) -> bool {
            self.skip_synopsis
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validation::validate_url("target_url", &self.target_url)?;
            validation::validate_url("github_base_url", &self.github_base_url)?;
            validation::validate_url("raw_base_url", &self.raw_base_url)?;
            validation::validate_path("output_path", &self.output_path)?;
            validation::validate_non_empty_string("output_filename", &self.output_filename)?;
            validation::validate_output_formats("output_formats", &self.output_formats)?;
            validation::validate_positive_number("concurrent_requests", self.concurrent_requests, 1)?;
            if let Some(secs) = self.task_timeout_secs {
                validation::validate_range("task_timeout_secs", secs, 1, MAX_TIMEOUT_SECS)?;
            }
            if let Some(secs) = self.request_timeout_secs {
                validation::validate_range("request_timeout_secs", secs, 1, MAX_TIMEOUT_SECS)?;
            }
            Ok(())
        }
    }

}
