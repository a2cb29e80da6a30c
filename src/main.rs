use clap::Parser;
use star_catalog::core::ConfigProvider;
use star_catalog::utils::error::ErrorSeverity;
use star_catalog::utils::{logger, validation::Validate};
use star_catalog::{CatalogPipeline, CliConfig, EtlEngine, EtlError, LocalStorage, TomlConfig};

async fn run<C: ConfigProvider>(config: C, monitor: bool) -> star_catalog::Result<String> {
    let storage = LocalStorage::new(config.output_path());
    let pipeline = CatalogPipeline::new(storage, config)?;
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor);
    engine.run().await
}

fn exit_on_invalid<V: Validate>(config: &V) {
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting star-catalog");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    let outcome = match config.config.clone() {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            let file_config = match TomlConfig::from_file(&path) {
                Ok(file_config) => file_config,
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path, e);
                    eprintln!("💡 Make sure the file exists and is valid TOML format");
                    std::process::exit(1);
                }
            };
            exit_on_invalid(&file_config);
            let monitor = config.monitor || file_config.monitoring_enabled();
            run(file_config, monitor).await
        }
        None => {
            exit_on_invalid(&config);
            let monitor = config.monitor;
            run(config, monitor).await
        }
    };

    match outcome {
        Ok(output_path) => {
            tracing::info!("✅ Catalog written successfully!");
            println!("✅ Catalog written successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e @ EtlError::EmptyCatalog { .. }) => {
            tracing::warn!("⚠️ {}", e);
            eprintln!("⚠️ {}", e.user_friendly_message());
        }
        Err(e) => {
            tracing::error!(
                "❌ Catalog run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            // 依錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
