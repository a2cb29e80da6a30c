use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// 擷取 → 補充摘要並排序 → 輸出，回傳主要輸出檔路徑
    pub async fn run(&self) -> Result<String> {
        tracing::info!("🚀 Starting catalog run");
        self.monitor.log_stats("Start");

        tracing::info!("🔍 Extracting services...");
        let records = self.pipeline.extract().await?;
        tracing::info!("Extracted {} services", records.len());
        self.monitor.log_stats("Extract");

        tracing::info!("📝 Enriching and sorting...");
        let result = self.pipeline.transform(records).await?;
        tracing::info!(
            "Transformed {} services ({} without synopsis)",
            result.processed_records.len(),
            result.diagnostic_count
        );
        self.monitor.log_stats("Transform");

        tracing::info!("💾 Writing output...");
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Output saved to: {}", output_path);
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        Ok(output_path)
    }
}
