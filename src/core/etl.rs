use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

/// Outcome of one ingestion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EtlReport {
    pub record_count: usize,
    /// `None` when nothing was extracted and the previous file was kept.
    pub output_path: Option<String>,
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<EtlReport> {
        let started = Instant::now();
        tracing::info!("🚀 Starting ingestion");

        // Extract
        let raw_data = self.pipeline.extract().await?;
        tracing::info!("📥 Extracted {} entries", raw_data.len());

        // 沒有資料時保留上一次的檔案
        if raw_data.is_empty() {
            tracing::warn!("⚠️ No entries returned, keeping the existing entries file");
            return Ok(EtlReport {
                record_count: 0,
                output_path: None,
            });
        }

        // Transform
        let transformed = self.pipeline.transform(raw_data).await?;
        let record_count = transformed.processed_records.len();
        tracing::debug!("🔄 Transformed {} entries", record_count);

        // Load
        let output_path = self.pipeline.load(transformed).await?;
        tracing::info!(
            "✅ Ingestion finished in {:?}, output saved to: {}",
            started.elapsed(),
            output_path
        );

        Ok(EtlReport {
            record_count,
            output_path: Some(output_path),
        })
    }
}
