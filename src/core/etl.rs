use crate::core::{LoadReport, Pipeline};
use crate::utils::error::Result;

pub struct SyncEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> SyncEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// 列表失敗會直接回傳錯誤；單一 README 失敗只記錄在報告中
    pub async fn run(&self) -> Result<LoadReport> {
        tracing::info!("Retrieving package listing...");
        let candidates = self.pipeline.extract().await?;
        tracing::info!("Found {} packages", candidates.len());

        let selected = self.pipeline.transform(candidates).await?;
        tracing::info!("Downloading {} READMEs...", selected.len());

        let report = self.pipeline.load(selected).await?;

        if report.is_complete() {
            tracing::info!("✅ Wrote {} READMEs", report.written.len());
        } else {
            tracing::warn!(
                "⚠️ Wrote {} READMEs, {} could not be loaded: {}",
                report.written.len(),
                report.failed.len(),
                report
                    .failed
                    .iter()
                    .map(|failure| failure.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        Ok(report)
    }
}
