use crate::core::{Candidate, ConfigProvider, LoadReport, Pipeline, RepositoryHost, Storage};
use crate::domain::model::FailedCandidate;
use crate::domain::services::{map_entries, NamingScheme};
use crate::utils::error::{Result, SyncError};
use std::sync::Arc;
use tokio::sync::Semaphore;

pub struct ReadmePipeline<S: Storage, H: RepositoryHost, C: ConfigProvider> {
    storage: Arc<S>,
    host: Arc<H>,
    config: C,
    naming: Arc<NamingScheme>,
}

impl<S: Storage, H: RepositoryHost, C: ConfigProvider> ReadmePipeline<S, H, C> {
    pub fn new(storage: S, host: H, config: C) -> Result<Self> {
        let naming = NamingScheme::new(config.scope(), config.allowed_kinds())?;

        Ok(Self {
            storage: Arc::new(storage),
            host: Arc::new(host),
            config,
            naming: Arc::new(naming),
        })
    }
}

/// 下載單一 README、移除開頭幾行、加上 front matter 後寫入檔案
async fn sync_candidate<H, S>(
    host: &H,
    storage: &S,
    naming: &NamingScheme,
    candidate: &Candidate,
    strip_lines: usize,
) -> Result<String>
where
    H: RepositoryHost + ?Sized,
    S: Storage,
{
    let text = host.fetch_raw(&candidate.uri).await?;

    let filename = naming.output_filename(&candidate.name);
    let document = naming.build_document(&candidate.name, &text, strip_lines);

    storage
        .write_file(&filename, document.render().as_bytes())
        .await?;

    tracing::debug!("Wrote {} ({} bytes of source)", filename, text.len());
    Ok(filename)
}

#[async_trait::async_trait]
impl<S, H, C> Pipeline for ReadmePipeline<S, H, C>
where
    S: Storage + 'static,
    H: RepositoryHost + 'static,
    C: ConfigProvider,
{
    async fn extract(&self) -> Result<Vec<Candidate>> {
        // 所有 repository 的列表同時請求，依設定順序合併
        let handles: Vec<_> = self
            .config
            .sources()
            .iter()
            .cloned()
            .map(|repository| {
                let host = Arc::clone(&self.host);
                tokio::spawn(async move { host.list_directory(&repository).await })
            })
            .collect();

        let mut candidates = Vec::new();
        for handle in handles {
            let listing = handle.await??;
            let mapped = map_entries(&listing);
            tracing::debug!(
                "{}: {} entries, {} directories",
                listing.repository,
                listing.entries.len(),
                mapped.len()
            );
            candidates.extend(mapped);
        }

        candidates.extend(self.config.special_cases().iter().cloned());
        Ok(candidates)
    }

    async fn transform(&self, candidates: Vec<Candidate>) -> Result<Vec<Candidate>> {
        let total = candidates.len();
        let selected = self.naming.filter(candidates);

        tracing::debug!(
            "{} of {} packages match {}-({})-*",
            selected.len(),
            total,
            self.config.scope(),
            self.config.allowed_kinds().join("|")
        );

        Ok(selected)
    }

    async fn load(&self, candidates: Vec<Candidate>) -> Result<LoadReport> {
        let semaphore = Arc::new(Semaphore::new(self.config.concurrent_requests().max(1)));
        let strip_lines = self.config.strip_lines();
        let mut tasks = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            // 先取得許可再 spawn，確保依輸入順序進場
            let permit = Arc::clone(&semaphore)
                .acquire_owned()
                .await
                .map_err(|e| SyncError::ProcessingError {
                    message: format!("download limiter closed: {}", e),
                })?;

            let host = Arc::clone(&self.host);
            let storage = Arc::clone(&self.storage);
            let naming = Arc::clone(&self.naming);
            let name = candidate.name.clone();

            let handle = tokio::spawn(async move {
                let outcome = sync_candidate(
                    host.as_ref(),
                    storage.as_ref(),
                    &naming,
                    &candidate,
                    strip_lines,
                )
                .await;
                drop(permit);

                if let Err(e) = &outcome {
                    tracing::error!("Could not load {}: {}", candidate.name, e);
                }
                outcome
            });
            tasks.push((name, handle));
        }

        // 某個 task panic 也只算該 README 失敗，其餘結果照常收集
        let mut report = LoadReport::default();
        for (name, task) in tasks {
            match task.await {
                Ok(Ok(filename)) => report.written.push(filename),
                Ok(Err(e)) => report.failed.push(FailedCandidate {
                    name,
                    error: e.to_string(),
                }),
                Err(e) => {
                    tracing::error!("Could not load {}: {}", name, e);
                    report.failed.push(FailedCandidate {
                        name,
                        error: SyncError::from(e).to_string(),
                    });
                }
            }
        }

        Ok(report)
    }
}
