use crate::domain::model::{Candidate, Listing, LoadReport, RepositoryRef};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// 遠端 repository 主機：目錄列表 API 與原始內容下載
#[async_trait]
pub trait RepositoryHost: Send + Sync {
    async fn list_directory(&self, repository: &RepositoryRef) -> Result<Listing>;
    async fn fetch_raw(&self, uri: &str) -> Result<String>;
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn raw_base_url(&self) -> &str;
    fn packages_dir(&self) -> &str;
    fn output_path(&self) -> &str;
    fn sources(&self) -> &[RepositoryRef];
    fn special_cases(&self) -> &[Candidate];
    fn scope(&self) -> &str;
    fn allowed_kinds(&self) -> &[String];
    fn strip_lines(&self) -> usize;
    fn concurrent_requests(&self) -> usize;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Candidate>>;
    async fn transform(&self, candidates: Vec<Candidate>) -> Result<Vec<Candidate>>;
    async fn load(&self, candidates: Vec<Candidate>) -> Result<LoadReport>;
}
