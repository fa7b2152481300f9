use crate::domain::model::{DirectoryEntry, Listing, RepositoryRef};
use crate::domain::ports::{ConfigProvider, RepositoryHost};
use crate::utils::error::{Result, SyncError};
use async_trait::async_trait;
use reqwest::Client;
use std::fmt;
use url::Url;

pub const CLIENT_ID_ENV: &str = "GITHUB_CLIENT_ID";
pub const CLIENT_SECRET_ENV: &str = "GITHUB_CLIENT_SECRET";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// OAuth app 的 client id / secret。
///
/// 只用來提高 API 的速率限制，刻意不使用 access token，
/// 即使 URL 外洩也不會暴露 API 存取權限。
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl ClientCredentials {
    /// 兩個值都存在且非空時才回傳憑證
    pub fn from_values(client_id: Option<String>, client_secret: Option<String>) -> Option<Self> {
        match (client_id, client_secret) {
            (Some(client_id), Some(client_secret))
                if !client_id.is_empty() && !client_secret.is_empty() =>
            {
                Some(Self {
                    client_id,
                    client_secret,
                })
            }
            _ => None,
        }
    }

    pub fn from_env() -> Option<Self> {
        Self::from_values(
            std::env::var(CLIENT_ID_ENV).ok(),
            std::env::var(CLIENT_SECRET_ENV).ok(),
        )
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    api_base_url: String,
    raw_base_url: String,
    packages_dir: String,
    credentials: Option<ClientCredentials>,
}

impl GitHubClient {
    pub fn new(api_base_url: &str, raw_base_url: &str, packages_dir: &str) -> Result<Self> {
        // GitHub 會拒絕沒有 User-Agent 的請求
        let client = Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            client,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            raw_base_url: raw_base_url.trim_end_matches('/').to_string(),
            packages_dir: packages_dir.trim_matches('/').to_string(),
            credentials: None,
        })
    }

    pub fn from_config<C: ConfigProvider>(
        config: &C,
        credentials: Option<ClientCredentials>,
    ) -> Result<Self> {
        let client = Self::new(
            config.api_base_url(),
            config.raw_base_url(),
            config.packages_dir(),
        )?;
        Ok(client.with_credentials(credentials))
    }

    pub fn with_credentials(mut self, credentials: Option<ClientCredentials>) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn listing_url(&self, repository: &RepositoryRef) -> Result<Url> {
        let mut url = Url::parse(&format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_base_url, repository.owner, repository.repo, self.packages_dir
        ))?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("ref", &repository.branch);
            if let Some(credentials) = &self.credentials {
                query.append_pair("client_id", &credentials.client_id);
                query.append_pair("client_secret", &credentials.client_secret);
            }
        }

        Ok(url)
    }

    pub fn raw_url(&self, uri: &str) -> String {
        format!("{}{}", self.raw_base_url, uri)
    }

    async fn fetch_listing(&self, repository: &RepositoryRef) -> Result<Vec<DirectoryEntry>> {
        let url = self.listing_url(repository)?;

        // reqwest 的錯誤訊息包含 URL，先移除以免 client_secret 進入日誌
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| e.without_url())?;

        tracing::debug!("Listing response for {}: {}", repository, response.status());

        let body = response.bytes().await.map_err(|e| e.without_url())?;
        let entries: Vec<DirectoryEntry> = serde_json::from_slice(&body)?;
        Ok(entries)
    }
}

#[async_trait]
impl RepositoryHost for GitHubClient {
    async fn list_directory(&self, repository: &RepositoryRef) -> Result<Listing> {
        tracing::debug!(
            "Listing {}/{} for {} (credentials: {})",
            repository.repo,
            self.packages_dir,
            repository,
            self.credentials.is_some()
        );

        let entries = self
            .fetch_listing(repository)
            .await
            .map_err(|e| SyncError::listing(repository.to_string(), e))?;

        Ok(Listing {
            repository: repository.clone(),
            entries,
        })
    }

    async fn fetch_raw(&self, uri: &str) -> Result<String> {
        let url = self.raw_url(uri);
        tracing::debug!("Fetching {}", url);

        let text = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::EntryType;
    use httpmock::prelude::*;

    fn credentials() -> Option<ClientCredentials> {
        ClientCredentials::from_values(Some("id 1".to_string()), Some("s&cret".to_string()))
    }

    #[test]
    fn test_credentials_require_both_values() {
        assert!(ClientCredentials::from_values(Some("id".into()), None).is_none());
        assert!(ClientCredentials::from_values(None, Some("secret".into())).is_none());
        assert!(ClientCredentials::from_values(Some("".into()), Some("secret".into())).is_none());
        assert!(credentials().is_some());
    }

    #[test]
    fn test_credentials_debug_hides_secret() {
        let debug = format!("{:?}", credentials().unwrap());
        assert!(debug.contains("id 1"));
        assert!(!debug.contains("s&cret"));
    }

    #[test]
    fn test_listing_url_without_credentials() {
        let client = GitHubClient::new(
            "https://api.github.com/",
            "https://raw.githubusercontent.com",
            "packages",
        )
        .unwrap();
        let url = client
            .listing_url(&RepositoryRef::new("babel", "babel", "6.x"))
            .unwrap();

        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/babel/babel/contents/packages?ref=6.x"
        );
    }

    #[test]
    fn test_listing_url_with_encoded_credentials() {
        let client = GitHubClient::new(
            "https://api.github.com",
            "https://raw.githubusercontent.com",
            "packages",
        )
        .unwrap()
        .with_credentials(credentials());
        let url = client
            .listing_url(&RepositoryRef::new("babel", "minify", "master"))
            .unwrap();

        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/babel/minify/contents/packages?ref=master&client_id=id+1&client_secret=s%26cret"
        );
    }

    #[test]
    fn test_raw_url() {
        let client = GitHubClient::new(
            "https://api.github.com",
            "https://raw.githubusercontent.com/",
            "packages",
        )
        .unwrap();
        assert_eq!(
            client.raw_url("/babel/babylon/master/README.md"),
            "https://raw.githubusercontent.com/babel/babylon/master/README.md"
        );
    }

    #[tokio::test]
    async fn test_list_directory_parses_entries() {
        let server = MockServer::start_async().await;
        let listing_mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/repos/babel/babel/contents/packages")
                    .query_param("ref", "6.x")
                    .header_exists("user-agent");
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(serde_json::json!([
                        {"name": "babel-plugin-foo", "path": "packages/babel-plugin-foo", "type": "dir"},
                        {"name": "package.json", "path": "packages/package.json", "type": "file"}
                    ]));
            })
            .await;

        let client = GitHubClient::new(&server.base_url(), &server.base_url(), "packages").unwrap();
        let listing = client
            .list_directory(&RepositoryRef::new("babel", "babel", "6.x"))
            .await
            .unwrap();

        listing_mock.assert_async().await;
        assert_eq!(listing.entries.len(), 2);
        assert_eq!(listing.entries[0].entry_type, EntryType::Dir);
        assert_eq!(listing.repository.branch, "6.x");
    }

    #[tokio::test]
    async fn test_list_directory_sends_credentials() {
        let server = MockServer::start_async().await;
        let listing_mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/repos/babel/minify/contents/packages")
                    .query_param("client_id", "abc")
                    .query_param("client_secret", "def");
                then.status(200).json_body(serde_json::json!([]));
            })
            .await;

        let client = GitHubClient::new(&server.base_url(), &server.base_url(), "packages")
            .unwrap()
            .with_credentials(ClientCredentials::from_values(
                Some("abc".to_string()),
                Some("def".to_string()),
            ));
        let listing = client
            .list_directory(&RepositoryRef::new("babel", "minify", "master"))
            .await
            .unwrap();

        listing_mock.assert_async().await;
        assert!(listing.entries.is_empty());
    }

    #[tokio::test]
    async fn test_list_directory_rejects_error_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/repos/babel/babel/contents/packages");
                then.status(403)
                    .json_body(serde_json::json!({"message": "API rate limit exceeded"}));
            })
            .await;

        let client = GitHubClient::new(&server.base_url(), &server.base_url(), "packages")
            .unwrap()
            .with_credentials(credentials());
        let err = client
            .list_directory(&RepositoryRef::new("babel", "babel", "6.x"))
            .await
            .unwrap_err();

        assert!(matches!(err, SyncError::ListingError { .. }));
        assert!(err.to_string().contains("babel/babel@6.x"));
        assert!(!err.to_string().contains("s%26cret"));
    }

    #[tokio::test]
    async fn test_list_directory_rejects_non_array_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/repos/babel/babel/contents/packages");
                then.status(200).json_body(serde_json::json!({"name": "packages"}));
            })
            .await;

        let client = GitHubClient::new(&server.base_url(), &server.base_url(), "packages").unwrap();
        let err = client
            .list_directory(&RepositoryRef::new("babel", "babel", "6.x"))
            .await
            .unwrap_err();

        match err {
            SyncError::ListingError { source, .. } => {
                assert!(matches!(*source, SyncError::SerializationError(_)))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_raw_returns_text_and_fails_on_404() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/babel/babylon/master/README.md");
                then.status(200).body("# babylon\n\n> Parser\n\nBody");
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/babel/missing/master/README.md");
                then.status(404).body("404: Not Found");
            })
            .await;

        let client = GitHubClient::new(&server.base_url(), &server.base_url(), "packages").unwrap();

        let text = client
            .fetch_raw("/babel/babylon/master/README.md")
            .await
            .unwrap();
        assert_eq!(text, "# babylon\n\n> Parser\n\nBody");

        let err = client
            .fetch_raw("/babel/missing/master/README.md")
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::ApiError(_)));
    }
}
