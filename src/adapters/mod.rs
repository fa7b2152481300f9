// Adapters layer: concrete implementations for external systems (GitHub, local filesystem).

pub mod github;
pub mod storage;

pub use github::{ClientCredentials, GitHubClient};
pub use storage::LocalStorage;
