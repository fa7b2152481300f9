pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{ClientCredentials, GitHubClient, LocalStorage};
pub use config::SyncConfig;
pub use core::{etl::SyncEngine, pipeline::ReadmePipeline};
pub use utils::error::{Result, SyncError};
