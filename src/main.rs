use anyhow::Context;
use clap::Parser;
use readme_sync::utils::{logger, validation::Validate};
use readme_sync::{
    CliConfig, ClientCredentials, GitHubClient, LocalStorage, ReadmePipeline, SyncConfig,
    SyncEngine, SyncError,
};

fn exit_with(e: &SyncError) -> ! {
    if e.is_config_error() {
        tracing::error!("❌ Configuration validation failed: {}", e);
    } else {
        tracing::error!("❌ {}", e);
    }
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    let config = SyncConfig::from_cli(&cli).context("Failed to load configuration")?;
    tracing::debug!("Resolved config: {:?}", config);

    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    let credentials = ClientCredentials::from_env();
    if credentials.is_some() {
        tracing::debug!("Using GitHub client credentials for listing requests");
    }

    let host = GitHubClient::from_config(&config, credentials)
        .context("Failed to build HTTP client")?;
    let storage = LocalStorage::new(config.output_path.clone());
    let output_dir = storage.base_path().to_path_buf();
    let pipeline = ReadmePipeline::new(storage, host, config)
        .context("Failed to compile package naming rules")?;

    match SyncEngine::new(pipeline).run().await {
        // 個別 README 失敗不影響結束碼
        Ok(_report) => {
            tracing::info!("📁 Output saved to: {}", output_dir.display());
            Ok(())
        }
        Err(e) => exit_with(&e),
    }
}
