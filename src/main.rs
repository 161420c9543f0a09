use program_smoke::{SmokeConfig, SmokeTest};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Optional configuration file, next to the working directory.
static CONFIG_FILE: &str = "Smoke.toml";

async fn run() -> anyhow::Result<()> {
    let path = PathBuf::from(CONFIG_FILE);
    let config = SmokeConfig::load(path.exists().then(|| path.as_path()))?;

    tracing::info!(
        "Running {} on {} against {}",
        config.instruction,
        config.program,
        config.provider.url
    );

    let report = SmokeTest::from_config(&config)?.run().await?;

    tracing::info!(
        "Smoke test passed in {} ms",
        (report.finished_at - report.started_at).num_milliseconds()
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Setting default subscriber failed");

    if let Err(e) = run().await {
        tracing::error!("Smoke test failed: {:?}", e);
        std::process::exit(1);
    }
}
