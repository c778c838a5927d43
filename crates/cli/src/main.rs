use std::io::Write;

use anyhow::Context;
use pcloudfs_cli::{run, Command, USAGE};
use pcloudfs_remote::PCloudConfig;
use pcloudfs_vfs::PCloudFs;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging (tracing), filter from PCLOUDFS_LOG
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("PCLOUDFS_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = Command::parse(&args)?;

    // Help and version never log in
    match command {
        Command::Help => {
            println!("{USAGE}");
            return Ok(());
        }
        Command::Version => {
            println!("pcloudfs {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        _ => {}
    }

    PCloudConfig::create_default_if_missing();
    let config = PCloudConfig::load();

    let fs = PCloudFs::connect(&config)
        .await
        .context("Failed to log in to pCloud")?;
    tracing::debug!(fs = %fs, "Connected");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(&fs, &command, &mut out).await?;
    out.flush()?;
    Ok(())
}
