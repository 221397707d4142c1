//! Typography Guide - Demo Driver
//!
//! Runs the guide over the in-memory standard page and reads shell commands
//! from stdin. Type `help` for the command list.

use std::time::Instant;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};

use typography_guide::app::TypographyGuide;
use typography_guide::config::GuideConfig;
use typography_guide::page::standard_page;
use typography_guide::preferences::SystemPreferences;
use typography_guide::shell::{self, Command, Outcome};
use typography_guide::storage::{FileStorage, MemoryStorage, Storage};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting Typography Guide...");

    let config = GuideConfig::try_load().unwrap_or_else(|e| {
        warn!(error = %e, "Falling back to default config");
        GuideConfig::default()
    });

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("failed to build runtime")?;

    if !config.storage.persist {
        return runtime.block_on(run(config, MemoryStorage::new()));
    }
    match FileStorage::open_default() {
        Ok(storage) => {
            info!(path = ?storage.path(), "Using file storage");
            runtime.block_on(run(config, storage))
        }
        Err(e) => {
            warn!(error = %e, "File storage unavailable, state will not persist");
            runtime.block_on(run(config, MemoryStorage::new()))
        }
    }
}

async fn run<S: Storage>(config: GuideConfig, storage: S) -> anyhow::Result<()> {
    let mut guide = TypographyGuide::new(standard_page(), storage, SystemPreferences::default(), &config);
    guide.start(Instant::now());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        let deadline = guide.next_deadline();
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let now = Instant::now();
                guide.advance(now);
                let outcome = line
                    .parse::<Command>()
                    .and_then(|command| shell::execute(&mut guide, &command, now));
                match outcome {
                    Ok(Outcome::Quit) => break,
                    Ok(Outcome::Continue(Some(output))) => {
                        stdout.write_all(output.as_bytes()).await?;
                        stdout.write_all(b"\n").await?;
                        stdout.flush().await?;
                    }
                    Ok(Outcome::Continue(None)) => {}
                    Err(e) => warn!(error = %e, command = line, "Command failed"),
                }
            }
            _ = sleep_until(deadline) => {
                guide.advance(Instant::now());
            }
        }
    }

    info!("Typography Guide stopped");
    Ok(())
}

/// Sleep until `deadline`, or forever when no timer is pending
async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline.into()).await,
        None => std::future::pending().await,
    }
}
