//! linkcheck - command line front end for linkcheck-core.
//!
//! Exit codes: 0 every link reachable, 1 some link not available, 2 error.

mod cli;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use linkcheck_core::impls::{HttpProbe, JsonFileStore};
use linkcheck_core::ports::StatusStore;
use linkcheck_core::{CheckerConfig, LinkChecker, LinkCounts, TaskId};

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    // .env は無くてもよい
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "linkcheck_core=info,linkcheck=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    let mut config = CheckerConfig::from_env().context("reading LINKCHECK_* environment")?;
    cli.apply(&mut config);
    config.validate().context("invalid command line options")?;

    match &cli.command {
        Commands::Check { links, poll_ms } => {
            check(config, cli.no_persist, links, Duration::from_millis(*poll_ms)).await
        }
        Commands::Report { ids } => {
            if cli.no_persist {
                bail!("report reads the store file; drop --no-persist");
            }
            report(&config, ids).await
        }
    }
}

async fn open_store(config: &CheckerConfig, no_persist: bool) -> JsonFileStore {
    if no_persist {
        return JsonFileStore::in_memory();
    }

    let (store, load_error) = JsonFileStore::open(&config.data_file).await;
    if let Some(err) = load_error {
        // 読めなくても空の store で続行する
        tracing::warn!(error = %err, "starting with an empty status store");
    }
    store
}

async fn check(
    config: CheckerConfig,
    no_persist: bool,
    links: &[String],
    poll: Duration,
) -> Result<i32> {
    let store = Arc::new(open_store(&config, no_persist).await);
    let probe = HttpProbe::new(config.probe_timeout).context("building HTTP client")?;
    let checker = LinkChecker::new(config, store, Arc::new(probe));

    checker.recover_pending().await;
    checker.start().await;

    let task_id = checker
        .submit(links.iter().cloned())
        .await
        .context("submitting links")?;

    let finished = tokio::select! {
        task = checker.wait_for(task_id, poll) => task,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!(%task_id, "interrupted, stopping workers");
            None
        }
    };

    checker.stop().await.context("stopping workers")?;

    let task = match finished {
        Some(task) => task,
        None => {
            // 中断: 途中の状態を出して終わる
            if let Some(task) = checker.query(&[task_id]).await.into_iter().next() {
                let counts = LinkCounts::of(&task);
                tracing::warn!(
                    %task_id,
                    pending = counts.pending(),
                    total = counts.total(),
                    "check interrupted before every link finished"
                );
                println!("{}", serde_json::to_string_pretty(&task)?);
            }
            return Ok(2);
        }
    };

    let counts = LinkCounts::of(&task);
    tracing::info!(
        %task_id,
        total = counts.total(),
        available = counts.available,
        not_available = counts.not_available,
        "check finished"
    );
    println!("{}", serde_json::to_string_pretty(&task)?);

    Ok(if task.has_unavailable() { 1 } else { 0 })
}

async fn report(config: &CheckerConfig, ids: &[TaskId]) -> Result<i32> {
    let store = JsonFileStore::try_open(&config.data_file)
        .await
        .with_context(|| format!("opening {}", config.data_file.display()))?;

    let tasks = store.get_tasks(ids).await;
    if tasks.len() < ids.len() {
        tracing::info!(requested = ids.len(), found = tasks.len(), "some ids are unknown");
    }
    println!("{}", serde_json::to_string_pretty(&tasks)?);
    Ok(0)
}
