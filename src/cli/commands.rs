//! Command handlers for the manifest fetcher CLI
//!
//! This module implements the command handlers that connect CLI arguments and
//! configuration to the batch pipeline and report results to the operator.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::app::{BatchOrchestrator, BatchSummary, HttpFetcher, StreamJobRunner};
use crate::cli::{CheckArgs, InitConfigArgs, RunArgs};
use crate::config::{load_streams, AppConfig};
use crate::errors::{AppError, Result};

const RULE_WIDTH: usize = 80;

/// Handle the run command
///
/// Loads the streams file, then runs every job in order. Job failures are
/// reported in the summary and do not make the command fail. Neither does a
/// summary file that cannot be written; only a missing or invalid streams
/// file does.
pub async fn handle_run(args: RunArgs, mut config: AppConfig) -> Result<BatchSummary> {
    if let Some(streams) = args.streams {
        config.batch.streams_file = streams;
    }
    if let Some(output) = args.output {
        config.output.root = output;
    }
    if let Some(secs) = args.delay_secs {
        config.batch.delay = Duration::from_secs(secs);
    }

    let jobs = load_streams(&config.batch.streams_file).await.map_err(|e| {
        error!("Could not load streams: {}", e);
        AppError::from(e)
    })?;
    println!("Loaded {} streams from {}", jobs.len(), config.batch.streams_file.display());
    println!("{}", "=".repeat(RULE_WIDTH));

    let runner_config = config.runner_config();
    let fetcher = HttpFetcher::from_config(&runner_config.client)?;
    let locator = config
        .upstream
        .locator
        .build(&runner_config.manifest_extension)
        .map_err(|e| AppError::generic(format!("Invalid manifest patterns: {e}")))?;
    info!(
        "Writing manifests below {} with {:?} between streams",
        runner_config.output_root.display(),
        config.batch.delay
    );

    let runner = StreamJobRunner::new(Arc::new(fetcher), locator, runner_config);
    let summary = BatchOrchestrator::new(&runner, config.batch.delay)
        .run(&jobs)
        .await;

    print_summary(&summary);

    if let Some(path) = args.summary {
        match write_summary(&summary, &path).await {
            Ok(()) => println!("Summary written to {}", path.display()),
            Err(e) => warn!("Could not write summary to {}: {}", path.display(), e),
        }
    }

    Ok(summary)
}

/// Print the batch summary for the operator
pub fn print_summary(summary: &BatchSummary) {
    println!();
    println!("{}", "=".repeat(RULE_WIDTH));
    println!("SUMMARY");
    println!("{}", "=".repeat(RULE_WIDTH));
    println!("Total streams: {}", summary.total);
    println!("Successful: {}", summary.success_count);
    println!("Failed: {}", summary.failure_count);
    if let Some(duration) = summary.duration() {
        println!("Duration: {}s", duration.num_seconds());
    }

    if !summary.failures.is_empty() {
        println!();
        println!("Failed streams:");
        for failure in &summary.failures {
            println!(
                "  - {} ({}/{})",
                failure.name, failure.location, failure.stream_id
            );
            println!("    Error: {}", failure.error);
        }
    }
}

async fn write_summary(summary: &BatchSummary, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(summary)
        .map_err(|e| AppError::generic(format!("Failed to serialize summary: {e}")))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, json).await?;
    Ok(())
}

/// Handle the check command
///
/// Loads the streams file and lists each job with its output path. Jobs that
/// would write to the same file are reported.
pub async fn handle_check(args: CheckArgs, config: AppConfig) -> Result<()> {
    let streams_file = args.streams.unwrap_or(config.batch.streams_file.clone());
    let jobs = load_streams(&streams_file).await?;
    let runner_config = config.runner_config();

    println!("{} streams in {}", jobs.len(), streams_file.display());
    let mut seen: HashMap<PathBuf, &str> = HashMap::new();
    let mut collisions = 0;

    for (idx, job) in jobs.iter().enumerate() {
        let path = job.output_path(&runner_config.output_root, &runner_config.file_extension);
        println!("[{}/{}] {} -> {}", idx + 1, jobs.len(), job.name, path.display());

        if let Some(previous) = seen.insert(path.clone(), job.name.as_str()) {
            collisions += 1;
            warn!(
                "{} and {} both write to {}",
                previous,
                job.name,
                path.display()
            );
        }
    }

    if collisions > 0 {
        println!("{} streams share an output path with an earlier stream", collisions);
    } else {
        println!("All output paths are distinct");
    }
    Ok(())
}

/// Handle the init-config command
pub async fn handle_init_config(args: InitConfigArgs) -> Result<PathBuf> {
    let path = match args.path {
        Some(path) => path,
        None => AppConfig::default_config_path()
            .ok_or_else(|| AppError::generic("Could not determine user config directory"))?,
    };

    if path.exists() && !args.force {
        return Err(AppError::generic(format!(
            "{} already exists. Use --force to overwrite",
            path.display()
        )));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&path, AppConfig::generate_default_config_content()).await?;

    println!("Created configuration file: {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_run_fails_on_missing_streams_file() {
        let temp_dir = TempDir::new().unwrap();
        let args = RunArgs {
            streams: Some(temp_dir.path().join("missing.json")),
            ..Default::default()
        };

        let result = handle_run(args, AppConfig::default()).await;
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[tokio::test]
    async fn test_run_with_empty_batch_writes_summary() {
        let temp_dir = TempDir::new().unwrap();
        let streams = temp_dir.path().join("streams.json");
        tokio::fs::write(&streams, "[]").await.unwrap();
        let summary_path = temp_dir.path().join("reports").join("summary.json");

        let args = RunArgs {
            streams: Some(streams),
            output: Some(temp_dir.path().join("out")),
            delay_secs: Some(0),
            summary: Some(summary_path.clone()),
        };

        let summary = handle_run(args, AppConfig::default()).await.unwrap();
        assert_eq!(summary.total, 0);

        let written: serde_json::Value =
            serde_json::from_str(&tokio::fs::read_to_string(&summary_path).await.unwrap())
                .unwrap();
        assert_eq!(written["total"], 0);
    }

    #[tokio::test]
    async fn test_run_succeeds_when_summary_cannot_be_written() {
        let temp_dir = TempDir::new().unwrap();
        let streams = temp_dir.path().join("streams.json");
        tokio::fs::write(&streams, "[]").await.unwrap();
        let blocker = temp_dir.path().join("not-a-dir");
        tokio::fs::write(&blocker, "file").await.unwrap();

        let args = RunArgs {
            streams: Some(streams),
            output: Some(temp_dir.path().join("out")),
            delay_secs: Some(0),
            summary: Some(blocker.join("summary.json")),
        };

        let summary = handle_run(args, AppConfig::default()).await.unwrap();
        assert_eq!(summary.total, 0);
        assert!(!blocker.join("summary.json").exists());
    }

    #[tokio::test]
    async fn test_check_lists_streams() {
        let temp_dir = TempDir::new().unwrap();
        let streams = temp_dir.path().join("streams.json");
        tokio::fs::write(
            &streams,
            r#"[
                {"country": "TR", "subdivision": "53", "folder_name": "a", "stream_id": "1", "name": "A", "referer": "https://r/"},
                {"country": "TR", "subdivision": "53", "folder_name": "a", "stream_id": "1", "name": "A again", "referer": "https://r/"}
            ]"#,
        )
        .await
        .unwrap();

        let result = handle_check(
            CheckArgs {
                streams: Some(streams),
            },
            AppConfig::default(),
        )
        .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_init_config_respects_force() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("conf").join("config.toml");

        let args = InitConfigArgs {
            path: Some(path.clone()),
            force: false,
        };
        handle_init_config(args.clone()).await.unwrap();
        assert!(path.exists());

        assert!(handle_init_config(args).await.is_err());

        let forced = InitConfigArgs {
            path: Some(path.clone()),
            force: true,
        };
        assert!(handle_init_config(forced).await.is_ok());

        let loaded = AppConfig::load(Some(path)).await.unwrap();
        assert_eq!(loaded.batch.delay, Duration::from_secs(2));
    }
}
