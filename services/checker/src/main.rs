//! Catalogue checker CLI.
//!
//! Runs every source file through the validation pipeline:
//! - Schema, geometry and metadata checks offline
//! - Live server probing in the strict profile
//! - Non-zero exit when any file carries an error

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use walkdir::WalkDir;

use validator::{BuiltinSchemaValidator, HttpFetcher, Pipeline, Profile};

#[derive(Parser, Debug)]
#[command(name = "checker")]
#[command(about = "Checks catalogue source files against schema, geometry and live servers")]
struct Args {
    /// Files or directories to check (directories are scanned for *.geojson)
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Check profile: basic (offline) or strict (probes the servers)
    #[arg(long, env = "CHECK_PROFILE", default_value = "basic")]
    profile: Profile,

    /// Maximum files checked concurrently
    #[arg(long, default_value = "8")]
    jobs: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout: u64,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let files = collect_files(&args.paths)?;
    info!(files = files.len(), profile = %args.profile, "collected source files");

    let fetcher = HttpFetcher::new(Duration::from_secs(args.timeout))
        .context("building HTTP client")?;
    let pipeline = Pipeline::new(
        args.profile,
        Arc::new(fetcher),
        Arc::new(BuiltinSchemaValidator),
        args.jobs,
    );

    let run = pipeline.run(files).await;

    for report in &run.reports {
        for message in report.ordered_messages() {
            println!(
                "{}: {}: {}",
                message.severity,
                report.path.display(),
                message.text
            );
        }
    }

    println!(
        "checked {} files, {} broken",
        run.files_checked(),
        run.files_broken()
    );
    let icon_bytes = run.embedded_icon_bytes();
    if icon_bytes > 0 {
        println!("hosting embedded icons externally would save {icon_bytes} bytes");
    }

    if run.broken() {
        println!("FAILED");
        std::process::exit(1);
    }
    println!("PASSED");
    Ok(())
}

/// Expand the argument list into the sorted set of .geojson files.
fn collect_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry = entry.with_context(|| format!("scanning {}", path.display()))?;
                if entry.file_type().is_file()
                    && entry.path().extension().is_some_and(|e| e == "geojson")
                {
                    files.push(entry.path().to_path_buf());
                }
            }
        } else {
            files.push(path.clone());
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_files_scans_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("europe").join("lu");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("b.geojson"), "{}").unwrap();
        std::fs::write(nested.join("a.geojson"), "{}").unwrap();
        std::fs::write(nested.join("notes.md"), "x").unwrap();

        let files = collect_files(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("a.geojson"));
        assert!(files[1].ends_with("b.geojson"));
    }

    #[test]
    fn test_collect_files_keeps_explicit_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("one.geojson");
        std::fs::write(&file, "{}").unwrap();
        let files = collect_files(&[file.clone(), file.clone()]).unwrap();
        assert_eq!(files, vec![file]);
    }
}
