//! Command-line host for the bulk splitter

use anyhow::{Context, Result};
use bulk_splitter::config::DEFAULT_CONFIG_FILE;
use bulk_splitter::{AppConfig, BulkReconstructor, JobConfig, SplitJob, DEFAULT_OUTPUT_NAME};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bulk-splitter")]
#[command(about = "Split binary captures into frame-aligned bulk files")]
#[command(version)]
struct Cli {
    /// Configuration file holding the default sizes and sync word
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a binary file into bulks
    Split {
        /// Path to the input binary file
        input_file: PathBuf,

        /// Desired bulk size in GB (default from config)
        #[arg(long)]
        bulk_size_gb: Option<f64>,

        /// Frame size in bytes (default from config)
        #[arg(long)]
        frame_size_bytes: Option<usize>,

        /// Prefix for the bulk files (default: input file name without extension)
        #[arg(long)]
        output_prefix: Option<String>,

        /// Sync word in hex for auto-detection (default from config)
        #[arg(long)]
        sync_word_hex: Option<String>,

        /// Detect the frame size from the sync word
        #[arg(long)]
        auto_detect_frame_size: bool,
    },

    /// Reassemble a bulk set into one file
    Reconstruct {
        /// Prefix used for the bulk files
        #[arg(long)]
        prefix: String,

        /// Directory holding the bulk files
        #[arg(long, default_value = ".")]
        directory: PathBuf,

        /// Name of the reassembled file, written inside the directory
        #[arg(long, default_value = DEFAULT_OUTPUT_NAME)]
        output_name: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let defaults = AppConfig::load_or_default(&cli.config);

    match cli.command {
        Commands::Split {
            input_file,
            bulk_size_gb,
            frame_size_bytes,
            output_prefix,
            sync_word_hex,
            auto_detect_frame_size,
        } => {
            let mut job = JobConfig::from_defaults(input_file, &defaults);
            if let Some(gb) = bulk_size_gb {
                job.bulk_size_gb = gb;
            }
            if let Some(frame_size) = frame_size_bytes {
                job.frame_size_bytes = frame_size;
            }
            if let Some(sync_word) = sync_word_hex {
                job.sync_word_hex = sync_word;
            }
            job.output_prefix = output_prefix;
            job.auto_detect_frame_size = auto_detect_frame_size;
            run_split(job).await
        }
        Commands::Reconstruct {
            prefix,
            directory,
            output_name,
        } => {
            let output = BulkReconstructor::new(&directory)
                .reconstruct(&prefix, &output_name)
                .with_context(|| format!("Failed to reconstruct '{}' in {}", prefix, directory.display()))?;
            match output {
                Some(path) => info!("Reconstructed file: {}", path.display()),
                None => warn!("No bulk files found to reconstruct."),
            }
            Ok(())
        }
    }
}

/// Run the split on a blocking worker; Ctrl-C requests cancellation.
async fn run_split(job: JobConfig) -> Result<()> {
    let input = job.input_path.clone();
    let stop = Arc::new(AtomicBool::new(false));

    let stop_on_signal = Arc::clone(&stop);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the current frame");
            stop_on_signal.store(true, Ordering::Relaxed);
        }
    });

    let stop_flag = Arc::clone(&stop);
    let outcome = tokio::task::spawn_blocking(move || {
        let mut last_reported = None;
        SplitJob::new(job).run_with_hooks(
            |pct| {
                if last_reported != Some(pct) {
                    last_reported = Some(pct);
                    info!("Progress: {}%", pct);
                }
            },
            || stop_flag.load(Ordering::Relaxed),
        )
    })
    .await
    .context("Split worker panicked")?
    .with_context(|| format!("Failed to split {}", input.display()))?;

    if outcome.report.cancelled {
        info!("Split operation stopped by user.");
    } else {
        info!(
            "File splitting complete: {} bulk files, frame size {} bytes",
            outcome.report.bulks.len(),
            outcome.frame_size_used
        );
    }
    Ok(())
}
