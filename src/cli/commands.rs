//! Command implementations

use std::fs::File;
use std::io::{self, BufWriter};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::args::{ConcatArgs, ListArgs};
use crate::cli::{Cli, Commands};
use crate::config::FramecatConfig;
use crate::engine::ConcatReport;
use crate::error::FramecatResult;
use crate::listfile::{scan_directory, write_list};
use crate::utils::Utils;

/// Resolve configuration: defaults, file and environment, then CLI flags
pub fn build_config(cli: &Cli) -> FramecatResult<FramecatConfig> {
    let mut config = FramecatConfig::load(cli.config.as_deref())?;
    let mut overrides = 0;

    if let Some(level) = &cli.log_level {
        config.set("log.level", level)?;
        overrides += 1;
    }
    if let Some(format) = &cli.log_format {
        config.set("log.format", format)?;
        overrides += 1;
    }

    if let Commands::Concat(args) = &cli.command {
        if let Some(tracks) = &args.tracks {
            config.set("tracks.kinds", tracks)?;
            overrides += 1;
        }
        if let Some(max_line_length) = args.max_line_length {
            config.list.max_line_length = max_line_length;
            overrides += 1;
        }
        if let Some(overwrite) = &args.overwrite {
            config.set("output.overwrite", overwrite)?;
            overrides += 1;
        }
    }

    config.validate()?;
    tracing::debug!("Applied {} CLI configuration overrides", overrides);
    Ok(config)
}

/// Execute the concat command
pub fn concat(args: &ConcatArgs, config: &FramecatConfig) -> Result<()> {
    info!("List: {}", args.list.display());
    info!("Output: {}", args.output.display());

    let report = crate::concatenate(config.engine_config(&args.list, &args.output))?;

    if args.json {
        let json = serde_json::to_string_pretty(&report)
            .context("Failed to serialize report to JSON")?;
        println!("{}", json);
        eprintln!("{}", crate::success_line(&report.output_path));
    } else {
        log_report(&report);
        println!("{}", crate::success_line(&report.output_path));
    }

    Ok(())
}

/// Execute the list command
pub fn list(args: &ListArgs) -> Result<()> {
    let files = scan_directory(&args.dir, &args.ext)
        .with_context(|| format!("Failed to scan {}", args.dir.display()))?;

    if files.is_empty() {
        warn!("No .{} files found in {}", args.ext.trim_start_matches('.'), args.dir.display());
    }

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_list(&files, BufWriter::new(file))?;
            info!("Wrote {} entries to {}", files.len(), path.display());
        }
        None => write_list(&files, io::stdout().lock())?,
    }

    Ok(())
}

/// Log a run summary on the diagnostic stream
fn log_report(report: &ConcatReport) {
    info!(
        "Processed {} file(s) in {:.2}s",
        report.files_processed, report.elapsed_seconds
    );

    for track in &report.tracks {
        info!(
            "Output #{} {}: {} packet(s), duration {} ({} @ {})",
            track.output_index,
            track.kind,
            track.packets_written,
            Utils::format_seconds(track.duration_seconds),
            track.next_output_timestamp,
            track.timebase
        );
    }

    if report.dropped_packets > 0 {
        info!("Dropped {} packet(s) from unmapped tracks", report.dropped_packets);
    }
    if report.clamped_durations > 0 {
        warn!("{} packet(s) had negative durations", report.clamped_durations);
    }

    if let Ok(metadata) = std::fs::metadata(&report.output_path) {
        info!("Output size: {}", Utils::format_file_size(metadata.len()));
    }
}
