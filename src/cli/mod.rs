//! CLI module for Framecat
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

pub use args::{ConcatArgs, ListArgs};

/// Framecat - lossless media concatenation
///
/// Joins media files listed in a text file into one container, copying
/// packets without re-encoding.
#[derive(Parser, Debug)]
#[command(name = "framecat")]
#[command(about = "Framecat - Concatenate media files without re-encoding")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level or filter directive (overrides config and FRAMECAT_LOG_LEVEL)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format: pretty, compact or json
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Configuration file (default: ./framecat.toml when present)
    #[arg(long, global = true, env = "FRAMECAT_CONFIG")]
    pub config: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Concatenate the files named in a list file
    Concat(args::ConcatArgs),
    /// Write a file list from the media files in a directory
    List(args::ListArgs),
}
