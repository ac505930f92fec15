//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Arguments for the concat command
#[derive(Args, Debug)]
pub struct ConcatArgs {
    /// Text file listing one input media path per line
    pub list: PathBuf,

    /// Output file; the container format follows its extension
    pub output: PathBuf,

    /// Print the run report as JSON on stdout; the completion line moves to stderr
    #[arg(long)]
    pub json: bool,

    /// Track kinds to carry, in output order (e.g. "video,audio")
    #[arg(long)]
    pub tracks: Option<String>,

    /// Maximum list line length, newline included
    #[arg(long)]
    pub max_line_length: Option<usize>,

    /// Overwrite behavior: always or never
    #[arg(long)]
    pub overwrite: Option<String>,
}

/// Arguments for the list command
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Directory holding the segments
    pub dir: PathBuf,

    /// File extension to include
    #[arg(long, default_value = "mp4")]
    pub ext: String,

    /// Write the list here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
