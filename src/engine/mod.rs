//! Core concatenation engine module

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::OverwritePolicy;
use crate::listfile::DEFAULT_MAX_LINE_LENGTH;
use crate::streams::TrackKind;
use crate::timing::Rational;

pub mod concat;
pub mod rebaser;

pub use concat::ConcatenationDriver;
pub use rebaser::{rebase, RebaseState, Rebased};

/// Concatenation engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// File list path
    pub list_path: PathBuf,
    /// Output file path
    pub output_path: PathBuf,
    /// Track kinds carried to the output, in output index order
    pub track_kinds: Vec<TrackKind>,
    /// Maximum file list line length, terminator included
    pub max_line_length: usize,
    /// Behaviour when the output path already exists
    pub overwrite: OverwritePolicy,
}

impl EngineConfig {
    /// Configuration with default settings for one list/output pair
    pub fn new(list_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            list_path: list_path.into(),
            output_path: output_path.into(),
            track_kinds: vec![TrackKind::Video, TrackKind::Audio],
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            overwrite: OverwritePolicy::Always,
        }
    }
}

/// Driver lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DriverState {
    /// Nothing opened yet
    Init,
    /// List and output context open, waiting for the first input's tracks
    HeaderPending,
    /// Header written, forwarding packets
    Streaming,
    /// Trailer written and output closed
    Finalized,
    /// Aborted on the first error
    Failed,
}

impl fmt::Display for DriverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DriverState::Init => "init",
            DriverState::HeaderPending => "header-pending",
            DriverState::Streaming => "streaming",
            DriverState::Finalized => "finalized",
            DriverState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Summary of a finished run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConcatReport {
    pub output_path: PathBuf,
    /// Number of list entries opened and drained
    pub files_processed: usize,
    pub tracks: Vec<TrackReport>,
    /// Packets on tracks outside the output layout
    pub dropped_packets: u64,
    /// Packets whose negative duration was treated as zero
    pub clamped_durations: u64,
    pub elapsed_seconds: f64,
}

/// Per output track totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackReport {
    pub kind: TrackKind,
    pub output_index: usize,
    pub packets_written: u64,
    /// Accumulated duration in the output timebase
    pub next_output_timestamp: i64,
    pub timebase: Rational,
    pub duration_seconds: f64,
}

impl ConcatReport {
    pub fn track(&self, kind: TrackKind) -> Option<&TrackReport> {
        self.tracks.iter().find(|track| track.kind == kind)
    }

    pub fn packets_written(&self) -> u64 {
        self.tracks.iter().map(|track| track.packets_written).sum()
    }
}
