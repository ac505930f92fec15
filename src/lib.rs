//! Framecat Library
//!
//! Concatenates an ordered list of media files into one output container
//! without re-encoding. Packets are copied as-is; each output track gets a
//! continuous timeline across file boundaries.

use std::path::Path;

use tracing::error;

pub mod adapters;
pub mod capi;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod listfile;
pub mod ports;
pub mod streams;
pub mod timing;
pub mod utils;

// Re-export commonly used types
pub use adapters::LibavContainerIo;
pub use config::FramecatConfig;
pub use engine::{ConcatReport, ConcatenationDriver, DriverState, EngineConfig};
pub use error::{FramecatError, FramecatResult};
pub use streams::{OutputLayout, TrackKind, TrackRegistry};
pub use timing::{rescale, Rational};

/// Line printed on standard output after a successful run
pub fn success_line(output_path: &Path) -> String {
    format!("Concatenation complete. Output saved to {}", output_path.display())
}

/// Concatenate using the FFmpeg container backend
pub fn concatenate(config: EngineConfig) -> FramecatResult<ConcatReport> {
    let io = LibavContainerIo::new()?;
    engine::concat::run_concat(io, config)
}

/// Concatenate the files named in `list_path` into `output_path` with
/// default settings.
///
/// Returns 0 on success and 1 on any failure; the cause is written to
/// standard error.
pub fn concat_files(list_path: &Path, output_path: &Path) -> i32 {
    match concatenate(EngineConfig::new(list_path, output_path)) {
        Ok(report) => {
            println!("{}", success_line(&report.output_path));
            0
        }
        Err(e) => {
            error!("Concatenation failed: {}", e);
            eprintln!("{}", e);
            e.exit_status()
        }
    }
}
