//! Error handling module for Framecat

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for Framecat operations
///
/// Every variant is fatal for a concatenation run; callers outside the
/// library only ever see [`FramecatError::exit_status`].
#[derive(Error, Debug)]
pub enum FramecatError {
    /// The file list cannot be opened or read
    #[error("Could not open input file list '{}': {source}", path.display())]
    ListUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file list contained no entries
    #[error("Input file list '{}' is empty", path.display())]
    EmptyList { path: PathBuf },

    /// No output container can be derived for the output path
    #[error("Could not create output context for '{}': {message}", path.display())]
    OutputContextUnavailable { path: PathBuf, message: String },

    /// An input file cannot be opened
    #[error("Could not open input file '{}': {message}", path.display())]
    InputUnopenable { path: PathBuf, message: String },

    /// An input file's track metadata cannot be read
    #[error("Could not find stream information in '{}': {message}", path.display())]
    InputUnprobeable { path: PathBuf, message: String },

    /// A packet could not be read from an open input
    #[error("Error reading packet from '{}': {message}", path.display())]
    PacketReadFailed { path: PathBuf, message: String },

    /// The output destination cannot be opened
    #[error("Could not open output file '{}': {message}", path.display())]
    OutputSinkUnopenable { path: PathBuf, message: String },

    /// The output destination exists and overwriting is disabled
    #[error("Output file '{}' exists and overwrite is disabled", path.display())]
    OutputExists { path: PathBuf },

    /// A track could not be added to the output
    #[error("Could not add output track: {message}")]
    TrackSetupFailed { message: String },

    /// The output header could not be written
    #[error("Error occurred when opening output file: {message}")]
    HeaderWriteFailed { message: String },

    /// A packet could not be written to the output
    #[error("Error writing frame to '{}': {message}", path.display())]
    FrameWriteFailed { path: PathBuf, message: String },

    /// The output trailer could not be written
    #[error("Error writing output trailer: {message}")]
    TrailerWriteFailed { message: String },

    /// A driver operation was invoked out of order
    #[error("Invalid driver state: {message}")]
    InvalidState { message: String },

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// FFmpeg initialization error
    #[error("Failed to initialize FFmpeg: {message}")]
    FFmpegInitError { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl FramecatError {
    /// External status code for this error. The status space does not
    /// distinguish failure causes.
    pub fn exit_status(&self) -> i32 {
        1
    }
}

/// Result type alias for Framecat operations
pub type FramecatResult<T> = std::result::Result<T, FramecatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_errors_share_status() {
        let errors = vec![
            FramecatError::EmptyList { path: "list.txt".into() },
            FramecatError::HeaderWriteFailed { message: "x".to_string() },
            FramecatError::Config { message: "x".to_string() },
        ];
        for error in errors {
            assert_eq!(error.exit_status(), 1);
        }
    }

    #[test]
    fn test_diagnostic_names_path() {
        let error = FramecatError::InputUnopenable {
            path: "missing.mp4".into(),
            message: "No such file or directory".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Could not open input file 'missing.mp4': No such file or directory"
        );
    }
}
