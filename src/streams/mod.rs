//! Track classification and output layout module

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{FramecatError, FramecatResult};

pub mod registry;

pub use registry::{OutputLayout, TrackRegistry, TrackSelection};

/// Kind of elementary stream carried by a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    /// Video stream
    Video,
    /// Audio stream
    Audio,
    /// Subtitle stream
    Subtitle,
    /// Data, attachment or unknown streams
    Other,
}

impl TrackKind {
    /// Whether tracks of this kind can appear in the output layout
    pub fn is_registrable(&self) -> bool {
        !matches!(self, TrackKind::Other)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrackKind::Video => "video",
            TrackKind::Audio => "audio",
            TrackKind::Subtitle => "subtitle",
            TrackKind::Other => "other",
        }
    }

    /// Parse a comma separated kind list such as `video,audio`
    pub fn parse_list(value: &str) -> FramecatResult<Vec<TrackKind>> {
        value
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(TrackKind::from_str)
            .collect()
    }
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrackKind {
    type Err = FramecatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "video" | "v" => Ok(TrackKind::Video),
            "audio" | "a" => Ok(TrackKind::Audio),
            "subtitle" | "subtitles" | "s" => Ok(TrackKind::Subtitle),
            "other" => Ok(TrackKind::Other),
            other => Err(FramecatError::Config {
                message: format!("Unknown track kind: {}", other),
            }),
        }
    }
}
