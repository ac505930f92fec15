//! Output track registration and per-file track discovery

use std::collections::HashSet;

use tracing::{debug, info};

use crate::error::{FramecatError, FramecatResult};
use crate::ports::{DemuxInput, MuxOutput, TrackInfo};
use crate::streams::TrackKind;
use crate::timing::Rational;

/// Tracks chosen from one input file, at most one per kind
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackSelection {
    entries: Vec<SelectedTrack>,
}

/// A track picked from an input for forwarding
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectedTrack {
    pub kind: TrackKind,
    pub input_index: usize,
    pub timebase: Rational,
}

impl TrackSelection {
    /// Selected track matching a packet's input track index
    pub fn lookup(&self, input_index: usize) -> Option<&SelectedTrack> {
        self.entries.iter().find(|entry| entry.input_index == input_index)
    }

    pub fn get(&self, kind: TrackKind) -> Option<&SelectedTrack> {
        self.entries.iter().find(|entry| entry.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SelectedTrack> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Fixed mapping from track kind to output track index
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputLayout {
    entries: Vec<(TrackKind, usize)>,
}

impl OutputLayout {
    pub fn output_index(&self, kind: TrackKind) -> Option<usize> {
        self.entries
            .iter()
            .find(|(entry_kind, _)| *entry_kind == kind)
            .map(|(_, index)| *index)
    }

    pub fn video_output_index(&self) -> Option<usize> {
        self.output_index(TrackKind::Video)
    }

    pub fn audio_output_index(&self) -> Option<usize> {
        self.output_index(TrackKind::Audio)
    }

    /// Registered `(kind, output index)` pairs in allocation order
    pub fn iter(&self) -> impl Iterator<Item = (TrackKind, usize)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, kind: TrackKind, output_index: usize) {
        self.entries.push((kind, output_index));
    }

    /// Check that no kind or output index appears twice
    pub fn validate(&self) -> FramecatResult<()> {
        let mut kinds = HashSet::new();
        let mut indices = HashSet::new();

        for (kind, index) in self.iter() {
            if !kinds.insert(kind) {
                return Err(FramecatError::TrackSetupFailed {
                    message: format!("Track kind {} registered twice", kind),
                });
            }
            if !indices.insert(index) {
                return Err(FramecatError::TrackSetupFailed {
                    message: "Duplicate output track index".to_string(),
                });
            }
        }

        Ok(())
    }
}

/// Decides which track kinds reach the output and allocates their indices
#[derive(Debug, Clone)]
pub struct TrackRegistry {
    kinds: Vec<TrackKind>,
}

impl Default for TrackRegistry {
    fn default() -> Self {
        Self::new(vec![TrackKind::Video, TrackKind::Audio])
    }
}

impl TrackRegistry {
    /// Create a registry for the given kinds. Order defines output index
    /// allocation order; duplicates and non-registrable kinds are ignored.
    pub fn new(kinds: Vec<TrackKind>) -> Self {
        let mut unique = Vec::with_capacity(kinds.len());
        for kind in kinds {
            if kind.is_registrable() && !unique.contains(&kind) {
                unique.push(kind);
            }
        }
        Self { kinds: unique }
    }

    pub fn kinds(&self) -> &[TrackKind] {
        &self.kinds
    }

    /// Pick the first track of every registrable kind, in enumeration order
    pub fn discover(&self, tracks: &[TrackInfo]) -> TrackSelection {
        let entries = self
            .kinds
            .iter()
            .filter_map(|kind| {
                tracks
                    .iter()
                    .find(|track| track.kind == *kind)
                    .map(|track| SelectedTrack {
                        kind: *kind,
                        input_index: track.index,
                        timebase: track.timebase,
                    })
            })
            .collect();

        TrackSelection { entries }
    }

    /// Create output tracks from the first input file.
    ///
    /// Kinds missing from `input` are never represented in the output.
    pub fn register<O: MuxOutput>(
        &self,
        input: &O::Input,
        output: &mut O,
    ) -> FramecatResult<OutputLayout> {
        let selection = self.discover(input.tracks());
        let mut layout = OutputLayout::default();

        for selected in selection.iter() {
            let output_index = output.add_track(input, selected.input_index)?;
            debug!(
                "Registered {} track: input #{} -> output #{}",
                selected.kind, selected.input_index, output_index
            );
            layout.insert(selected.kind, output_index);
        }

        layout.validate()?;

        info!(
            "Output layout from {}: {} track(s)",
            input.path().display(),
            layout.len()
        );
        Ok(layout)
    }
}
