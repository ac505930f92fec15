// Ports - Interface definitions for the container layer

use std::path::Path;

use crate::error::FramecatResult;
use crate::streams::TrackKind;
use crate::timing::Rational;

/// One track as enumerated by a demuxer
#[derive(Debug, Clone, PartialEq)]
pub struct TrackInfo {
    /// Index in the owning container's track numbering
    pub index: usize,
    pub kind: TrackKind,
    pub timebase: Rational,
    /// Short codec name, informational only
    pub codec: String,
}

impl TrackInfo {
    pub fn new(index: usize, kind: TrackKind, timebase: Rational) -> Self {
        Self {
            index,
            kind,
            timebase,
            codec: String::new(),
        }
    }

    pub fn with_codec(mut self, codec: impl Into<String>) -> Self {
        self.codec = codec.into();
        self
    }
}

/// Compressed access unit moving from a demuxer to a muxer
pub trait MediaPacket {
    /// Track index in the numbering of the container the packet belongs to
    fn track_index(&self) -> usize;

    fn set_track_index(&mut self, index: usize);

    /// Duration in the source track's timebase, 0 when undefined
    fn duration(&self) -> i64;

    /// Set presentation and decode timestamps to the same value
    fn set_timestamp(&mut self, timestamp: i64);

    /// Drop the source byte offset, meaningless in another container
    fn clear_position(&mut self);
}

/// An opened and probed input container
pub trait DemuxInput {
    type Packet: MediaPacket;

    fn path(&self) -> &Path;

    /// Tracks in enumeration order
    fn tracks(&self) -> &[TrackInfo];

    /// Next packet, `Ok(None)` once the input is exhausted
    fn read_packet(&mut self) -> FramecatResult<Option<Self::Packet>>;
}

/// An output container under construction.
///
/// Dropping the value releases the sink without writing a trailer.
pub trait MuxOutput {
    type Input: DemuxInput;

    /// Create an output track copying the codec parameters of `input_track`.
    /// Returns the new output track index.
    fn add_track(&mut self, input: &Self::Input, input_track: usize) -> FramecatResult<usize>;

    /// Open the physical destination
    fn open_sink(&mut self) -> FramecatResult<()>;

    fn write_header(&mut self) -> FramecatResult<()>;

    /// Timebase of an output track, final once the header is written
    fn track_timebase(&self, output_index: usize) -> Option<Rational>;

    /// Hand a packet to the muxer for interleaved writing
    fn write_interleaved(
        &mut self,
        packet: <Self::Input as DemuxInput>::Packet,
    ) -> FramecatResult<()>;

    fn write_trailer(&mut self) -> FramecatResult<()>;
}

/// Factory for demuxers and muxers
pub trait ContainerIo {
    type Input: DemuxInput;
    type Output: MuxOutput<Input = Self::Input>;

    /// Allocate an output container whose format is derived from `path`
    fn create_output(&mut self, path: &Path) -> FramecatResult<Self::Output>;

    /// Open and probe an input container
    fn open_input(&mut self, path: &Path) -> FramecatResult<Self::Input>;
}
