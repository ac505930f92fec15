//! Continuous output timestamps across concatenated inputs

use crate::ports::MediaPacket;
use crate::timing::{rescale, Rational};

/// Rebasing state of one output track
///
/// Never reset between input files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RebaseState {
    next_output_timestamp: i64,
}

impl RebaseState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timestamp the next forwarded packet will receive
    pub fn next_output_timestamp(&self) -> i64 {
        self.next_output_timestamp
    }
}

/// What a single rebase did to a packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rebased {
    /// Timestamp assigned to the packet (pts and dts)
    pub timestamp: i64,
    /// Amount `next_output_timestamp` advanced, in the output timebase
    pub advance: i64,
    /// The packet carried a negative duration that was treated as zero
    pub clamped: bool,
}

/// Assign the track's next output timestamp to `packet` and advance the
/// state by the packet's duration converted to `output_timebase`.
///
/// Presentation and decode timestamps are set equal, so streams that need
/// decode reordering are not supported.
pub fn rebase<P: MediaPacket>(
    state: &mut RebaseState,
    input_timebase: Rational,
    output_timebase: Rational,
    packet: &mut P,
) -> Rebased {
    let timestamp = state.next_output_timestamp;
    packet.set_timestamp(timestamp);

    let scaled = rescale(packet.duration(), input_timebase, output_timebase);
    let clamped = scaled < 0;
    let advance = scaled.max(0);
    state.next_output_timestamp = timestamp.saturating_add(advance);

    packet.clear_position();

    Rebased {
        timestamp,
        advance,
        clamped,
    }
}
