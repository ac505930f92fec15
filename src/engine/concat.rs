//! Per-file concatenation loop

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, trace, warn};

use crate::config::OverwritePolicy;
use crate::engine::rebaser::{rebase, RebaseState};
use crate::engine::{ConcatReport, DriverState, EngineConfig, TrackReport};
use crate::error::{FramecatError, FramecatResult};
use crate::listfile::FileList;
use crate::ports::{ContainerIo, DemuxInput, MediaPacket, MuxOutput};
use crate::streams::{OutputLayout, TrackKind, TrackRegistry, TrackSelection};
use crate::timing::Rational;

/// Output side of a run once the header is written
struct OutputPlan {
    tracks: Vec<OutputTrack>,
}

struct OutputTrack {
    kind: TrackKind,
    output_index: usize,
    timebase: Rational,
    state: RebaseState,
    packets_written: u64,
}

impl OutputPlan {
    fn from_layout<O: MuxOutput>(layout: &OutputLayout, output: &O) -> FramecatResult<Self> {
        let mut tracks = Vec::with_capacity(layout.len());
        for (kind, output_index) in layout.iter() {
            let timebase = output.track_timebase(output_index).ok_or_else(|| {
                FramecatError::InvalidState {
                    message: format!("output track #{} has no timebase", output_index),
                }
            })?;
            debug!("Output {} track #{} timebase {}", kind, output_index, timebase);
            tracks.push(OutputTrack {
                kind,
                output_index,
                timebase,
                state: RebaseState::new(),
                packets_written: 0,
            });
        }
        Ok(Self { tracks })
    }

    fn track_mut(&mut self, kind: TrackKind) -> Option<&mut OutputTrack> {
        self.tracks.iter_mut().find(|track| track.kind == kind)
    }

    fn into_reports(self) -> Vec<TrackReport> {
        self.tracks
            .into_iter()
            .map(|track| {
                let next = track.state.next_output_timestamp();
                TrackReport {
                    kind: track.kind,
                    output_index: track.output_index,
                    packets_written: track.packets_written,
                    next_output_timestamp: next,
                    timebase: track.timebase,
                    duration_seconds: track.timebase.to_seconds(next),
                }
            })
            .collect()
    }
}

/// Drives one concatenation run from file list to finalized output
pub struct ConcatenationDriver<C: ContainerIo> {
    io: C,
    config: EngineConfig,
    registry: TrackRegistry,
    state: DriverState,
}

impl<C: ContainerIo> ConcatenationDriver<C> {
    pub fn new(io: C, config: EngineConfig) -> Self {
        let registry = TrackRegistry::new(config.track_kinds.clone());
        Self {
            io,
            config,
            registry,
            state: DriverState::Init,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Run the whole concatenation. Stops at the first error; in that case
    /// no trailer is written and the driver ends in [`DriverState::Failed`].
    pub fn run(&mut self) -> FramecatResult<ConcatReport> {
        if self.state != DriverState::Init {
            return Err(FramecatError::InvalidState {
                message: format!("driver already ran (state: {})", self.state),
            });
        }

        let result = self.execute();
        if result.is_err() {
            self.transition(DriverState::Failed);
        }
        result
    }

    fn transition(&mut self, next: DriverState) {
        debug!("Driver state: {} -> {}", self.state, next);
        self.state = next;
    }

    fn execute(&mut self) -> FramecatResult<ConcatReport> {
        let started = Instant::now();
        let list_path = self.config.list_path.clone();
        let output_path = self.config.output_path.clone();

        info!("Concatenating list {} into {}", list_path.display(), output_path.display());

        if output_blocked(&output_path, self.config.overwrite) {
            return Err(FramecatError::OutputExists { path: output_path });
        }

        let mut list = FileList::open(&list_path, self.config.max_line_length)?;
        let mut output = self.io.create_output(&output_path)?;
        self.transition(DriverState::HeaderPending);

        let mut report = ConcatReport {
            output_path: output_path.clone(),
            files_processed: 0,
            tracks: Vec::new(),
            dropped_packets: 0,
            clamped_durations: 0,
            elapsed_seconds: 0.0,
        };
        let mut active: Option<OutputPlan> = None;

        while let Some(entry) = list.next_entry()? {
            let file_number = report.files_processed + 1;
            info!("Processing file {}: {}", file_number, entry.path().display());

            let mut input = self.io.open_input(entry.path())?;

            let mut plan = match active.take() {
                Some(plan) => plan,
                None => self.start_output(&input, &mut output)?,
            };

            let selection = self.registry.discover(input.tracks());
            if selection.is_empty() {
                warn!("No usable tracks in {}", entry.path().display());
            }

            Self::stream_file(&mut input, &selection, &mut plan, &mut output, &mut report)?;
            drop(input);

            report.files_processed = file_number;
            active = Some(plan);
        }

        let Some(plan) = active else {
            return Err(FramecatError::EmptyList { path: list_path });
        };

        output.write_trailer()?;
        drop(output);
        self.transition(DriverState::Finalized);

        report.tracks = plan.into_reports();
        report.elapsed_seconds = started.elapsed().as_secs_f64();

        info!(
            "Concatenated {} file(s), {} packet(s) written, {} dropped",
            report.files_processed,
            report.packets_written(),
            report.dropped_packets
        );
        Ok(report)
    }

    /// Register output tracks from the first input, open the sink and write
    /// the header
    fn start_output(
        &mut self,
        first: &C::Input,
        output: &mut C::Output,
    ) -> FramecatResult<OutputPlan> {
        let layout = self.registry.register(first, output)?;
        if layout.is_empty() {
            warn!("First input {} has no registrable tracks", first.path().display());
        }

        output.open_sink()?;
        output.write_header()?;

        let plan = OutputPlan::from_layout(&layout, output)?;
        self.transition(DriverState::Streaming);
        Ok(plan)
    }

    /// Forward every selected packet of one input, rebased and remapped
    fn stream_file(
        input: &mut C::Input,
        selection: &TrackSelection,
        plan: &mut OutputPlan,
        output: &mut C::Output,
        report: &mut ConcatReport,
    ) -> FramecatResult<()> {
        let path = input.path().to_path_buf();
        let mut forwarded: u64 = 0;

        while let Some(mut packet) = input.read_packet()? {
            let input_index = packet.track_index();

            let Some(selected) = selection.lookup(input_index) else {
                trace!("Dropping packet on unselected input track #{}", input_index);
                report.dropped_packets += 1;
                continue;
            };
            let Some(track) = plan.track_mut(selected.kind) else {
                trace!("Dropping {} packet: kind not in output layout", selected.kind);
                report.dropped_packets += 1;
                continue;
            };

            let rebased = rebase(&mut track.state, selected.timebase, track.timebase, &mut packet);
            if rebased.clamped {
                warn!(
                    "Negative packet duration on {} track in {}, treated as zero",
                    track.kind,
                    path.display()
                );
                report.clamped_durations += 1;
            }
            packet.set_track_index(track.output_index);

            trace!(
                "{} packet: input #{} -> output #{} ts={} advance={}",
                track.kind,
                input_index,
                track.output_index,
                rebased.timestamp,
                rebased.advance
            );

            output.write_interleaved(packet)?;
            track.packets_written += 1;
            forwarded += 1;
        }

        debug!("Forwarded {} packet(s) from {}", forwarded, path.display());
        Ok(())
    }
}

/// Convenience wrapper running a fresh driver to completion
pub fn run_concat<C: ContainerIo>(io: C, config: EngineConfig) -> FramecatResult<ConcatReport> {
    ConcatenationDriver::new(io, config).run()
}

/// Whether `path` names something the driver would refuse under `policy`
pub fn output_blocked(path: &Path, policy: OverwritePolicy) -> bool {
    policy == OverwritePolicy::Never && path.exists()
}
