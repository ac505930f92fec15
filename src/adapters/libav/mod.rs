//! Container I/O on top of the FFmpeg libraries
//!
//! Demuxing, muxing and codec parameter copying are delegated entirely to
//! libavformat through `ffmpeg-next`.

use std::ffi::CString;
use std::path::{Path, PathBuf};
use std::ptr;

use ffmpeg_next as ffmpeg;
use tracing::{debug, info};

use crate::error::{FramecatError, FramecatResult};
use crate::ports::{ContainerIo, DemuxInput, MediaPacket, MuxOutput, TrackInfo};
use crate::streams::TrackKind;
use crate::timing::Rational;

impl From<ffmpeg::Rational> for Rational {
    fn from(value: ffmpeg::Rational) -> Self {
        Rational::new(value.numerator(), value.denominator())
    }
}

impl From<ffmpeg::media::Type> for TrackKind {
    fn from(value: ffmpeg::media::Type) -> Self {
        match value {
            ffmpeg::media::Type::Video => TrackKind::Video,
            ffmpeg::media::Type::Audio => TrackKind::Audio,
            ffmpeg::media::Type::Subtitle => TrackKind::Subtitle,
            _ => TrackKind::Other,
        }
    }
}

impl MediaPacket for ffmpeg::Packet {
    fn track_index(&self) -> usize {
        self.stream()
    }

    fn set_track_index(&mut self, index: usize) {
        self.set_stream(index);
    }

    fn duration(&self) -> i64 {
        ffmpeg::Packet::duration(self)
    }

    fn set_timestamp(&mut self, timestamp: i64) {
        self.set_pts(Some(timestamp));
        self.set_dts(Some(timestamp));
    }

    fn clear_position(&mut self) {
        self.set_position(-1);
    }
}

/// Factory for libav-backed inputs and outputs
pub struct LibavContainerIo;

impl LibavContainerIo {
    /// Initialize FFmpeg and create the factory
    pub fn new() -> FramecatResult<Self> {
        ffmpeg::init().map_err(|e| FramecatError::FFmpegInitError {
            message: e.to_string(),
        })?;
        Ok(Self)
    }
}

impl ContainerIo for LibavContainerIo {
    type Input = LibavInput;
    type Output = LibavOutput;

    fn create_output(&mut self, path: &Path) -> FramecatResult<LibavOutput> {
        LibavOutput::create(path)
    }

    fn open_input(&mut self, path: &Path) -> FramecatResult<LibavInput> {
        LibavInput::open(path)
    }
}

/// Opened and probed input file
pub struct LibavInput {
    path: PathBuf,
    ictx: ffmpeg::format::context::Input,
    tracks: Vec<TrackInfo>,
}

impl LibavInput {
    pub fn open(path: &Path) -> FramecatResult<Self> {
        let ictx = ffmpeg::format::input(&path).map_err(|e| classify_open_error(path, e))?;

        let tracks: Vec<TrackInfo> = ictx
            .streams()
            .map(|stream| {
                let parameters = stream.parameters();
                TrackInfo::new(
                    stream.index(),
                    TrackKind::from(parameters.medium()),
                    stream.time_base().into(),
                )
                .with_codec(parameters.id().name())
            })
            .collect();

        debug!(
            "Opened input {} with {} track(s): {}",
            path.display(),
            tracks.len(),
            tracks
                .iter()
                .map(|t| format!("#{} {} {} @{}", t.index, t.kind, t.codec, t.timebase))
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(Self {
            path: path.to_path_buf(),
            ictx,
            tracks,
        })
    }
}

/// `format::input` opens and probes in one call; corrupt or unrecognised
/// data means the file opened but could not be probed.
fn classify_open_error(path: &Path, error: ffmpeg::Error) -> FramecatError {
    match error {
        ffmpeg::Error::InvalidData | ffmpeg::Error::StreamNotFound => {
            FramecatError::InputUnprobeable {
                path: path.to_path_buf(),
                message: error.to_string(),
            }
        }
        _ => FramecatError::InputUnopenable {
            path: path.to_path_buf(),
            message: error.to_string(),
        },
    }
}

impl DemuxInput for LibavInput {
    type Packet = ffmpeg::Packet;

    fn path(&self) -> &Path {
        &self.path
    }

    fn tracks(&self) -> &[TrackInfo] {
        &self.tracks
    }

    fn read_packet(&mut self) -> FramecatResult<Option<ffmpeg::Packet>> {
        loop {
            let mut packet = ffmpeg::Packet::empty();
            match packet.read(&mut self.ictx) {
                Ok(()) => return Ok(Some(packet)),
                Err(ffmpeg::Error::Eof) => return Ok(None),
                Err(ffmpeg::Error::Other { errno }) if errno == ffmpeg::util::error::EAGAIN => {
                    continue
                }
                Err(e) => {
                    return Err(FramecatError::PacketReadFailed {
                        path: self.path.clone(),
                        message: e.to_string(),
                    })
                }
            }
        }
    }
}

/// Output file, materialized when the sink is opened
pub struct LibavOutput {
    path: PathBuf,
    pending: Vec<ffmpeg::codec::Parameters>,
    octx: Option<ffmpeg::format::context::Output>,
}

impl LibavOutput {
    /// Check that a muxer can be derived from the output path
    pub fn create(path: &Path) -> FramecatResult<Self> {
        let unavailable = |message: &str| FramecatError::OutputContextUnavailable {
            path: path.to_path_buf(),
            message: message.to_string(),
        };

        let c_path = CString::new(path.to_string_lossy().as_bytes())
            .map_err(|_| unavailable("path contains a NUL byte"))?;
        let format = unsafe { ffmpeg::ffi::av_guess_format(ptr::null(), c_path.as_ptr(), ptr::null()) };
        if format.is_null() {
            return Err(unavailable("unable to find a suitable output format"));
        }

        Ok(Self {
            path: path.to_path_buf(),
            pending: Vec::new(),
            octx: None,
        })
    }

    fn context_mut(&mut self) -> FramecatResult<&mut ffmpeg::format::context::Output> {
        self.octx.as_mut().ok_or_else(|| FramecatError::InvalidState {
            message: "output sink is not open".to_string(),
        })
    }
}

impl MuxOutput for LibavOutput {
    type Input = LibavInput;

    fn add_track(&mut self, input: &LibavInput, input_track: usize) -> FramecatResult<usize> {
        if self.octx.is_some() {
            return Err(FramecatError::InvalidState {
                message: "tracks must be added before the sink is opened".to_string(),
            });
        }

        let stream = input.ictx.stream(input_track).ok_or_else(|| {
            FramecatError::TrackSetupFailed {
                message: format!("input track #{} not found in {}", input_track, input.path.display()),
            }
        })?;

        // Owned copy so the input can be closed independently
        self.pending.push(stream.parameters().clone());
        Ok(self.pending.len() - 1)
    }

    fn open_sink(&mut self) -> FramecatResult<()> {
        let mut octx = ffmpeg::format::output(&self.path).map_err(|e| {
            FramecatError::OutputSinkUnopenable {
                path: self.path.clone(),
                message: e.to_string(),
            }
        })?;

        for parameters in self.pending.drain(..) {
            let mut ost = octx
                .add_stream(ffmpeg::encoder::find(ffmpeg::codec::Id::None))
                .map_err(|e| FramecatError::TrackSetupFailed {
                    message: e.to_string(),
                })?;
            ost.set_parameters(parameters);
            // Let the muxer pick the tag for its own container
            unsafe {
                (*ost.parameters().as_mut_ptr()).codec_tag = 0;
            }
        }

        info!("Opened output {}", self.path.display());
        self.octx = Some(octx);
        Ok(())
    }

    fn write_header(&mut self) -> FramecatResult<()> {
        self.context_mut()?
            .write_header()
            .map_err(|e| FramecatError::HeaderWriteFailed {
                message: e.to_string(),
            })
    }

    fn track_timebase(&self, output_index: usize) -> Option<Rational> {
        self.octx
            .as_ref()?
            .stream(output_index)
            .map(|stream| stream.time_base().into())
    }

    fn write_interleaved(&mut self, packet: ffmpeg::Packet) -> FramecatResult<()> {
        let Some(octx) = self.octx.as_mut() else {
            return Err(FramecatError::InvalidState {
                message: "output sink is not open".to_string(),
            });
        };
        packet
            .write_interleaved(octx)
            .map_err(|e| FramecatError::FrameWriteFailed {
                path: self.path.clone(),
                message: e.to_string(),
            })
    }

    fn write_trailer(&mut self) -> FramecatResult<()> {
        self.context_mut()?
            .write_trailer()
            .map_err(|e| FramecatError::TrailerWriteFailed {
                message: e.to_string(),
            })
    }
}
