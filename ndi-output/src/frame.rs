//! Frame builder: fills SDK frame descriptors from host frames

use ndi_audio::FLOAT_SAMPLE_BYTES;
use ndi_video::{
    convert_i444_to_uyvy, ConversionBuffer, UyvyConvFn, VideoData, VideoFormat, VideoOutputInfo,
    CONV_SLOTS,
};

use crate::error::StartError;
use crate::sdk::{
    FourCCAudioType, FourCCVideoType, FrameFormatType, NdiAudioFrame, NdiVideoFrame,
    SEND_TIMECODE_SYNTHESIZE,
};

/// Fixed denominator of the sent frame rate
const FRAME_RATE_DENOMINATOR: i32 = 100;

/// Video format agreed with the host at start
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NegotiatedVideo {
    pub width: u32,
    pub height: u32,
    pub frame_rate: f64,
    pub fourcc: FourCCVideoType,
}

/// Audio format agreed with the host at start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NegotiatedAudio {
    pub sample_rate: u32,
    pub channels: usize,
}

/// How frames of a host pixel format reach the sender
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatMapping {
    /// Host buffer is sent as is
    PassThrough(FourCCVideoType),
    /// Host buffer is converted into UYVY first
    ConvertToUyvy,
}

/// Map a host pixel format to what the sender accepts
pub fn map_video_format(format: VideoFormat) -> Option<FormatMapping> {
    let mapping = match format {
        VideoFormat::I444 => FormatMapping::ConvertToUyvy,
        VideoFormat::NV12 => FormatMapping::PassThrough(FourCCVideoType::NV12),
        VideoFormat::I420 => FormatMapping::PassThrough(FourCCVideoType::I420),
        VideoFormat::RGBA => FormatMapping::PassThrough(FourCCVideoType::RGBA),
        VideoFormat::BGRA => FormatMapping::PassThrough(FourCCVideoType::BGRA),
        VideoFormat::BGRX => FormatMapping::PassThrough(FourCCVideoType::BGRX),
        _ => return None,
    };
    Some(mapping)
}

/// Converter and destination for formats the sender cannot take directly
pub struct VideoConversion {
    convert: UyvyConvFn,
    buffer: ConversionBuffer,
    next_slot: usize,
}

impl VideoConversion {
    pub fn new(convert: UyvyConvFn, buffer: ConversionBuffer) -> Self {
        Self {
            convert,
            buffer,
            next_slot: 0,
        }
    }

    pub fn buffer(&self) -> &ConversionBuffer {
        &self.buffer
    }

    /// Convert all `height` rows of `frame` into the next buffer slot;
    /// returns the converted data and its stride, or `None` if the frame
    /// lacks one of its three planes.
    ///
    /// # Safety
    /// Planes 0..3 of `frame` must be valid for `linesize * height` bytes.
    pub unsafe fn convert(&mut self, frame: &VideoData, height: u32) -> Option<(*const u8, u32)> {
        let planes = [
            frame.plane(0, height)?,
            frame.plane(1, height)?,
            frame.plane(2, height)?,
        ];
        let in_linesize = [frame.linesize[0], frame.linesize[1], frame.linesize[2]];
        let out_linesize = self.buffer.linesize();
        let slot = self.next_slot;
        self.next_slot = (slot + 1) % CONV_SLOTS;

        (self.convert)(
            planes,
            in_linesize,
            0,
            height,
            self.buffer.slot_mut(slot),
            out_linesize,
        );

        Some((self.buffer.slot_ptr(slot), out_linesize))
    }
}

impl std::fmt::Debug for VideoConversion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoConversion")
            .field("buffer", &self.buffer)
            .finish()
    }
}

/// Negotiate the sent video format for a host video mix
///
/// I444 gets a UYVY converter and its conversion buffer; the pass-through
/// formats get neither. A zero-area I444 mix negotiates UYVY without a
/// buffer; its frames are dropped before conversion.
pub fn negotiate_video(
    info: &VideoOutputInfo,
) -> Result<(NegotiatedVideo, Option<VideoConversion>), StartError> {
    let mapping =
        map_video_format(info.format).ok_or(StartError::UnsupportedFormat(info.format))?;

    let (fourcc, conversion) = match mapping {
        FormatMapping::PassThrough(fourcc) => (fourcc, None),
        FormatMapping::ConvertToUyvy if info.width == 0 || info.height == 0 => {
            (FourCCVideoType::UYVY, None)
        }
        FormatMapping::ConvertToUyvy => {
            let buffer = ConversionBuffer::for_uyvy(info.width, info.height)?;
            let conversion = VideoConversion::new(convert_i444_to_uyvy, buffer);
            (FourCCVideoType::UYVY, Some(conversion))
        }
    };

    let negotiated = NegotiatedVideo {
        width: info.width,
        height: info.height,
        frame_rate: info.frame_rate,
        fourcc,
    };
    Ok((negotiated, conversion))
}

/// Frame rate as the numerator/denominator pair the sender gets
///
/// Exact for integer rates. TODO: NTSC rates come out as 2997/100 instead
/// of 30000/1001.
pub fn frame_rate_fraction(frame_rate: f64) -> (i32, i32) {
    (
        (frame_rate * FRAME_RATE_DENOMINATOR as f64).round() as i32,
        FRAME_RATE_DENOMINATOR,
    )
}

/// Host nanoseconds to SDK 100 ns ticks
pub fn timecode_from_ns(timestamp_ns: u64) -> i64 {
    (timestamp_ns / 100) as i64
}

pub fn build_video_frame(
    video: &NegotiatedVideo,
    data: *const u8,
    line_stride: u32,
    timestamp_ns: u64,
) -> NdiVideoFrame {
    let (frame_rate_n, frame_rate_d) = frame_rate_fraction(video.frame_rate);

    NdiVideoFrame {
        xres: video.width as i32,
        yres: video.height as i32,
        fourcc: video.fourcc,
        frame_rate_n,
        frame_rate_d,
        frame_format: FrameFormatType::Progressive,
        timecode: timecode_from_ns(timestamp_ns),
        data,
        line_stride_in_bytes: line_stride as i32,
    }
}

/// `data` is the repacked block: `audio.channels` planes of `frames` samples
pub fn build_audio_frame(audio: &NegotiatedAudio, frames: u32, data: &[u8]) -> NdiAudioFrame {
    NdiAudioFrame {
        sample_rate: audio.sample_rate as i32,
        no_channels: audio.channels as i32,
        no_samples: frames as i32,
        timecode: SEND_TIMECODE_SYNTHESIZE,
        fourcc: FourCCAudioType::FLTP,
        data: data.as_ptr(),
        channel_stride_in_bytes: (frames as usize * FLOAT_SAMPLE_BYTES) as i32,
    }
}
