//! Network video SDK seam: sender lifecycle and frame descriptors

/// Pack a four-character code the way the SDK does (first byte lowest)
pub const fn fourcc(code: [u8; 4]) -> u32 {
    u32::from_le_bytes(code)
}

/// Video FourCC codes the output sends
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FourCCVideoType {
    UYVY = fourcc(*b"UYVY"),
    NV12 = fourcc(*b"NV12"),
    I420 = fourcc(*b"I420"),
    RGBA = fourcc(*b"RGBA"),
    BGRA = fourcc(*b"BGRA"),
    BGRX = fourcc(*b"BGRX"),
}

/// Audio FourCC codes the output sends
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FourCCAudioType {
    /// Planar 32-bit float
    FLTP = fourcc(*b"FLTp"),
}

#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameFormatType {
    Interleaved = 0,
    Progressive = 1,
    Field0 = 2,
    Field1 = 3,
}

/// Timecode telling the SDK to generate one itself
pub const SEND_TIMECODE_SYNTHESIZE: i64 = i64::MAX;

/// Sender creation parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendCreate<'a> {
    pub ndi_name: &'a str,
    pub groups: Option<&'a str>,
    pub clock_video: bool,
    pub clock_audio: bool,
}

/// Video frame descriptor handed to the sender
///
/// `data` stays borrowed by the SDK until the next asynchronous video send
/// on the same sender (or its destruction).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NdiVideoFrame {
    pub xres: i32,
    pub yres: i32,
    pub fourcc: FourCCVideoType,
    pub frame_rate_n: i32,
    pub frame_rate_d: i32,
    pub frame_format: FrameFormatType,
    /// 100 ns units
    pub timecode: i64,
    pub data: *const u8,
    pub line_stride_in_bytes: i32,
}

unsafe impl Send for NdiVideoFrame {}
unsafe impl Sync for NdiVideoFrame {}

/// Audio frame descriptor handed to the sender
///
/// `data` holds `no_channels` planes of `channel_stride_in_bytes` each.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NdiAudioFrame {
    pub sample_rate: i32,
    pub no_channels: i32,
    pub no_samples: i32,
    pub timecode: i64,
    pub fourcc: FourCCAudioType,
    pub data: *const u8,
    pub channel_stride_in_bytes: i32,
}

unsafe impl Send for NdiAudioFrame {}
unsafe impl Sync for NdiAudioFrame {}

/// The calls the output issues against the network video SDK
pub trait NdiSdk: Send + Sync {
    /// Opaque sender handle
    type Sender: Send + Sync;

    fn send_create(&self, desc: &SendCreate<'_>) -> Option<Self::Sender>;

    fn send_destroy(&self, sender: Self::Sender);

    /// Queue a video frame without blocking. The SDK keeps reading
    /// `frame.data` until the next call.
    fn send_video_async(&self, sender: &Self::Sender, frame: &NdiVideoFrame);

    /// Send an audio frame; may block briefly
    fn send_audio(&self, sender: &Self::Sender, frame: &NdiAudioFrame);
}
