//! NDI SDK function table and C frame layouts

use std::ffi::CString;
use std::ptr::{self, NonNull};

use libc::{c_char, c_int, c_void};
use log::error;
use ndi_output::{NdiAudioFrame, NdiSdk, NdiVideoFrame, SendCreate};

/// `NDIlib_send_create_t`
#[repr(C)]
pub struct SendCreateDesc {
    pub p_ndi_name: *const c_char,
    pub p_groups: *const c_char,
    pub clock_video: bool,
    pub clock_audio: bool,
}

/// `NDIlib_video_frame_v2_t`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct VideoFrameV2 {
    pub xres: c_int,
    pub yres: c_int,
    pub fourcc: u32,
    pub frame_rate_n: c_int,
    pub frame_rate_d: c_int,
    /// 0 means xres / yres
    pub picture_aspect_ratio: f32,
    pub frame_format_type: c_int,
    pub timecode: i64,
    pub p_data: *const u8,
    pub line_stride_in_bytes: c_int,
    pub p_metadata: *const c_char,
    pub timestamp: i64,
}

impl From<&NdiVideoFrame> for VideoFrameV2 {
    fn from(frame: &NdiVideoFrame) -> Self {
        Self {
            xres: frame.xres,
            yres: frame.yres,
            fourcc: frame.fourcc as u32,
            frame_rate_n: frame.frame_rate_n,
            frame_rate_d: frame.frame_rate_d,
            picture_aspect_ratio: 0.0,
            frame_format_type: frame.frame_format as c_int,
            timecode: frame.timecode,
            p_data: frame.data,
            line_stride_in_bytes: frame.line_stride_in_bytes,
            p_metadata: ptr::null(),
            timestamp: 0,
        }
    }
}

/// `NDIlib_audio_frame_v3_t`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct AudioFrameV3 {
    pub sample_rate: c_int,
    pub no_channels: c_int,
    pub no_samples: c_int,
    pub timecode: i64,
    pub fourcc: u32,
    pub p_data: *const u8,
    pub channel_stride_in_bytes: c_int,
    pub p_metadata: *const c_char,
    pub timestamp: i64,
}

impl From<&NdiAudioFrame> for AudioFrameV3 {
    fn from(frame: &NdiAudioFrame) -> Self {
        Self {
            sample_rate: frame.sample_rate,
            no_channels: frame.no_channels,
            no_samples: frame.no_samples,
            timecode: frame.timecode,
            fourcc: frame.fourcc as u32,
            p_data: frame.data,
            channel_stride_in_bytes: frame.channel_stride_in_bytes,
            p_metadata: ptr::null(),
            timestamp: 0,
        }
    }
}

/// The subset of `NDIlib_v4` the output uses
#[repr(C)]
#[derive(Clone, Copy)]
pub struct NdiLibApi {
    pub send_create: unsafe extern "C" fn(desc: *const SendCreateDesc) -> *mut c_void,
    pub send_destroy: unsafe extern "C" fn(sender: *mut c_void),
    pub send_send_video_async_v2: unsafe extern "C" fn(sender: *mut c_void, frame: *const VideoFrameV2),
    pub send_send_audio_v3: unsafe extern "C" fn(sender: *mut c_void, frame: *const AudioFrameV3),
}

/// Live `NDIlib_send_instance_t`
#[derive(Debug)]
pub struct NdiSender(NonNull<c_void>);

// SDK sender calls are thread-safe.
unsafe impl Send for NdiSender {}
unsafe impl Sync for NdiSender {}

/// `NdiSdk` over the loaded SDK's function table
pub struct NdiLib {
    api: &'static NdiLibApi,
}

impl NdiLib {
    pub fn new(api: &'static NdiLibApi) -> Self {
        Self { api }
    }
}

impl NdiSdk for NdiLib {
    type Sender = NdiSender;

    fn send_create(&self, desc: &SendCreate<'_>) -> Option<NdiSender> {
        let Ok(name) = CString::new(desc.ndi_name) else {
            error!("[obs-ndi] sender name contains a NUL byte");
            return None;
        };
        let groups = match desc.groups.map(CString::new).transpose() {
            Ok(groups) => groups,
            Err(_) => {
                error!("[obs-ndi] sender groups contain a NUL byte");
                return None;
            }
        };

        let create = SendCreateDesc {
            p_ndi_name: name.as_ptr(),
            p_groups: groups.as_ref().map_or(ptr::null(), |g| g.as_ptr()),
            clock_video: desc.clock_video,
            clock_audio: desc.clock_audio,
        };

        // SAFETY: create and the strings it points to live across the call.
        let sender = unsafe { (self.api.send_create)(&create) };
        NonNull::new(sender).map(NdiSender)
    }

    fn send_destroy(&self, sender: NdiSender) {
        unsafe { (self.api.send_destroy)(sender.0.as_ptr()) }
    }

    fn send_video_async(&self, sender: &NdiSender, frame: &NdiVideoFrame) {
        let frame = VideoFrameV2::from(frame);
        unsafe { (self.api.send_send_video_async_v2)(sender.0.as_ptr(), &frame) }
    }

    fn send_audio(&self, sender: &NdiSender, frame: &NdiAudioFrame) {
        let frame = AudioFrameV3::from(frame);
        unsafe { (self.api.send_send_audio_v3)(sender.0.as_ptr(), &frame) }
    }
}
