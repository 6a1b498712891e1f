//! Host API table and the adapters built on it

use std::ffi::{CStr, CString};
use std::ptr::NonNull;

use libc::{c_char, c_int};
use ndi_audio::AudioOutputInfo;
use ndi_output::{CaptureFlags, OutputHost, Settings, SettingsDefaults};
use ndi_video::{VideoFormat, VideoOutputInfo};

pub const LOG_ERROR: c_int = 100;
pub const LOG_WARNING: c_int = 200;
pub const LOG_INFO: c_int = 300;
pub const LOG_DEBUG: c_int = 400;

pub const PROPERTIES_DEFER_UPDATE: u32 = 1 << 0;
pub const TEXT_DEFAULT: c_int = 0;

/// Opaque handle to a host settings object
pub struct ObsData {
    _private: [u8; 0],
}

/// Opaque handle to a host output
pub struct ObsOutput {
    _private: [u8; 0],
}

/// Opaque handle to a host property sheet
pub struct ObsProperties {
    _private: [u8; 0],
}

/// Opaque handle to a host video mix
pub struct ObsVideo {
    _private: [u8; 0],
}

/// Opaque handle to a host audio mix
pub struct ObsAudio {
    _private: [u8; 0],
}

/// Host functions the output calls, filled in by the C side of the plugin
#[repr(C)]
#[derive(Clone, Copy)]
pub struct ObsHostApi {
    /// Write one already formatted line to the host log
    pub log: unsafe extern "C" fn(level: c_int, message: *const c_char),
    pub module_text: unsafe extern "C" fn(key: *const c_char) -> *const c_char,

    pub data_get_string: unsafe extern "C" fn(data: *mut ObsData, key: *const c_char) -> *const c_char,
    pub data_get_bool: unsafe extern "C" fn(data: *mut ObsData, key: *const c_char) -> bool,
    pub data_set_default_string:
        unsafe extern "C" fn(data: *mut ObsData, key: *const c_char, value: *const c_char),
    pub data_set_default_bool: unsafe extern "C" fn(data: *mut ObsData, key: *const c_char, value: bool),

    pub properties_create: unsafe extern "C" fn() -> *mut ObsProperties,
    pub properties_set_flags: unsafe extern "C" fn(props: *mut ObsProperties, flags: u32),
    pub properties_add_text: unsafe extern "C" fn(
        props: *mut ObsProperties,
        name: *const c_char,
        description: *const c_char,
        text_type: c_int,
    ),

    pub output_video: unsafe extern "C" fn(output: *mut ObsOutput) -> *mut ObsVideo,
    pub output_audio: unsafe extern "C" fn(output: *mut ObsOutput) -> *mut ObsAudio,
    pub video_output_get_format: unsafe extern "C" fn(video: *mut ObsVideo) -> u32,
    pub video_output_get_width: unsafe extern "C" fn(video: *mut ObsVideo) -> u32,
    pub video_output_get_height: unsafe extern "C" fn(video: *mut ObsVideo) -> u32,
    pub video_output_get_frame_rate: unsafe extern "C" fn(video: *mut ObsVideo) -> f64,
    pub audio_output_get_sample_rate: unsafe extern "C" fn(audio: *mut ObsAudio) -> u32,
    pub audio_output_get_channels: unsafe extern "C" fn(audio: *mut ObsAudio) -> usize,

    pub output_begin_data_capture: unsafe extern "C" fn(output: *mut ObsOutput, flags: u32) -> bool,
    pub output_end_data_capture: unsafe extern "C" fn(output: *mut ObsOutput),
}

impl ObsHostApi {
    /// Localized text for `key`, if the host has a translation
    pub fn module_text(&self, key: &CStr) -> Option<*const c_char> {
        // SAFETY: key is a valid C string; the host returns a static string or null.
        let text = unsafe { (self.module_text)(key.as_ptr()) };
        (!text.is_null()).then_some(text)
    }
}

/// `OutputHost` over a host output handle
pub struct ObsOutputHost {
    api: &'static ObsHostApi,
    output: NonNull<ObsOutput>,
}

// The host output outlives the instance and its functions are thread-safe.
unsafe impl Send for ObsOutputHost {}
unsafe impl Sync for ObsOutputHost {}

impl ObsOutputHost {
    pub fn new(api: &'static ObsHostApi, output: NonNull<ObsOutput>) -> Self {
        Self { api, output }
    }
}

impl OutputHost for ObsOutputHost {
    fn video(&self) -> Option<VideoOutputInfo> {
        // SAFETY: output is a live host output; returned handles are checked for null.
        unsafe {
            let video = (self.api.output_video)(self.output.as_ptr());
            if video.is_null() {
                return None;
            }
            Some(VideoOutputInfo {
                format: VideoFormat::from_raw((self.api.video_output_get_format)(video)),
                width: (self.api.video_output_get_width)(video),
                height: (self.api.video_output_get_height)(video),
                frame_rate: (self.api.video_output_get_frame_rate)(video),
            })
        }
    }

    fn audio(&self) -> Option<AudioOutputInfo> {
        // SAFETY: as above.
        unsafe {
            let audio = (self.api.output_audio)(self.output.as_ptr());
            if audio.is_null() {
                return None;
            }
            Some(AudioOutputInfo {
                sample_rate: (self.api.audio_output_get_sample_rate)(audio),
                channels: (self.api.audio_output_get_channels)(audio),
            })
        }
    }

    fn begin_data_capture(&self, flags: CaptureFlags) -> bool {
        unsafe { (self.api.output_begin_data_capture)(self.output.as_ptr(), flags.bits()) }
    }

    fn end_data_capture(&self) {
        unsafe { (self.api.output_end_data_capture)(self.output.as_ptr()) }
    }
}

/// `Settings` and `SettingsDefaults` over a host settings object
pub struct ObsSettings<'a> {
    api: &'a ObsHostApi,
    data: NonNull<ObsData>,
}

impl<'a> ObsSettings<'a> {
    pub fn new(api: &'a ObsHostApi, data: NonNull<ObsData>) -> Self {
        Self { api, data }
    }
}

impl Settings for ObsSettings<'_> {
    fn get_string(&self, key: &str) -> Option<String> {
        let key = CString::new(key).ok()?;
        // SAFETY: data is a live settings object for the duration of the callback.
        let value = unsafe { (self.api.data_get_string)(self.data.as_ptr(), key.as_ptr()) };
        if value.is_null() {
            return None;
        }
        // SAFETY: the host returns a NUL-terminated string it owns.
        Some(unsafe { CStr::from_ptr(value) }.to_string_lossy().into_owned())
    }

    fn get_bool(&self, key: &str) -> Option<bool> {
        let key = CString::new(key).ok()?;
        Some(unsafe { (self.api.data_get_bool)(self.data.as_ptr(), key.as_ptr()) })
    }
}

impl SettingsDefaults for ObsSettings<'_> {
    fn set_default_string(&mut self, key: &str, value: &str) {
        let (Ok(key), Ok(value)) = (CString::new(key), CString::new(value)) else {
            return;
        };
        unsafe { (self.api.data_set_default_string)(self.data.as_ptr(), key.as_ptr(), value.as_ptr()) }
    }

    fn set_default_bool(&mut self, key: &str, value: bool) {
        let Ok(key) = CString::new(key) else {
            return;
        };
        unsafe { (self.api.data_set_default_bool)(self.data.as_ptr(), key.as_ptr(), value) }
    }
}
